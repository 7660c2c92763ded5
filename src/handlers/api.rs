//! Health check handler.

use axum::Json;
use serde_json::{Value, json};

/// Liveness probe for load balancers and deployment checks.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "gemini-live-gateway",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_reports_ok() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "gemini-live-gateway");
    }
}

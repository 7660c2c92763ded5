pub mod api;
pub mod live;

pub use api::health_check;
pub use live::live_handler;

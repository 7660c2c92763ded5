pub mod ws;

pub use ws::create_ws_router;

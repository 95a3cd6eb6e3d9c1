//! Liveness HTTP surface

pub mod handlers;
pub mod server;

pub use handlers::{AppState, ALIVE_BODY};
pub use server::{build_http_client, build_router, run_server};

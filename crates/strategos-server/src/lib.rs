//! HTTP surface: directive and chat endpoints streamed as server-sent events.

pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod shutdown;
pub mod sse;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::{build_router, start, AppState, ServerHandle, Services};
pub use shutdown::ShutdownCoordinator;

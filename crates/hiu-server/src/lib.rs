pub mod config;
pub mod error;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::{AppConfig, CacheConfig, GatewayConfig, HiuConfig, ServerConfig};
pub use error::ApiError;
pub use observability::init_tracing;
pub use server::{AppState, HiuServer, ServerBuilder, build_app, spawn_cache_cleanup};

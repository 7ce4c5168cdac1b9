//! Skills Server
//!
//! JSON HTTP API over the skills review workspace: survey intake, response
//! management, the manager review flow, the intake form schema, analytics
//! and the taxonomy.
//!
//! # Example
//!
//! ```rust,no_run
//! use skills_server::{router, AppState, ServerConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServerConfig::new().with_port(8080);
//! let state = AppState::from_config(&config).await?;
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//! axum::serve(listener, router(state)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

// Re-exports
pub use config::{ConfigError, ServerConfig, DEFAULT_PORT};
pub use error::{ApiError, ApiResult};
pub use router::router;
pub use state::{AppState, StateError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

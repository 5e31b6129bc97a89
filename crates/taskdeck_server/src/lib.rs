//! HTTP transport for Taskdeck.
//!
//! Maps the REST surface onto `taskdeck_core` services. All domain rules live
//! in core; this crate only parses requests, runs blocking store work off the
//! async runtime and shapes responses.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

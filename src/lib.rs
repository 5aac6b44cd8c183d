//! HTTP → HTTPS enforcement for axum/tower pipelines.

pub mod config;
pub mod http;
pub mod observability;
pub mod security;

pub use config::schema::{AppConfig, GuardConfig};
pub use http::HttpServer;
pub use security::{GuardError, Outcome, SecureSchemeGuard, TerminalKind};

//! Request-pipeline middleware.

pub mod require_https;

pub use require_https::{require_https_middleware, RequireHttpsState};

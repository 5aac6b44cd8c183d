//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → http::descriptor (disassemble scheme, host, path, query)
//!     → require_https.rs (delegate, redirect or reject)
//!     → Pass to handler, or return the terminal response
//! ```
//!
//! # Design Decisions
//! - Fail closed: a request that cannot be redirected safely is refused
//! - Decisions are pure functions of the request and fixed configuration

pub mod require_https;

pub use require_https::{GuardError, Outcome, SecureSchemeGuard, TerminalKind};

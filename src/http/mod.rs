//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → descriptor.rs (disassemble request, resolve scheme)
//!     → middleware/require_https.rs (guard decision)
//!     → handler, or terminal redirect / rejection
//!     → Send to client
//! ```

pub mod descriptor;
pub mod middleware;
pub mod server;

pub use descriptor::{HeaderMultiMap, RequestDescriptor, ResponseDescriptor, SchemeResolution};
pub use server::HttpServer;

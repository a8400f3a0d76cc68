//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, ingest handler)
//!     → request.rs (add request ID)
//!     → routing layer (resolve route, check secret)
//!     → record layer (raw passthrough or CBOR envelope)
//!     → storage layer (append with rotation, or fresh file)
//!     → plain 200 / error.rs failure mapping
//! ```

pub mod error;
pub mod request;
pub mod server;

pub use error::SinkError;
pub use request::{request_id, RequestIdLayer, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

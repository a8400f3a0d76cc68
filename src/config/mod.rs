//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON) and/or CLI flags
//!     → loader.rs (parse & deserialize)
//!     → flag-built default route layered on top (route name "")
//!     → validation.rs (semantic checks, default max_ob_bytes)
//!     → RouteMap (validated, immutable)
//!     → shared via Arc to the request handlers
//! ```
//!
//! # Design Decisions
//! - Routes are immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::RouteConfig;
pub use schema::RouteMap;
pub use schema::DEFAULT_MAX_BYTES;

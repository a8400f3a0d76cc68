//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query, headers)
//!     → router.rs (resolve route: d parameter, path segments, default)
//!     → auth.rs (secret checks against the resolved route)
//!     → Return: (route name, RouteConfig) or NotFound/Forbidden
//! ```
//!
//! # Design Decisions
//! - Route table built at startup, immutable at runtime
//! - Deterministic: same input always resolves the same route
//! - Resolution before authentication; an unresolved request learns
//!   nothing about any route's secret

pub mod auth;
pub mod router;

pub use auth::{authorized, RECEIVER_TOKEN_HEADER};
pub use router::RouteTable;

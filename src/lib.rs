//! HTTP payload ingestion sink.
//!
//! Accepts POSTed payloads from many independent sources, checks each
//! request against a per-route secret, wraps the payload in a
//! timestamped CBOR envelope (unless the route is raw), and appends or
//! writes it to a file chosen by the route's naming/rotation scheme.

// Core subsystems
pub mod config;
pub mod http;
pub mod record;
pub mod routing;
pub mod storage;

// Cross-cutting concerns
pub mod lifecycle;

pub use config::{RouteConfig, RouteMap};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use record::Envelope;

//! Configuration schema definitions.
//!
//! This module defines the per-route ingestion rules. All types derive
//! Serde traits for deserialization from JSON config files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default body-size cap applied when a route leaves `max_ob_bytes` unset.
pub const DEFAULT_MAX_BYTES: i64 = 1_000_000;

/// One named ingestion rule.
///
/// Example config entry:
/// `{"raw": true, "secret": "hunter2", "out": "/wat/%T.jpg", "Content-Type": "image/jpeg"}`
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteConfig {
    /// Write the POST body out unmodified instead of a CBOR envelope.
    pub raw: bool,

    /// Shared secret a request must present. Empty = open route.
    pub secret: String,

    /// Path template for fresh-file mode; `%T` becomes a timestamp,
    /// `%%` a literal `%`.
    #[serde(rename = "out")]
    pub out_template: String,

    /// Append-mode output path, or `-` for stdout. `%T` becomes the
    /// current window identifier in Unix seconds.
    #[serde(rename = "append")]
    pub append_path: String,

    /// Append window length in seconds. 0 disables windowing.
    #[serde(rename = "append_window")]
    pub append_window_secs: i64,

    /// Shift applied to the window boundary, in seconds.
    pub append_window_offset: i64,

    /// Required request Content-Type. Empty = accept any.
    #[serde(rename = "Content-Type")]
    pub content_type: String,

    /// Maximum accepted body size in bytes.
    #[serde(rename = "max_ob_bytes")]
    pub max_bytes: i64,
}

impl RouteConfig {
    /// Whether this route writes in append mode.
    pub fn is_append(&self) -> bool {
        !self.append_path.is_empty()
    }
}

/// Route name → rule. The empty name is the default/fallback route.
pub type RouteMap = HashMap<String, RouteConfig>;

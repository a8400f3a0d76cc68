//! Output path templating.
//!
//! # Responsibilities
//! - Expand `%T` into a value derived from the reference time
//! - Expand `%%` into a literal `%`
//!
//! # Design Decisions
//! - Split on `%%` first and substitute `%T` per segment, so `%%T`
//!   survives as literal `%T` instead of being double-substituted
//! - Unrecognized `%x` sequences pass through unchanged
//! - Pure functions, never fail

use chrono::{DateTime, Utc};

/// Timestamp format for fresh-file templates. Fractional seconds are
/// printed only when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%.f";

/// Expand a fresh-file path template against a reference time.
pub fn expand_template(template: &str, when: DateTime<Utc>) -> String {
    expand_with(template, &when.format(TIMESTAMP_FORMAT).to_string())
}

/// Expand a path template with an explicit `%T` substitution value.
///
/// Append-mode paths use this directly, with the window identifier
/// rendered in base-10 seconds.
pub fn expand_with(template: &str, stamp: &str) -> String {
    template
        .split("%%")
        .map(|part| part.replace("%T", stamp))
        .collect::<Vec<_>>()
        .join("%")
}

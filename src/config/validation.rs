//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject route shapes that cannot produce decodable output
//! - Normalize defaulted fields (body-size cap)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Raw + append is rejected: raw bytes carry no record boundary, so
//!   an appended raw file could never be split back into records
//! - Runs once at startup, before the route table is built

use crate::config::schema::{RouteMap, DEFAULT_MAX_BYTES};
use thiserror::Error;

/// A single semantic problem with a route definition.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("route {0:?}: raw mode requires an output template")]
    RawWithoutTemplate(String),

    #[error("route {0:?}: raw mode cannot append; appended raw bytes have no record boundary")]
    RawWithAppend(String),

    #[error("route {0:?}: at least one of output template and append path must be set")]
    NoOutput(String),

    #[error("route {0:?}: append window length must not be negative")]
    NegativeWindow(String),

    #[error("route {0:?}: max_ob_bytes must not be negative")]
    NegativeMaxBytes(String),
}

/// Validate every route and normalize defaulted fields.
///
/// Collects all problems across all routes rather than stopping at the
/// first, so a config file can be fixed in one pass.
pub fn validate_routes(routes: &mut RouteMap) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (name, cfg) in routes.iter_mut() {
        if cfg.raw {
            if cfg.out_template.is_empty() {
                errors.push(ValidationError::RawWithoutTemplate(name.clone()));
            }
            if !cfg.append_path.is_empty() {
                errors.push(ValidationError::RawWithAppend(name.clone()));
            }
        }
        if cfg.out_template.is_empty() && cfg.append_path.is_empty() {
            errors.push(ValidationError::NoOutput(name.clone()));
        }
        if cfg.append_window_secs < 0 {
            errors.push(ValidationError::NegativeWindow(name.clone()));
        }
        if cfg.max_bytes < 0 {
            // a negative value would slip through the handler's usize
            // conversion as "unlimited"
            errors.push(ValidationError::NegativeMaxBytes(name.clone()));
        } else if cfg.max_bytes == 0 {
            cfg.max_bytes = DEFAULT_MAX_BYTES;
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

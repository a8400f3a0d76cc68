//! Request failure taxonomy.
//!
//! # Responsibilities
//! - One terminal error per failed request, mapped to a status code
//! - Public response bodies stay terse; detail goes to the log
//!
//! # Design Decisions
//! - Not-found and forbidden share the same opaque body, so a probe
//!   cannot distinguish "wrong name" from "wrong secret"
//! - 5xx bodies carry the underlying error text, matching the
//!   diagnostics the receiving side has always exposed
//! - Secrets never appear in messages or log fields

use crate::record::EnvelopeError;
use crate::storage::OutputError;
use axum::http::StatusCode;
use thiserror::Error;

/// Everything that can terminate an ingestion request early.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no matching route")]
    RouteNotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("not POST")]
    BadMethod,

    #[error("unacceptable content-type")]
    ContentTypeMismatch,

    #[error("read body: {0}")]
    ReadBody(String),

    #[error(transparent)]
    Encode(#[from] EnvelopeError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl SinkError {
    /// HTTP status this failure maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            SinkError::RouteNotFound => StatusCode::NOT_FOUND,
            SinkError::Forbidden => StatusCode::FORBIDDEN,
            SinkError::BadMethod | SinkError::ContentTypeMismatch => StatusCode::BAD_REQUEST,
            SinkError::ReadBody(_) | SinkError::Encode(_) | SinkError::Output(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Body text sent to the caller.
    pub fn public_message(&self) -> String {
        match self {
            SinkError::RouteNotFound | SinkError::Forbidden => "nope".to_string(),
            other => other.to_string(),
        }
    }

    /// True for failures that are the server's fault.
    pub fn is_server_fault(&self) -> bool {
        self.status().is_server_error()
    }
}

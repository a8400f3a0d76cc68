//! Fresh-file output.
//!
//! # Responsibilities
//! - Expand the fresh-file template for one request
//! - Create, write, and close the file within the request's scope
//!
//! # Design Decisions
//! - One file per request, no shared state, no locking
//! - The handle is dropped when this function returns, success or not

use crate::storage::template::expand_template;
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::Write;
use thiserror::Error;

/// Error type for output-path writes, fresh-file and append alike.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{path}: open: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("{path}: write: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

impl OutputError {
    /// The output path the failure happened on.
    pub fn path(&self) -> &str {
        match self {
            OutputError::Open { path, .. } | OutputError::Write { path, .. } => path,
        }
    }
}

/// Expand `template` against `when` and write `blob` to a newly created
/// file at the resulting path. Returns the path written to.
pub fn write_fresh(template: &str, when: DateTime<Utc>, blob: &[u8]) -> Result<String, OutputError> {
    let path = expand_template(template, when);
    let mut file = File::create(&path).map_err(|e| OutputError::Open {
        path: path.clone(),
        source: e,
    })?;
    file.write_all(blob).map_err(|e| OutputError::Write {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn writes_one_file_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let template = format!("{}/obj-%T.bin", dir.path().display());
        let when = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 42).unwrap();

        let path = write_fresh(&template, when, b"hello").unwrap();
        assert!(path.ends_with("obj-20240309_170542.bin"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn open_failure_carries_path() {
        let err = write_fresh("/no/such/dir/%T.bin", Utc::now(), b"x").unwrap_err();
        assert!(matches!(err, OutputError::Open { .. }));
        assert!(err.path().starts_with("/no/such/dir/"));
    }
}

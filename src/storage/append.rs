//! Append-file lifecycle management.
//!
//! # Responsibilities
//! - Own the currently open append handle for every append-mode route
//! - Detect window rollover and swap handles atomically
//! - Serialize all writes to one route so records never tear
//!
//! # Design Decisions
//! - One `tokio::sync::Mutex` per route: rollover check, handle swap,
//!   and the byte write happen under one lock acquisition; routes
//!   never contend with each other
//! - Handles open lazily on first write and are cleared on write error
//!   so the next request reopens instead of writing into a dead handle
//! - Append path `-` is the process stdout; no rotation, no window math

use crate::config::{RouteConfig, RouteMap};
use crate::storage::template::expand_with;
use crate::storage::window::window_id;
use crate::storage::writer::OutputError;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Append path value that means "write to stdout".
pub const STDOUT_PATH: &str = "-";

/// Cached open-file state for one route.
#[derive(Default)]
struct AppendState {
    /// Expanded path the current handle points at.
    current_path: String,
    /// Open handle, `None` until the first write or after an error.
    handle: Option<File>,
}

/// Owns one [`AppendState`] per append-mode route.
pub struct AppendFileManager {
    states: HashMap<String, Arc<Mutex<AppendState>>>,
    writes_stdout: bool,
}

impl AppendFileManager {
    /// Build manager entries for every append-mode route in the table.
    pub fn from_routes(routes: &RouteMap) -> Self {
        let states = routes
            .iter()
            .filter(|(_, cfg)| cfg.is_append())
            .map(|(name, _)| (name.clone(), Arc::new(Mutex::new(AppendState::default()))))
            .collect();
        let writes_stdout = routes.values().any(|cfg| cfg.append_path == STDOUT_PATH);
        Self {
            states,
            writes_stdout,
        }
    }

    /// Append `blob` for `route`, rotating to a new window file when the
    /// expanded path differs from the cached one. Returns the path
    /// written to.
    pub async fn write(
        &self,
        route: &str,
        cfg: &RouteConfig,
        blob: &[u8],
    ) -> Result<String, OutputError> {
        self.write_at(route, cfg, blob, chrono::Utc::now().timestamp())
            .await
    }

    /// [`write`](Self::write) with an explicit clock, for window tests.
    pub async fn write_at(
        &self,
        route: &str,
        cfg: &RouteConfig,
        blob: &[u8],
        now: i64,
    ) -> Result<String, OutputError> {
        let state = self.states.get(route).ok_or_else(|| OutputError::Open {
            path: cfg.append_path.clone(),
            source: std::io::Error::other("route has no append output"),
        })?;

        if cfg.append_path == STDOUT_PATH {
            // Still serialized per route so concurrent records don't
            // interleave on the shared stream.
            let _guard = state.lock().await;
            let mut out = std::io::stdout().lock();
            // stdout is line-buffered and records contain no newlines;
            // flush or a piped consumer sees nothing until the buffer fills
            out.write_all(blob)
                .and_then(|()| out.flush())
                .map_err(|e| OutputError::Write {
                    path: STDOUT_PATH.to_string(),
                    source: e,
                })?;
            return Ok(STDOUT_PATH.to_string());
        }

        let wid = window_id(now, cfg.append_window_secs, cfg.append_window_offset);
        let path = expand_with(&cfg.append_path, &wid.to_string());

        let mut guard = state.lock().await;
        let st = &mut *guard;

        if st.handle.is_none() || st.current_path != path {
            if st.handle.take().is_some() {
                tracing::debug!(
                    route = %route,
                    old_path = %st.current_path,
                    new_path = %path,
                    "append window rolled over"
                );
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| OutputError::Open {
                    path: path.clone(),
                    source: e,
                })?;
            st.current_path = path.clone();
            st.handle = Some(file);
        }

        let Some(file) = st.handle.as_mut() else {
            return Err(OutputError::Open {
                path,
                source: std::io::Error::other("append handle missing after open"),
            });
        };

        if let Err(e) = file.write_all(blob) {
            // Clear so the next request reopens.
            st.handle = None;
            return Err(OutputError::Write { path, source: e });
        }
        Ok(path)
    }

    /// Flush and close every open handle. Called at graceful shutdown.
    pub async fn close_all(&self) {
        for (route, state) in &self.states {
            let mut st = state.lock().await;
            if let Some(file) = st.handle.take() {
                if let Err(e) = file.sync_all() {
                    tracing::warn!(route = %route, error = %e, "sync on shutdown failed");
                }
            }
        }
        if self.writes_stdout {
            if let Err(e) = std::io::stdout().flush() {
                tracing::warn!(error = %e, "stdout flush on shutdown failed");
            }
        }
    }
}

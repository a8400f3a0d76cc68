//! Output-path resolution and file lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! encoded blob + route config
//!     → window.rs (append mode: truncate "now" to the window boundary)
//!     → template.rs (expand %T / %% into a concrete path)
//!     → append.rs (shared rotating handle, per-route lock)
//!       or writer.rs (fresh file per request, scoped handle)
//! ```
//!
//! # Design Decisions
//! - Fresh-file writes share nothing; append writes share exactly one
//!   handle per route, guarded by that route's mutex
//! - Rotation is driven by path comparison, not timers: a write under a
//!   new window expands to a new path and that difference swaps handles

pub mod append;
pub mod template;
pub mod window;
pub mod writer;

pub use append::{AppendFileManager, STDOUT_PATH};
pub use template::{expand_template, expand_with, TIMESTAMP_FORMAT};
pub use window::window_id;
pub use writer::{write_fresh, OutputError};

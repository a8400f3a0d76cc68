//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse flags → Load config → Validate → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     ctrl-c or test trigger → Stop accepting → Drain in-flight
//!     requests → Flush append handles → Exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel fans the signal out to every waiter
//! - In-flight writes run to completion; only accepting stops early

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownHandle};

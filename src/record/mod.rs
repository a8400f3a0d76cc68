//! Record encoding subsystem.
//!
//! Raw-mode routes write the POST body untouched; every other route
//! wraps it in the CBOR [`Envelope`] defined here. The same envelope is
//! read back by the `sink-dump` binary.

pub mod envelope;

pub use envelope::{Envelope, EnvelopeError};

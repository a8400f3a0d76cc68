//! Append-window resolution.
//!
//! # Responsibilities
//! - Map "now" onto a stable window identifier so every request inside
//!   the same window appends to the same file
//!
//! # Design Decisions
//! - `rem_euclid`, not `%`: the remainder must follow floor-division
//!   sign rules or a negative `now + offset` would land one window off
//! - Window length 0 means no windowing; the identifier is `now` itself

/// Compute the window identifier for `now` (Unix seconds).
///
/// For a window length `L > 0` and offset `O`, all timestamps with the
/// same `floor((t + O) / L)` share one identifier.
pub fn window_id(now: i64, window_secs: i64, window_offset: i64) -> i64 {
    if window_secs == 0 {
        return now;
    }
    now - (now + window_offset).rem_euclid(window_secs)
}

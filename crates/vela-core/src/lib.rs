//! Foundational low-level utilities shared across Vela crates.
//!
//! Provides atomic file-write helpers and time utilities used by agent library
//! persistence, publish bundles, and stale-process bookkeeping.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use time_utils::{current_unix_timestamp_ms, is_older_than_ms};

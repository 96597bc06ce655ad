//! Capture loop.
//!
//! Reads packets from a `PacketSource` one at a time, logs a hex dump of
//! each and hands it to the storage layer.

mod capture_loop;

pub use capture_loop::{CaptureLoop, CaptureStats, PollOutcome, DEFAULT_BUFFER_SIZE, DEFAULT_POLL_INTERVAL};

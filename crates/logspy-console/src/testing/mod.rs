//! Testing utilities for logspy console output
//!
//! Provides `CaptureSink` for capturing and asserting on mirrored console lines.

mod capture_sink;

pub use capture_sink::CaptureSink;

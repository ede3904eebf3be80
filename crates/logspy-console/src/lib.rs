//! Console sinks for logspy.
//!
//! A [`ConsoleSink`] receives the lines a capturing logger mirrors to the
//! console. Routing of levels to sinks is configuration; nothing here touches
//! process-wide stream state.
//!
//! - [`StdoutSink`] / [`StderrSink`] write to the process streams
//! - [`NoopSink`] discards everything
//! - [`WriterSink`] wraps any `io::Write`
//! - [`testing::CaptureSink`] keeps lines in memory for assertions

#![forbid(unsafe_code)]

pub mod sink;
pub mod testing; // Test utilities

pub use sink::{ConsoleSink, NoopSink, StderrSink, StdoutSink, WriterSink, noop, stderr, stdout};
pub use testing::CaptureSink;

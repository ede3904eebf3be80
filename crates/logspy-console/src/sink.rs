//! Line-oriented console sinks.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

/// Anything that accepts whole lines of console output.
///
/// Writes are best-effort: callers report failures but never retry.
pub trait ConsoleSink: Send + Sync {
    /// Write one line; the sink supplies the line terminator.
    fn write_line(&self, line: &str) -> io::Result<()>;

    /// Flush buffered output.
    fn flush(&self) -> io::Result<()>;

    /// Short description used in `Debug` output of settings.
    fn describe(&self) -> &str {
        "sink"
    }

    /// Returns true if this sink discards everything.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Writes to the process's standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ConsoleSink for StdoutSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().flush()
    }

    fn describe(&self) -> &str {
        "stdout"
    }
}

/// Writes to the process's standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl ConsoleSink for StderrSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{line}")
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }

    fn describe(&self) -> &str {
        "stderr"
    }
}

/// Discards all output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ConsoleSink for NoopSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    fn describe(&self) -> &str {
        "noop"
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// Adapts any `io::Write` into a sink.
pub struct WriterSink<W> {
    inner: Mutex<W>,
    label: String,
}

impl<W: Write + Send> WriterSink<W> {
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_label(writer, "writer")
    }

    #[must_use]
    pub fn with_label(writer: W, label: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(writer),
            label: label.into(),
        }
    }

    /// Consume the sink and return the writer.
    pub fn into_inner(self) -> W {
        self.inner
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> ConsoleSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut w = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "writer lock poisoned"))?;
        writeln!(w, "{line}")
    }

    fn flush(&self) -> io::Result<()> {
        let mut w = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "writer lock poisoned"))?;
        w.flush()
    }

    fn describe(&self) -> &str {
        &self.label
    }
}

impl<W> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

static STDOUT: OnceLock<Arc<dyn ConsoleSink>> = OnceLock::new();
static STDERR: OnceLock<Arc<dyn ConsoleSink>> = OnceLock::new();
static NOOP: OnceLock<Arc<dyn ConsoleSink>> = OnceLock::new();

/// Shared stdout sink.
#[must_use]
pub fn stdout() -> Arc<dyn ConsoleSink> {
    STDOUT.get_or_init(|| Arc::new(StdoutSink)).clone()
}

/// Shared stderr sink.
#[must_use]
pub fn stderr() -> Arc<dyn ConsoleSink> {
    STDERR.get_or_init(|| Arc::new(StderrSink)).clone()
}

/// Shared no-op sink.
#[must_use]
pub fn noop() -> Arc<dyn ConsoleSink> {
    NOOP.get_or_init(|| Arc::new(NoopSink)).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_sink_appends_newlines() {
        let sink = WriterSink::new(Vec::new());
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        sink.flush().unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn noop_sink_discards() {
        let sink = NoopSink;
        assert!(sink.write_line("nothing").is_ok());
        assert!(sink.flush().is_ok());
        assert!(sink.is_noop());
    }

    #[test]
    fn shared_sinks_are_singletons() {
        assert!(Arc::ptr_eq(&noop(), &noop()));
        assert!(Arc::ptr_eq(&stderr(), &stderr()));
        assert!(!Arc::ptr_eq(&stdout(), &stderr()));
    }

    #[test]
    fn descriptions() {
        assert_eq!(stdout().describe(), "stdout");
        assert_eq!(stderr().describe(), "stderr");
        assert_eq!(noop().describe(), "noop");
        assert_eq!(WriterSink::with_label(Vec::new(), "buf").describe(), "buf");
        assert!(!stderr().is_noop());
    }
}

//! CaptureSink for capturing console output in tests
//!
//! Provides a sink that keeps every line in memory for assertion instead of
//! writing to a process stream.

use std::io;
use std::sync::{Arc, Mutex};

use strip_ansi_escapes::strip;

use crate::sink::ConsoleSink;

/// A sink that captures output for testing
///
/// Clones share the same buffer, so a test can keep one handle while the
/// other is routed into logger settings as an `Arc<dyn ConsoleSink>`.
pub struct CaptureSink {
    buffer: Arc<Mutex<CaptureBuffer>>,
    label: Arc<str>,
}

#[derive(Debug, Default)]
struct CaptureBuffer {
    /// Lines with ANSI codes stripped
    lines: Vec<String>,
    /// Lines with ANSI codes preserved
    raw_lines: Vec<String>,
    /// Number of flush calls
    flushes: usize,
}

impl CaptureSink {
    /// Create a new empty capture sink
    #[must_use]
    pub fn new() -> Self {
        Self::with_label("capture")
    }

    /// Create a capture sink with a custom description
    #[must_use]
    pub fn with_label(label: &str) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(CaptureBuffer::default())),
            label: Arc::from(label),
        }
    }

    /// This sink as a shareable trait object
    #[must_use]
    pub fn shared(&self) -> Arc<dyn ConsoleSink> {
        Arc::new(self.clone())
    }

    /// Get all captured lines (ANSI codes stripped)
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.lines.clone())
            .unwrap_or_default()
    }

    /// Get all captured lines (with ANSI codes)
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        self.buffer
            .lock()
            .map(|b| b.raw_lines.clone())
            .unwrap_or_default()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// Check if output contains a string (case-sensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.output_string().contains(needle)
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if the joined output matches a regex pattern.
    ///
    /// A pattern that does not compile is returned as an error rather than
    /// reported as a miss.
    pub fn matches(&self, pattern: &str) -> Result<bool, regex::Error> {
        let re = regex::Regex::new(pattern)?;
        Ok(re.is_match(&self.output_string()))
    }

    /// Number of times the sink was flushed
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.buffer.lock().map(|b| b.flushes).unwrap_or_default()
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert output has specific number of lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.output().len();
        assert_eq!(
            actual, expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected, actual, self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.lines.clear();
            buf.raw_lines.clear();
        }
    }
}

impl ConsoleSink for CaptureSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "capture buffer poisoned"))?;

        // Multi-line messages are split so line counts reflect what a
        // terminal would show.
        buffer.raw_lines.extend(line.lines().map(String::from));

        let stripped = strip(line.as_bytes());
        let stripped_str = String::from_utf8_lossy(&stripped);
        buffer.lines.extend(stripped_str.lines().map(String::from));

        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.flushes += 1;
        }
        Ok(())
    }

    fn describe(&self) -> &str {
        &self.label
    }
}

impl Default for CaptureSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CaptureSink {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            label: self.label.clone(),
        }
    }
}

impl std::fmt::Debug for CaptureSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSink")
            .field("label", &self.label)
            .field("line_count", &self.output().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_capture() {
        let sink = CaptureSink::new();
        sink.write_line("Hello, world!").unwrap();
        assert!(sink.contains("Hello"));
        assert!(sink.contains("world"));
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let sink = CaptureSink::new();
        sink.write_line("Hello World").unwrap();
        assert!(sink.contains("World"));
        assert!(!sink.contains("WORLD"));
    }

    #[test]
    fn test_contains_all() {
        let sink = CaptureSink::new();
        sink.write_line("The quick brown fox").unwrap();
        assert!(sink.contains_all(&["quick", "brown", "fox"]));
        assert!(!sink.contains_all(&["quick", "lazy"]));
    }

    #[test]
    fn test_assert_not_contains() {
        let sink = CaptureSink::new();
        sink.write_line("Success").unwrap();
        sink.assert_not_contains("Error");
    }

    #[test]
    fn test_ansi_codes_are_stripped() {
        let sink = CaptureSink::new();
        sink.write_line("\u{1b}[31mERROR\u{1b}[0m bang").unwrap();
        assert_eq!(sink.output(), vec!["ERROR bang".to_string()]);
        assert!(sink.raw_output()[0].contains("\u{1b}[31m"));
    }

    #[test]
    fn test_multiline_is_split() {
        let sink = CaptureSink::new();
        sink.write_line("Line1\nLine2").unwrap();
        sink.assert_line_count(2);
    }

    #[test]
    fn test_clear() {
        let sink = CaptureSink::new();
        sink.write_line("Some output").unwrap();
        assert!(!sink.output().is_empty());
        sink.clear();
        assert!(sink.output().is_empty());
    }

    #[test]
    fn test_matches_regex() {
        let sink = CaptureSink::new();
        sink.write_line("Error code: 42").unwrap();
        assert!(sink.matches(r"code: \d+").unwrap());
        assert!(!sink.matches(r"code: [a-z]+").unwrap());
        assert!(sink.matches(r"(").is_err());
    }

    #[test]
    fn test_clone_shares_buffer() {
        let sink = CaptureSink::new();
        let shared = sink.shared();
        shared.write_line("Test").unwrap();
        shared.flush().unwrap();
        assert!(sink.contains("Test"));
        assert_eq!(sink.flush_count(), 1);
    }

    #[test]
    fn test_label() {
        assert_eq!(CaptureSink::default().describe(), "capture");
        assert_eq!(CaptureSink::with_label("errors").describe(), "errors");
    }
}

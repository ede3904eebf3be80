//! Whole-text regular expressions.

use std::fmt;

use logspy_core::{LogspyError, Result};
use regex::{Regex, RegexBuilder};

/// A regular expression that must match an entire message.
///
/// [`TextPattern::new`] lets `.` match newlines, so a pattern such as
/// `Line1.*` matches the whole of `"Line1\nLine2"`. [`TextPattern::single_line`]
/// keeps the stricter dialect where `.` stops at a newline.
#[derive(Clone)]
pub struct TextPattern {
    source: String,
    regex: Regex,
    spans_lines: bool,
}

impl TextPattern {
    /// Compile a whole-text pattern in which `.` also matches newlines.
    pub fn new(pattern: &str) -> Result<Self> {
        Self::compile(pattern, true)
    }

    /// Compile a whole-text pattern in which `.` does not match newlines.
    pub fn single_line(pattern: &str) -> Result<Self> {
        Self::compile(pattern, false)
    }

    /// A pattern matching exactly `text`.
    pub fn literal(text: &str) -> Result<Self> {
        Self::compile(&regex::escape(text), true)
    }

    fn compile(pattern: &str, spans_lines: bool) -> Result<Self> {
        // Validate on its own first: a stray `)` could otherwise close the
        // anchoring group and leave the rest unanchored.
        Regex::new(pattern).map_err(|e| LogspyError::pattern(pattern, e))?;
        let regex = anchored(pattern, spans_lines)
            .build()
            .map_err(|e| LogspyError::pattern(pattern, e))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
            spans_lines,
        })
    }

    /// Returns true if the pattern matches all of `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The pattern as supplied (escaped for literals).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `.` matches newlines.
    #[must_use]
    pub fn spans_lines(&self) -> bool {
        self.spans_lines
    }
}

fn anchored(pattern: &str, spans_lines: bool) -> RegexBuilder {
    let mut builder = RegexBuilder::new(&format!(r"\A(?:{pattern})\z"));
    builder.dot_matches_new_line(spans_lines);
    builder
}

impl fmt::Debug for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextPattern")
            .field("source", &self.source)
            .field("spans_lines", &self.spans_lines)
            .finish()
    }
}

impl fmt::Display for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_whole_text_only() {
        let p = TextPattern::new("bang").unwrap();
        assert!(p.is_match("bang"));
        assert!(!p.is_match("big bang"));
        assert!(!p.is_match("bang!"));
    }

    #[test]
    fn alternation_is_anchored_as_a_group() {
        let p = TextPattern::new("a|b").unwrap();
        assert!(p.is_match("a"));
        assert!(p.is_match("b"));
        assert!(!p.is_match("ab"));
        assert!(!p.is_match("xa"));
    }

    #[test]
    fn default_dialect_spans_lines() {
        let p = TextPattern::new("Line1.*").unwrap();
        assert!(p.spans_lines());
        assert!(p.is_match("Line1\nLine2"));
    }

    #[test]
    fn single_line_dialect_stops_at_newline() {
        let p = TextPattern::single_line("Line1.*").unwrap();
        assert!(!p.is_match("Line1\nLine2"));
        assert!(p.is_match("Line1 and more"));
    }

    #[test]
    fn literal_escapes_metacharacters() {
        let p = TextPattern::literal("cost: $5 (approx.)").unwrap();
        assert!(p.is_match("cost: $5 (approx.)"));
        assert!(!p.is_match("cost: $5 (approxx)"));
    }

    #[test]
    fn unbalanced_group_cannot_escape_anchoring() {
        let err = TextPattern::new("bang)|(zzz").unwrap_err();
        assert!(matches!(err, LogspyError::Pattern { ref pattern, .. } if pattern == "bang)|(zzz"));
        assert!(TextPattern::single_line("a)(b").is_err());
    }

    #[test]
    fn inline_multiline_flag_keeps_whole_text_anchoring() {
        let p = TextPattern::new("(?m)Line1").unwrap();
        assert!(!p.is_match("Line1\nLine2"));
        assert!(p.is_match("Line1"));
    }

    #[test]
    fn malformed_pattern_is_reported() {
        let err = TextPattern::new("([a-z]").unwrap_err();
        assert!(matches!(err, LogspyError::Pattern { ref pattern, .. } if pattern == "([a-z]"));
    }
}

//! Message template rendering.
//!
//! Templates use `{}` as a positional placeholder:
//!
//! ```
//! use logspy_core::{Arg, render};
//!
//! let user = "ada";
//! let attempts = 3;
//! let text = render("user {} failed {} times", &[Arg::from(&user), Arg::from(&attempts)]);
//! assert_eq!(text, "user ada failed 3 times");
//! ```
//!
//! `\{}` renders a literal `{}` without consuming an argument, and `\\{}`
//! renders a single backslash followed by the argument. Placeholders left
//! without an argument stay literal and surplus arguments are ignored.
//!
//! If the last argument is an [`Arg::Error`] it is never substituted; its
//! message and `source()` chain are appended after a newline instead.

use std::error::Error as StdError;
use std::fmt;

const DELIM: &str = "{}";
const ESCAPE: u8 = b'\\';

/// A positional argument to a logging call.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    /// A value substituted into a placeholder.
    Value(&'a dyn fmt::Display),
    /// An error; rendered as a trailing trace when it is the last argument.
    Error(&'a (dyn StdError + 'static)),
}

impl<'a> Arg<'a> {
    /// Wrap a displayable value.
    pub fn value(value: &'a dyn fmt::Display) -> Self {
        Arg::Value(value)
    }

    /// Wrap an error so it is rendered as a trailing trace.
    pub fn error(err: &'a (dyn StdError + 'static)) -> Self {
        Arg::Error(err)
    }

    /// The error, if this argument carries one.
    #[must_use]
    pub fn as_error(&self) -> Option<&'a (dyn StdError + 'static)> {
        match self {
            Arg::Error(err) => Some(*err),
            Arg::Value(_) => None,
        }
    }
}

impl<'a, T: fmt::Display> From<&'a T> for Arg<'a> {
    fn from(value: &'a T) -> Self {
        Arg::Value(value)
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => v.fmt(f),
            Arg::Error(e) => e.fmt(f),
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(v) => f.debug_tuple("Value").field(&v.to_string()).finish(),
            Arg::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
        }
    }
}

/// Render a template against positional arguments.
///
/// Never fails: malformed templates degrade to literal text.
#[must_use]
pub fn render(template: &str, args: &[Arg<'_>]) -> String {
    let (values, trailing) = match args.split_last() {
        Some((last, rest)) if last.as_error().is_some() => (rest, last.as_error()),
        _ => (args, None),
    };

    let mut out = substitute(template, values);
    if let Some(err) = trailing {
        out.push('\n');
        out.push_str(&error_trace(err));
    }
    out
}

fn substitute(template: &str, values: &[Arg<'_>]) -> String {
    if values.is_empty() {
        return template.to_string();
    }

    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len() + 16 * values.len());
    let mut i = 0;
    let mut next = 0;

    while next < values.len() {
        let Some(offset) = template[i..].find(DELIM) else {
            break;
        };
        let j = i + offset;

        let escaped = j >= 1 && bytes[j - 1] == ESCAPE;
        let double_escaped = escaped && j >= 2 && bytes[j - 2] == ESCAPE;

        if escaped && !double_escaped {
            // `\{}`: drop the backslash, keep the braces, consume nothing
            out.push_str(&template[i..j - 1]);
            out.push('{');
            i = j + 1;
            continue;
        }

        let literal_end = if double_escaped { j - 1 } else { j };
        out.push_str(&template[i..literal_end]);
        out.push_str(&values[next].to_string());
        next += 1;
        i = j + DELIM.len();
    }

    out.push_str(&template[i..]);
    out
}

/// Message and cause chain of an error, one per line.
#[must_use]
pub fn error_trace(err: &(dyn StdError + 'static)) -> String {
    let mut trace = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        trace.push_str("\nCaused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}

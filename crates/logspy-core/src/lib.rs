//! Core types and traits for logspy.
//!
//! This crate provides the fundamental building blocks shared by the
//! capture engine and the console sinks:
//! - [`Level`] and [`LevelSet`] for per-level enablement
//! - [`Record`], the immutable captured log entry
//! - [`Arg`] and [`render`] for `{}`-style message templates
//! - The [`Logger`] trait, the logging-call surface implemented by capturing
//!   loggers and by delegates
//! - [`LogspyError`] for configuration and pattern failures
//!
//! # Design Principles
//!
//! - Enablement is set membership, never a severity threshold
//! - Records are immutable once created and shared behind `Arc`
//! - All types support `Send + Sync`

#![forbid(unsafe_code)]

mod error;
mod level;
pub mod logging;
mod logger;
mod record;
mod render;

pub use error::{LogspyError, Result};
pub use level::{Level, LevelSet};
pub use logger::{Logger, LoggerFactory};
pub use record::{Record, current_origin};
pub use render::{Arg, render};

//! Internal diagnostics for logspy.
//!
//! logspy reports on itself through the standard [`log`] facade, on targets
//! under `logspy`. Those targets are never captured by the logspy bridges, so
//! a registry installed as the global logger does not record its own
//! diagnostics.
//!
//! # Log Levels
//!
//! - **debug**: logger creation, settings swaps, sink write failures
//! - **trace**: per-call dispatch decisions
//!
//! Example filter: `RUST_LOG=logspy::registry=debug`

// Re-export log macros for ergonomic use
pub use log::{debug, trace, warn};

/// Log targets used by logspy components.
pub mod targets {
    /// Root target for all logspy diagnostics.
    pub const LOGSPY: &str = "logspy";

    /// Logger creation and registry-wide operations.
    pub const REGISTRY: &str = "logspy::registry";

    /// Capture, console mirroring and delegate forwarding.
    pub const ENGINE: &str = "logspy::engine";

    /// Settings construction from the environment or files.
    pub const CONFIG: &str = "logspy::config";
}

/// Returns true if `target` belongs to logspy's own diagnostics.
#[inline]
#[must_use]
pub fn is_internal_target(target: &str) -> bool {
    target == targets::LOGSPY
        || target
            .strip_prefix(targets::LOGSPY)
            .is_some_and(|rest| rest.starts_with("::"))
}

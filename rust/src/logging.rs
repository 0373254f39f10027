//! Logging macros with verbosity level control.
//!
//! Events go through `tracing`; the host installs whatever subscriber it wants.
//! Verbosity levels:
//! - 0: SILENT (only warnings and errors)
//! - 1: CHANGES (date shifts, recalculated projects) at `info`
//! - 2: CHECKS (availability checks, derived edges) at `debug`
//! - 3: DEBUG (per-task pass internals) at `trace`

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
///
/// Used for: start date shifts, task writes, critical set changes.
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            ::tracing::info!($($arg)*);
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
///
/// Used for: resource availability checks, implicit dependency decisions.
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            ::tracing::debug!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
///
/// Used for: forward/backward pass internals.
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            ::tracing::trace!($($arg)*);
        }
    };
}

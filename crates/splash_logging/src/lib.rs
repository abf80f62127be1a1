#![deny(missing_docs)]
//! Shared logging utilities for the splash workspace.
//!
//! This crate provides the `splash_*` logging macros used across the codebase,
//! a boot-clock helper for stamping progress lines, and a minimal test
//! initializer for the global logger.

use std::cell::Cell;
use std::time::Instant;

thread_local! {
    /// Thread-local storage for the boot start instant.
    static BOOT_START: Cell<Option<Instant>> = const { Cell::new(None) };
}

/// Marks the start of the boot sequence for the current thread.
/// This should be called once when the flow begins.
pub fn mark_boot_start() {
    BOOT_START.with(|v| v.set(Some(Instant::now())));
}

/// Milliseconds elapsed since [`mark_boot_start`] on the current thread.
/// Returns 0 if the boot start has not been marked.
pub fn boot_elapsed_ms() -> u64 {
    BOOT_START.with(|v| {
        v.get()
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0)
    })
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! splash_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! splash_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! splash_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! splash_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! splash_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

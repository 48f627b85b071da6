// src/exec/mod.rs

//! External process execution: structured command lines, credential masking,
//! and the timeout-enforcing runner.

pub mod cmdline;
pub mod runner;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub use cmdline::{mask_credentials, CommandLine, MASK};

/// Exit code reported when a command exceeds its timeout, matching the
/// convention of GNU `timeout`.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code reported when the runner itself fails (spawn/wait error),
/// distinct from both success and timeout.
pub const INTERNAL_ERROR_EXIT_CODE: i32 = 125;

/// Trait abstracting how command lines are executed.
///
/// Production code uses [`ProcessRunner`]; tests can provide their own
/// implementation that records invocations and scripts exit codes instead of
/// spawning real processes.
pub trait CommandRunner: Send + Sync {
    /// Execute `cmdline`, relaying its output, and return its exit code
    /// (or [`TIMEOUT_EXIT_CODE`] / [`INTERNAL_ERROR_EXIT_CODE`]).
    fn run<'a>(
        &'a self,
        name: &'a str,
        cmdline: &'a CommandLine,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = i32> + Send + 'a>>;
}

/// Real runner used in production: spawns an OS process per command.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        name: &'a str,
        cmdline: &'a CommandLine,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = i32> + Send + 'a>> {
        Box::pin(runner::run_with_timeout(name, cmdline, timeout))
    }
}

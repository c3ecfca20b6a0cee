//! context
//!
//! Execution context shared by every command.

use crate::debug::DebugLog;
use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags and the environment.
/// It is built once in [`crate::cli::run`] and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Interactive mode enabled.
    pub interactive: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            debug: false,
            quiet: false,
            interactive: true,
        }
    }
}

impl Context {
    /// The trace channel components should log through.
    pub fn log(&self) -> DebugLog {
        DebugLog::new(self.debug)
    }

    /// Output verbosity derived from the quiet/debug flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

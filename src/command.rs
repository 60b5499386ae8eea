use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Continuation signal returned by every dispatched command.
///
/// This is the only value that crosses the dispatcher boundary: commands
/// report their own failures to the error stream and then tell the
/// interactive loop whether to keep prompting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Prompt for the next line.
    Continue,
    /// Leave the interactive loop.
    Exit,
}

/// Object-safe trait for any command the interpreter can execute.
///
/// This is implemented by built-ins via a blanket impl and by external
/// commands. Output and diagnostics go to the injected streams so callers
/// (and tests) can capture them.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`.
/// Implementations can use the environment to resolve executables (e.g., using PATH).
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>>;
}

use crate::command::{CommandFactory, ExecutableCommand, Status};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Names of the registered builtins, in registration order.
///
/// `help` prints this list; the dispatcher's factory list must register the
/// builtins in the same order.
pub const BUILTIN_NAMES: &[&str] = &["cd", "help", "exit"];

/// Built-in commands known to the interpreter at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process without spawning a child process. Every builtin
/// reports its own failures to `stderr` and returns a [`Status`] — failures
/// never escape as interpreter-level errors.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "exit".
    fn name() -> &'static str;

    /// Executes the command using the provided IO streams and environment.
    fn execute(
        self,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status> {
        match T::execute(*self, stdout, stderr, env) {
            Ok(status) => Ok(status),
            Err(e) => {
                writeln!(stderr, "lsh: {}", e)?;
                Ok(Status::Continue)
            }
        }
    }
}

/// Command created when `argh` rejects a builtin invocation; prints the
/// generated usage or error text and keeps the loop running.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<Status> {
        if self.is_error {
            write!(stderr, "{}", self.output)?;
        } else {
            write!(stdout, "{}", self.output)?;
        }
        Ok(Status::Continue)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status> {
        let target = match &self.target {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => {
                writeln!(stderr, "lsh: expected argument to \"cd\"")?;
                return Ok(Status::Continue);
            }
        };

        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = match fs::canonicalize(&new_dir) {
            Ok(p) => p,
            Err(e) => {
                writeln!(stderr, "lsh: cd: {}: {}", new_dir.display(), e)?;
                return Ok(Status::Continue);
            }
        };
        if let Err(e) = env::set_current_dir(&canonical) {
            writeln!(stderr, "lsh: cd: {}: {}", canonical.display(), e)?;
            return Ok(Status::Continue);
        }
        env.current_dir = canonical;
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// Print the list of built-in commands.
pub struct Help {
    #[argh(positional, greedy)]
    /// ignored; help takes no arguments.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<Status> {
        writeln!(stdout, "lsh: a minimal command interpreter")?;
        writeln!(stdout, "Type a program name and arguments, then hit enter.")?;
        writeln!(stdout, "The following commands are built in:")?;
        for name in BUILTIN_NAMES {
            writeln!(stdout, "    {}", name)?;
        }
        writeln!(stdout, "Use the man command for information on other programs.")?;
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// Leave the interpreter.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored; exit takes no arguments.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(
        self,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<Status> {
        Ok(Status::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // The working directory is process-global, so cd tests serialize on this.
    static CWD_LOCK: Mutex<()> = Mutex::new(());

    fn run_builtin<T: BuiltinCommand + 'static>(
        name: &str,
        args: &[&str],
        env: &mut Environment,
    ) -> (Status, String, String) {
        let factory = Factory::<T>::default();
        let cmd = factory
            .try_create(env, name, args)
            .expect("factory should recognize its own name");
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let status = cmd.execute(&mut out, &mut err, env).unwrap();
        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn factory_rejects_other_names() {
        let env = Environment::new();
        let factory = Factory::<Cd>::default();
        assert!(factory.try_create(&env, "help", &[]).is_none());
    }

    #[test]
    fn cd_without_argument_is_a_usage_error() {
        let _guard = CWD_LOCK.lock().unwrap();
        let before = std::env::current_dir().unwrap();
        let mut env = Environment::new();

        let (status, out, err) = run_builtin::<Cd>("cd", &[], &mut env);

        assert_eq!(status, Status::Continue);
        assert!(out.is_empty());
        assert!(err.contains("expected argument to \"cd\""));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn cd_to_missing_directory_reports_and_continues() {
        let _guard = CWD_LOCK.lock().unwrap();
        let before = std::env::current_dir().unwrap();
        let mut env = Environment::new();

        let (status, _out, err) =
            run_builtin::<Cd>("cd", &["/nonexistent-path-xyz"], &mut env);

        assert_eq!(status, Status::Continue);
        assert!(err.contains("/nonexistent-path-xyz"));
        assert_eq!(std::env::current_dir().unwrap(), before);
        assert_eq!(env.current_dir, before);
    }

    #[test]
    fn cd_changes_the_working_directory() {
        let _guard = CWD_LOCK.lock().unwrap();
        let before = std::env::current_dir().unwrap();
        let target = std::env::temp_dir().join(format!("lsh_cd_test_{}", std::process::id()));
        std::fs::create_dir_all(&target).unwrap();
        let mut env = Environment::new();

        let (status, _out, err) =
            run_builtin::<Cd>("cd", &[target.to_str().unwrap()], &mut env);

        let after = std::env::current_dir().unwrap();
        // Restore early so a failed assertion doesn't poison other tests.
        std::env::set_current_dir(&before).unwrap();
        let _ = std::fs::remove_dir_all(&target);

        assert_eq!(status, Status::Continue);
        assert!(err.is_empty());
        let expected = std::fs::canonicalize(&target).unwrap_or(target);
        assert_eq!(after, expected);
        assert_eq!(env.current_dir, expected);
    }

    #[test]
    fn help_lists_each_builtin_once_in_order() {
        let mut env = Environment::new();
        let (status, out, err) = run_builtin::<Help>("help", &[], &mut env);

        assert_eq!(status, Status::Continue);
        assert!(err.is_empty());

        let mut last = 0;
        for name in BUILTIN_NAMES {
            assert_eq!(
                out.matches(&format!("    {}\n", name)).count(),
                1,
                "{} should be listed exactly once",
                name
            );
            let pos = out.find(&format!("    {}\n", name)).unwrap();
            assert!(pos >= last, "{} listed out of registration order", name);
            last = pos;
        }
    }

    #[test]
    fn exit_returns_exit_with_no_output() {
        let mut env = Environment::new();
        let (status, out, err) = run_builtin::<Exit>("exit", &[], &mut env);

        assert_eq!(status, Status::Exit);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }
}

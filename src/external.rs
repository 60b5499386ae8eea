use crate::command::{CommandFactory, ExecutableCommand, Status};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::Result;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};

/// Command that is not a builtin: launched as a child process.
///
/// The launcher owns the child handle for the duration of the call and does
/// not return until the child has reached a terminal state, so no zombie is
/// left behind for this launch. The child's exit status is not inspected;
/// only a failure to launch is diagnosed.
pub struct ExternalCommand {
    name: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: OsString, args: Vec<OsString>) -> Self {
        Self { name, args }
    }

    /// Resolve the program and create the child process.
    ///
    /// The child inherits the interpreter's standard streams and working
    /// directory. Any failure (unknown program, not executable) is reported
    /// to `stderr` here and surfaces as `None`; the caller is never asked
    /// to retry.
    fn spawn(&self, env: &Environment, stderr: &mut dyn Write) -> Result<Option<Child>> {
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let name = Path::new(&self.name);
        let Some(program) = find_command_path(OsStr::new(&search_paths), name) else {
            writeln!(stderr, "lsh: {}: command not found", name.display())?;
            return Ok(None);
        };

        match Command::new(program.as_ref())
            .args(&self.args)
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()
        {
            Ok(child) => Ok(Some(child)),
            Err(e) => {
                writeln!(stderr, "lsh: {}: {}", name.display(), e)?;
                Ok(None)
            }
        }
    }
}

/// Block until the child reaches a terminal state (exited or killed by a
/// signal). A merely-stopped child does not end the wait; `wait` resumes
/// waiting through stop/continue transitions on its own.
fn await_child(child: &mut Child) -> std::io::Result<ExitStatus> {
    child.wait()
}

impl CommandFactory for Factory<ExternalCommand> {
    /// The external factory is the dispatcher's fallback: it accepts every
    /// non-empty name and lets the launch itself diagnose unknown programs.
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name.is_empty() {
            return None;
        }
        Some(Box::new(ExternalCommand::new(
            name.into(),
            args.iter().map(|x| x.into()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Status> {
        if let Some(mut child) = self.spawn(env, stderr)? {
            if let Err(e) = await_child(&mut child) {
                writeln!(stderr, "lsh: {}: {}", Path::new(&self.name).display(), e)?;
            }
        }
        // Launch outcomes never end the interactive loop.
        Ok(Status::Continue)
    }
}

/// Resolve a command path the way a typical shell would.
///
/// Absolute paths and multi-component relative paths (e.g. `bin/sh`) are
/// taken as-is if they exist; `./`-prefixed paths are looked up in the
/// current directory; a bare single-component name is searched through each
/// directory of `search_paths` (PATH) in order, first hit wins. An empty
/// path resolves to nothing.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return existing(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => None,
        (Some(name), None) => search_dirs(search_paths, name.as_os_str()).map(Cow::Owned),
        _ => existing(path).map(Cow::Borrowed),
    }
}

fn search_dirs(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| candidate.exists())
}

fn existing(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(name: &str, args: &[&str]) -> (Status, String) {
        let mut env = Environment::new();
        let factory = Factory::<ExternalCommand>::default();
        let cmd = factory.try_create(&env, name, args).unwrap();
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let status = cmd.execute(&mut out, &mut err, &mut env).unwrap();
        (status, String::from_utf8(err).unwrap())
    }

    #[test]
    #[cfg(unix)]
    fn resolves_existing_absolute_path() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(OsStr::new("/bin"), path).expect("should find /bin/sh");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn rejects_missing_absolute_path() {
        let res = find_command_path(OsStr::new("/bin"), Path::new("/bin/nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn searches_path_for_bare_names() {
        let found =
            find_command_path(OsStr::new("/bin"), Path::new("sh")).expect("sh should be in /bin");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn bare_name_missing_from_every_path_dir() {
        let res = find_command_path(OsStr::new("/bin"), Path::new("nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    fn empty_path_resolves_to_nothing() {
        let res = find_command_path(OsStr::new("/bin"), Path::new(""));
        assert!(res.is_none());
    }

    #[test]
    fn factory_rejects_empty_name() {
        let env = Environment::new();
        let factory = Factory::<ExternalCommand>::default();
        assert!(factory.try_create(&env, "", &[]).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn launching_true_waits_and_continues() {
        let (status, err) = launch("true", &[]);
        assert_eq!(status, Status::Continue);
        assert!(err.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn child_exit_status_is_ignored() {
        // `false` exits non-zero; the launcher still reports nothing and
        // continues.
        let (status, err) = launch("false", &[]);
        assert_eq!(status, Status::Continue);
        assert!(err.is_empty());
    }

    #[test]
    fn unknown_program_is_diagnosed_and_continues() {
        let (status, err) = launch("this-program-does-not-exist", &[]);
        assert_eq!(status, Status::Continue);
        assert!(err.contains("this-program-does-not-exist"));
    }
}

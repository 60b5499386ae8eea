use crate::command::{CommandFactory, Status};
use crate::env::Environment;
use crate::lexer;
use crate::reader;
use anyhow::Result;
use std::io::{Read, Write};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate — builtins and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that reads lines, tokenizes them, and
/// executes built-in or external commands.
///
/// The interpreter maintains an [`Environment`] and an ordered list of
/// [`CommandFactory`] objects that are queried to create commands by name;
/// the first factory that recognizes a name wins, so registration order is
/// the lookup order. See [`Default`] for the factories included out of the
/// box.
///
/// Example
/// ```
/// use lsh::{Interpreter, Status};
/// let mut sh = Interpreter::default();
/// let status = sh.dispatch(&["exit".to_string()]);
/// assert_eq!(status, Status::Exit);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// Execute one tokenized command line and report whether the loop
    /// should keep prompting.
    ///
    /// An empty token slice is a no-op `Continue`. Otherwise the first token
    /// names the command and the rest are its arguments.
    pub fn dispatch(&mut self, tokens: &[String]) -> Status {
        self.dispatch_with_io(tokens, &mut std::io::stdout(), &mut std::io::stderr())
    }

    fn dispatch_with_io(
        &mut self,
        tokens: &[String],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Status {
        let Some((name, rest)) = tokens.split_first() else {
            return Status::Continue;
        };
        let args: Vec<&str> = rest.iter().map(|s| s.as_str()).collect();

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, &args) {
                return match cmd.execute(stdout, stderr, &mut self.env) {
                    Ok(status) => status,
                    Err(e) => {
                        // A failure to even write a diagnostic stays at this
                        // boundary; only the continuation signal crosses it.
                        let _ = writeln!(stderr, "lsh: {}", e);
                        Status::Continue
                    }
                };
            }
        }
        Status::Continue
    }

    /// The read-tokenize-dispatch cycle over arbitrary streams.
    ///
    /// Prompts, reads one line, tokenizes it, dispatches, and repeats until
    /// a command returns [`Status::Exit`] or the input reaches end-of-input.
    /// Line and token storage lives for exactly one iteration.
    pub fn run_loop(
        &mut self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        errors: &mut dyn Write,
    ) -> Result<()> {
        loop {
            write!(output, "> ")?;
            output.flush()?;

            let Some(line) = reader::read_line(input)? else {
                // Closed input: stop prompting instead of spinning forever.
                break;
            };
            let tokens = lexer::split_into_tokens(&line);
            match self.dispatch_with_io(&tokens, output, errors) {
                Status::Continue => {}
                Status::Exit => break,
            }
        }
        Ok(())
    }

    /// Run the interactive loop over the process's standard streams.
    pub fn repl(&mut self) -> Result<()> {
        let mut stdin = std::io::stdin().lock();
        self.run_loop(&mut stdin, &mut std::io::stdout(), &mut std::io::stderr())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands: the builtins
    /// `cd`, `help`, `exit` (in that lookup order) and the external command
    /// launcher as the fallback.
    fn default() -> Self {
        use crate::builtin::{Cd, Exit, Help};
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Help>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}

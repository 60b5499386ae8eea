//! A tiny interactive command interpreter.
//!
//! This crate provides the minimal building blocks of a shell: a line
//! reader, a whitespace tokenizer, a small set of built-in commands
//! executed in-process, and a launcher for external programs that waits
//! for each child before the next prompt. It is intentionally small and
//! easy to read; there are no pipelines, redirections, quoting rules, or
//! job control.
//!
//! The main entry point is [`Interpreter`], which runs the
//! read-tokenize-dispatch cycle and can also execute single token
//! sequences directly. The public modules [`command`] and [`env`] expose
//! the traits and types for implementing your own commands and for
//! interacting with the process environment.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
pub mod lexer;
pub mod reader;

pub use builtin::BUILTIN_NAMES;
pub use command::Status;
pub use interpreter::Interpreter;

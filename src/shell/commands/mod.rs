pub mod builtins;
pub mod simple;
pub mod system;

use crate::shell::ast::SimpleCommand;
use crate::shell::context::ShellContext;
use crate::shell::io::Streams;
use crate::shell::outcome::Outcome;
use anyhow::Result;
use colored::*;
use log::error;

/// A command that runs inside the shell process instead of a child.
///
/// Implementations receive the whole command, redirections included, and
/// decide how to honour them. An `Err` is reported and becomes status 1.
pub trait Executable: Send + Sync {
    fn execute(&self, cmd: &SimpleCommand, ctx: &mut ShellContext, io: &Streams) -> Result<Outcome>;
}

/// Reports a failure on stderr and in the log.
pub fn report(err: &anyhow::Error) {
    error!("{:#}", err);
    eprintln!("{} {:#}", "fsh:".red().bold(), err);
}

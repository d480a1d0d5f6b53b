// Exit command

use crate::shell::ast::SimpleCommand;
use crate::shell::commands::Executable;
use crate::shell::context::ShellContext;
use crate::shell::io::Streams;
use crate::shell::outcome::Outcome;
use anyhow::Result;

/// `exit` / `quit`: ends the session. Arguments and redirections are ignored.
pub struct ExitCommand;

impl Executable for ExitCommand {
    fn execute(&self, _cmd: &SimpleCommand, _ctx: &mut ShellContext, _io: &Streams) -> Result<Outcome> {
        Ok(Outcome::Terminate)
    }
}

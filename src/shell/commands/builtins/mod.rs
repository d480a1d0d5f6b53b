pub mod cd;
pub mod exit;

use crate::shell::context::ShellContext;
use std::sync::Arc;

pub const CD: &str = "cd";
pub const EXIT: &str = "exit";
pub const QUIT: &str = "quit";

/// Helper to register all built-in commands at once
pub fn register_all_builtins(ctx: &mut ShellContext) {
    let builtins: [(&str, Arc<dyn crate::shell::commands::Executable>); 3] = [
        (CD, Arc::new(cd::CdCommand)),
        (EXIT, Arc::new(exit::ExitCommand)),
        (QUIT, Arc::new(exit::ExitCommand)),
    ];
    for (name, command) in builtins {
        if let Err(e) = ctx.register_command(name, command) {
            log::error!("failed to register builtin '{}': {:#}", name, e);
        }
    }
}

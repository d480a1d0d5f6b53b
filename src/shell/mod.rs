pub mod ast;
pub mod commands;
pub mod compose;
pub mod context;
pub mod executor;
pub mod io;
pub mod outcome;
pub mod process;
pub mod session;

use ast::CommandNode;
use context::ShellContext;
use executor::execute;
use io::Streams;
use outcome::Outcome;


/// Executes one tree with the process's own standard streams.
pub fn run_tree(tree: &CommandNode, ctx: &mut ShellContext) -> Outcome {
    execute(tree, 0, None, ctx, &Streams::inherit())
}

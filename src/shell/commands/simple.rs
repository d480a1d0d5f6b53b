use crate::shell::ast::{Operator, SimpleCommand};
use crate::shell::commands::{report, system};
use crate::shell::context::ShellContext;
use crate::shell::io::Streams;
use crate::shell::outcome::Outcome;
use anyhow::anyhow;
use log::debug;

/// Runs one leaf: a registered built-in, an environment assignment, or an
/// external program, checked in that order.
pub fn run_simple(
    cmd: &SimpleCommand,
    depth: usize,
    parent: Option<Operator>,
    ctx: &mut ShellContext,
    io: &Streams,
) -> Outcome {
    let parent = parent.map(Operator::symbol).unwrap_or("-");
    if let Some(builtin) = ctx.lookup(&cmd.verb) {
        debug!("[{}] (parent {}) builtin '{}'", depth, parent, cmd.verb);
        return match builtin.execute(cmd, ctx, io) {
            Ok(outcome) => outcome,
            Err(e) => {
                report(&e);
                Outcome::FAILURE
            }
        };
    }

    if let Some((name, value)) = split_assignment(&cmd.verb) {
        return assign(ctx, name, value);
    }

    debug!("[{}] (parent {}) external '{}'", depth, parent, cmd.verb);
    system::run_external(cmd, ctx, io)
}

/// Splits `NAME=value`. The name ends at the first `=`, a run of `=` after it
/// is skipped and the value stops at the next `=`: `A=b=c` and `A==b` both
/// give `("A", "b")`. `None` when the verb has no `=`.
fn split_assignment(verb: &str) -> Option<(&str, &str)> {
    let (name, rest) = verb.split_once('=')?;
    let value = rest.trim_start_matches('=').split('=').next().unwrap_or("");
    Some((name, value))
}

/// `NAME=value`: defines or overwrites a variable in the context's environment.
fn assign(ctx: &mut ShellContext, name: &str, value: &str) -> Outcome {
    if name.is_empty() || value.is_empty() {
        report(&anyhow!("Invalid assignment: '{}={}'", name, value));
        return Outcome::FAILURE;
    }
    debug!("set {}={}", name, value);
    ctx.set_var(name, value);
    Outcome::SUCCESS
}

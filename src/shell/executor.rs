use crate::shell::ast::{CommandNode, Operator};
use crate::shell::commands::simple::run_simple;
use crate::shell::compose::{run_parallel, run_pipe};
use crate::shell::context::ShellContext;
use crate::shell::io::Streams;
use crate::shell::outcome::Outcome;
use log::{Level, log};

/// Executes a tree depth-first and returns its outcome.
///
/// `depth` and `parent` only feed diagnostics. Sequential and conditional
/// operators run the right side strictly after the left one has finished; a
/// `Terminate` from the left side stops the walk at once. Pipe and parallel
/// nodes run both sides concurrently and report 0 or 1.
pub fn execute(
    node: &CommandNode,
    depth: usize,
    parent: Option<Operator>,
    ctx: &mut ShellContext,
    io: &Streams,
) -> Outcome {
    trace_node(node, depth, parent, ctx);

    match node {
        CommandNode::Simple(cmd) => run_simple(cmd, depth, parent, ctx, io),
        CommandNode::Compound { op, left, right } => {
            let op = *op;
            match op {
                Operator::Sequential => {
                    let left_res = execute(left, depth + 1, Some(op), ctx, io);
                    if left_res.is_terminate() {
                        return left_res;
                    }
                    execute(right, depth + 1, Some(op), ctx, io)
                }
                Operator::OnFailure | Operator::OnSuccess => {
                    let left_res = execute(left, depth + 1, Some(op), ctx, io);
                    let proceed = match (op, left_res) {
                        (_, Outcome::Terminate) => false,
                        (Operator::OnFailure, res) => !res.is_success(),
                        (_, res) => res.is_success(),
                    };
                    if proceed {
                        execute(right, depth + 1, Some(op), ctx, io)
                    } else {
                        left_res
                    }
                }
                Operator::Pipe => Outcome::from_success(run_pipe(left, right, depth, ctx, io)),
                Operator::Parallel => Outcome::from_success(run_parallel(left, right, depth, ctx, io)),
            }
        }
    }
}

fn trace_node(node: &CommandNode, depth: usize, parent: Option<Operator>, ctx: &ShellContext) {
    let level = if ctx.trace { Level::Info } else { Level::Debug };
    let parent = parent.map(Operator::symbol).unwrap_or("-");
    match node {
        CommandNode::Simple(cmd) => log!(level, "[{}] (parent {}) {}", depth, parent, cmd),
        CommandNode::Compound { op, .. } => log!(level, "[{}] (parent {}) operator {}", depth, parent, op),
    }
}

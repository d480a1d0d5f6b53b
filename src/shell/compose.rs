use crate::shell::ast::{CommandNode, Operator};
use crate::shell::commands::report;
use crate::shell::context::ShellContext;
use crate::shell::executor::execute;
use crate::shell::io::{Input, Output, Streams};
use anyhow::{Context, anyhow};
use log::debug;
use std::io;
use std::thread::{self, Scope, ScopedJoinHandle};

/// Runs `left` and `right` concurrently as isolated branches and waits for both.
///
/// Success means both branches were started and joined. Their own exit
/// statuses are not inspected.
pub fn run_parallel(
    left: &CommandNode,
    right: &CommandNode,
    depth: usize,
    ctx: &ShellContext,
    io: &Streams,
) -> bool {
    let (left_io, right_io) = match (io.try_clone(), io.try_clone()) {
        (Ok(l), Ok(r)) => (l, r),
        (Err(e), _) | (_, Err(e)) => {
            report(&anyhow!(e).context("Failed to duplicate streams for parallel branches"));
            return false;
        }
    };

    thread::scope(|scope| {
        let left_branch = spawn_branch(scope, left, depth, Operator::Parallel, ctx, left_io);
        let right_branch = spawn_branch(scope, right, depth, Operator::Parallel, ctx, right_io);

        // Join whatever did start, even when the other side failed.
        let left_status = left_branch.map(wait_branch);
        let right_status = right_branch.map(wait_branch);

        match (left_status, right_status) {
            (Some(Some(l)), Some(Some(r))) => {
                debug!("[{}] parallel branches exited {} and {}", depth, l, r);
                true
            }
            _ => false,
        }
    })
}

/// Runs `left | right`: the left branch's stdout feeds the right branch's stdin.
///
/// Success means both branches were started and joined and the right branch
/// exited with 0; the left branch's status is ignored.
pub fn run_pipe(
    left: &CommandNode,
    right: &CommandNode,
    depth: usize,
    ctx: &ShellContext,
    io: &Streams,
) -> bool {
    let (reader, writer) = match os_pipe::pipe().context("Pipe error") {
        Ok(ends) => ends,
        Err(e) => {
            report(&e);
            return false;
        }
    };

    // Each branch takes one end; the orchestrator keeps neither.
    let branch_io = io
        .try_clone()
        .and_then(|l| Ok((l, io.try_clone()?)))
        .map(|(l, r)| (l.with_stdout(Output::Pipe(writer)), r.with_stdin(Input::Pipe(reader))));
    let (left_io, right_io) = match branch_io {
        Ok(pair) => pair,
        Err(e) => {
            report(&anyhow!(e).context("Failed to duplicate streams for pipe"));
            return false;
        }
    };

    thread::scope(|scope| {
        let left_branch = spawn_branch(scope, left, depth, Operator::Pipe, ctx, left_io);
        let right_branch = spawn_branch(scope, right, depth, Operator::Pipe, ctx, right_io);

        let left_status = left_branch.map(wait_branch);
        let right_status = right_branch.map(wait_branch);

        match (left_status, right_status) {
            (Some(Some(l)), Some(Some(r))) => {
                debug!("[{}] pipe stages exited {} and {}", depth, l, r);
                r == 0
            }
            _ => false,
        }
    })
}

/// Starts one branch on its own thread with a cloned context.
/// The branch owns `streams` and drops them (closing pipe ends) when done.
fn spawn_branch<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    node: &'env CommandNode,
    depth: usize,
    op: Operator,
    ctx: &ShellContext,
    streams: Streams,
) -> Option<ScopedJoinHandle<'scope, i32>> {
    let mut branch_ctx = ctx.clone_for_branch();
    let spawned: io::Result<_> = thread::Builder::new()
        .name(format!("fsh-branch-{}", depth + 1))
        .spawn_scoped(scope, move || {
            let outcome = execute(node, depth + 1, Some(op), &mut branch_ctx, &streams);
            drop(streams);
            outcome.branch_status()
        });

    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            report(&anyhow!(e).context(format!("Failed to start '{}' branch", op)));
            None
        }
    }
}

fn wait_branch(handle: ScopedJoinHandle<'_, i32>) -> Option<i32> {
    match handle.join() {
        Ok(status) => Some(status),
        Err(_) => {
            report(&anyhow!("Branch terminated abnormally"));
            None
        }
    }
}

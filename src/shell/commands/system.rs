// System command

use crate::shell::ast::SimpleCommand;
use crate::shell::commands::report;
use crate::shell::context::ShellContext;
use crate::shell::io::Streams;
use crate::shell::outcome::{EXEC_FAILURE_STATUS, Outcome};
use crate::shell::process::{ChildGuard, describe_abnormal};
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::io::ErrorKind;
use std::process::Command;

/// Runs an external program in a child process and waits for it.
///
/// Redirections are opened before the spawn; a failure there aborts the
/// command with status 1 and no child is created. A program that cannot be
/// launched yields `EXEC_FAILURE_STATUS`. A child killed by a signal is
/// reported as status 1.
pub fn run_external(cmd: &SimpleCommand, ctx: &ShellContext, io: &Streams) -> Outcome {
    let streams = match io.redirected(cmd, ctx) {
        Ok(streams) => streams,
        Err(e) => {
            report(&e);
            return Outcome::FAILURE;
        }
    };

    let mut command = match build_command(cmd, ctx, &streams) {
        Ok(command) => command,
        Err(e) => {
            report(&e);
            return Outcome::FAILURE;
        }
    };
    // Our copies of the redirected descriptors are no longer needed once the
    // command holds its own.
    drop(streams);

    debug!("exec: {}", shell_words::join(&cmd.argv));
    let spawned = ChildGuard::spawn(&mut command, &cmd.verb);
    // Release the descriptors held by the builder so pipe readers can see EOF.
    drop(command);

    let child = match spawned {
        Ok(child) => child,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            report(&anyhow!(e).context(format!("Execution failed for '{}'", cmd.verb)));
            return Outcome::Status(EXEC_FAILURE_STATUS);
        }
        Err(e) => {
            report(&anyhow!(e).context(format!("Failed to create process for '{}'", cmd.verb)));
            return Outcome::FAILURE;
        }
    };

    match child.wait() {
        Ok(status) => match status.code() {
            Some(code) => Outcome::Status(code),
            None => {
                report(&anyhow!(
                    "'{}' did not terminate normally: {}",
                    cmd.verb,
                    describe_abnormal(&status)
                ));
                Outcome::FAILURE
            }
        },
        Err(e) => {
            report(&anyhow!(e).context(format!("Failed to wait for '{}'", cmd.verb)));
            Outcome::FAILURE
        }
    }
}

fn build_command(cmd: &SimpleCommand, ctx: &ShellContext, streams: &Streams) -> Result<Command> {
    let mut command = Command::new(&cmd.verb);
    command.args(cmd.args());
    command.current_dir(&ctx.cwd);

    // The context's environment is the source of truth
    command.env_clear();
    command.envs(&ctx.env);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        if let Some(argv0) = cmd.argv.first() {
            command.arg0(argv0);
        }
    }

    command.stdin(streams.stdin.to_stdio().context("dup error (stdin)")?);
    command.stdout(streams.stdout.to_stdio().context("dup error (stdout)")?);
    command.stderr(streams.stderr.to_stdio().context("dup error (stderr)")?);
    Ok(command)
}

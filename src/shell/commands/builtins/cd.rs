// Cd command

use crate::shell::ast::SimpleCommand;
use crate::shell::commands::Executable;
use crate::shell::context::ShellContext;
use crate::shell::io::{Streams, open_output};
use crate::shell::outcome::Outcome;
use anyhow::{Context, Result, bail};
use log::debug;
use std::path::{Path, PathBuf};

pub struct CdCommand;

impl Executable for CdCommand {
    fn execute(&self, cmd: &SimpleCommand, ctx: &mut ShellContext, _io: &Streams) -> Result<Outcome> {
        touch_redirect_targets(cmd, ctx)?;

        // args[0] is "cd". args[1] is the target; without one, nothing changes.
        let Some(target) = cmd.args().first() else {
            return Ok(Outcome::SUCCESS);
        };
        change_dir(ctx, target)?;
        Ok(Outcome::SUCCESS)
    }
}

/// cd never reads or writes its redirections, but every named target is still
/// created (and truncated), input included.
fn touch_redirect_targets(cmd: &SimpleCommand, ctx: &ShellContext) -> Result<()> {
    for target in [&cmd.stdin, &cmd.stdout, &cmd.stderr].into_iter().flatten() {
        open_output(&ctx.resolve(target), false)?;
    }
    Ok(())
}

/// Tries the target as given, then spelled out under the current directory
/// (`<cwd>/<target>`, so "/sub" can still mean "./sub"). On failure the
/// working directory is left unchanged.
pub fn change_dir(ctx: &mut ShellContext, target: &str) -> Result<()> {
    let as_given = ctx.resolve(Path::new(target));
    match enter_dir(ctx, &as_given) {
        Ok(()) => return Ok(()),
        Err(e) => debug!("cd: '{}' failed as given: {:#}", target, e),
    }

    let under_cwd = PathBuf::from(format!("{}/{}", ctx.cwd.display(), target));
    enter_dir(ctx, &under_cwd).with_context(|| format!("Error changing directory to '{}'", target))
}

fn enter_dir(ctx: &mut ShellContext, path: &Path) -> Result<()> {
    // Canonicalize to remove .. and .
    let canon = path
        .canonicalize()
        .with_context(|| format!("cd: no such file or directory: {}", path.display()))?;
    if !canon.is_dir() {
        bail!("cd: not a directory: {}", path.display());
    }
    debug!("cd: {} -> {}", ctx.cwd.display(), canon.display());
    ctx.cwd = canon;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, ShellContext) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let ctx = ShellContext::new().with_cwd(root);
        (dir, ctx)
    }

    #[test]
    fn test_cd_relative() {
        let (_dir, mut ctx) = setup();
        let base = ctx.cwd.clone();
        fs::create_dir(base.join("b")).unwrap();

        change_dir(&mut ctx, "b").unwrap();
        assert_eq!(ctx.cwd, base.join("b"));

        change_dir(&mut ctx, "..").unwrap();
        assert_eq!(ctx.cwd, base);
    }

    #[test]
    fn test_cd_falls_back_under_cwd() {
        let (_dir, mut ctx) = setup();
        let base = ctx.cwd.clone();
        let name = "fsh_cd_fallback_3f9c2e";
        fs::create_dir(base.join(name)).unwrap();

        // "/fsh_cd_fallback_3f9c2e" does not exist at the filesystem root.
        change_dir(&mut ctx, &format!("/{}", name)).unwrap();
        assert_eq!(ctx.cwd, base.join(name));
    }

    #[test]
    fn test_cd_failure_keeps_cwd() {
        let (_dir, mut ctx) = setup();
        let base = ctx.cwd.clone();
        fs::write(base.join("file"), "").unwrap();

        assert!(change_dir(&mut ctx, "missing").is_err());
        assert!(change_dir(&mut ctx, "file").is_err());
        assert_eq!(ctx.cwd, base);
    }

    #[test]
    fn test_cd_touches_redirect_targets() {
        let (_dir, mut ctx) = setup();
        let base = ctx.cwd.clone();
        fs::create_dir(base.join("sub")).unwrap();
        fs::write(base.join("out.txt"), "old").unwrap();

        let cmd = SimpleCommand::new(["cd", "sub"])
            .stdin("in.txt")
            .stdout("out.txt")
            .stderr("err.txt");
        let outcome = CdCommand.execute(&cmd, &mut ctx, &Streams::inherit()).unwrap();

        assert_eq!(outcome, Outcome::SUCCESS);
        assert!(base.join("in.txt").exists());
        assert!(base.join("err.txt").exists());
        assert_eq!(fs::read_to_string(base.join("out.txt")).unwrap(), "");
        assert_eq!(ctx.cwd, base.join("sub"));
    }

    #[test]
    fn test_cd_unopenable_target_aborts() {
        let (_dir, mut ctx) = setup();
        let base = ctx.cwd.clone();
        fs::create_dir(base.join("sub")).unwrap();

        let cmd = SimpleCommand::new(["cd", "sub"]).stdout("nodir/x.txt");
        assert!(CdCommand.execute(&cmd, &mut ctx, &Streams::inherit()).is_err());
        assert_eq!(ctx.cwd, base);

        // Through the leaf dispatcher the error becomes status 1.
        let node = cmd.into();
        assert_eq!(crate::shell::run_tree(&node, &mut ctx), Outcome::FAILURE);
        assert_eq!(ctx.cwd, base);
        assert!(!base.join("nodir").exists());
    }

    #[test]
    fn test_cd_without_argument_is_noop() {
        let (_dir, mut ctx) = setup();
        let base = ctx.cwd.clone();
        let outcome = CdCommand.execute(&SimpleCommand::new(["cd"]), &mut ctx, &Streams::inherit()).unwrap();
        assert_eq!(outcome, Outcome::SUCCESS);
        assert_eq!(ctx.cwd, base);
    }
}

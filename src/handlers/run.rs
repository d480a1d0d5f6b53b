use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::env;
use crate::cli::Cli;
use forksh::config::{load_config, load_env_file};
use forksh::script::load_script;
use forksh::shell::context::ShellContext;
use forksh::shell::outcome::Outcome;
use forksh::shell::session::Session;

/// Loads every script up front, then runs their trees in one session.
/// Returns the process exit code.
pub fn handle_run(cli: &Cli) -> Result<i32> {
    let start_dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => env::current_dir()?,
    };
    let start_dir = start_dir
        .canonicalize()
        .with_context(|| format!("Cannot enter directory: {}", start_dir.display()))?;
    let config = load_config(&start_dir)?;

    let mut trees = Vec::new();
    for path in &cli.scripts {
        trees.extend(load_script(path)?);
    }

    let mut ctx = ShellContext::new().with_cwd(&start_dir);
    ctx.trace = config.shell.trace;
    ctx.env.extend(config.env);
    if let Some(env_file) = &cli.env_file {
        load_env_file(env_file, &mut ctx.env)?;
    }

    let commands: usize = trees.iter().map(|t| t.leaf_count()).sum();
    info!("running {} tree(s), {} command(s) in {}", trees.len(), commands, start_dir.display());
    let mut session = Session::new(ctx);
    match session.run_all(&trees) {
        Outcome::Terminate => {
            eprintln!("{} Session ended by exit.", "👋".yellow());
            Ok(0)
        }
        Outcome::Status(code) => Ok(code),
    }
}

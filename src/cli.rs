use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fsh", version, about = "Forksh: execute command-tree scripts")]
pub struct Cli {
    /// Command scripts (TOML) to execute, in order
    #[arg(required = true)]
    pub scripts: Vec<PathBuf>,

    /// Print each tree in shell notation without executing it
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Initial working directory (also where fsh.toml and .env are looked up)
    #[arg(short = 'C', long = "dir")]
    pub dir: Option<PathBuf>,

    /// Extra dotenv file layered over the environment
    #[arg(long = "env-file")]
    pub env_file: Option<PathBuf>,
}

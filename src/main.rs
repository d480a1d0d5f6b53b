mod cli;
mod handlers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use handlers::{run, show};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.dry_run {
        show::handle_show(&cli.scripts)
    } else {
        let code = run::handle_run(&cli)?;
        std::process::exit(code)
    }
}

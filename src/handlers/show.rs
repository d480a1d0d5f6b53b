use anyhow::Result;
use colored::*;
use std::path::PathBuf;
use forksh::script::load_script;

/// Dry run: prints every tree of every script in shell notation.
pub fn handle_show(scripts: &[PathBuf]) -> Result<()> {
    for path in scripts {
        let trees = load_script(path)?;
        println!("{} {}", "📜".cyan(), path.display().to_string().bold());
        for tree in &trees {
            println!("  {} {}", "$".dimmed(), tree);
        }
    }
    Ok(())
}

use anyhow::{Context, Result};
use colored::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "fsh.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForkshConfig {
    #[serde(default)]
    pub shell: ShellSection,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellSection {
    /// Log every dispatched node at info level.
    #[serde(default)]
    pub trace: bool,
}

/// Loads `fsh.toml` from `dir` (defaults when absent), then layers `.env`
/// (or `.env.<FSH_ENV>`) from the same directory over `[env]`.
pub fn load_config(dir: &Path) -> Result<ForkshConfig> {
    let config_path = dir.join(CONFIG_FILE);

    // 1. Parse fsh.toml (Base Layer)
    let mut config: ForkshConfig = if config_path.exists() {
        let content = fs::read_to_string(&config_path).context("Failed to read fsh.toml")?;
        toml::from_str(&content).context("Failed to parse fsh.toml")?
    } else {
        ForkshConfig::default()
    };

    // 2. Load .env using dotenvy (Override Layer)
    let env_filename = env::var("FSH_ENV")
        .map(|v| format!(".env.{}", v))
        .unwrap_or_else(|_| ".env".to_string());
    let env_path = dir.join(&env_filename);

    if env_path.exists() {
        eprintln!("{} Loading environment from: {}", "🌿".green(), env_filename.bold());
        load_env_file(&env_path, &mut config.env)?;
    }

    Ok(config)
}

/// Reads a dotenv file into `env` without touching the process environment.
pub fn load_env_file(path: &Path, env: &mut HashMap<String, String>) -> Result<()> {
    let entries = dotenvy::from_path_iter(path)
        .with_context(|| format!("Failed to open env file: {}", path.display()))?;
    for item in entries {
        let (key, val) = item.with_context(|| format!("Invalid entry in {}", path.display()))?;
        env.insert(key, val);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert!(!config.shell.trace);
        assert!(config.env.is_empty());
    }

    #[test]
    fn test_env_file_overrides_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[shell]\ntrace = true\n\n[env]\nGREETING = \"hello\"\nTARGET = \"debug\"\n",
        )
        .unwrap();
        fs::write(dir.path().join(".env"), "TARGET=release\n").unwrap();

        let config = load_config(dir.path()).unwrap();
        assert!(config.shell.trace);
        assert_eq!(config.env["GREETING"], "hello");
        assert_eq!(config.env["TARGET"], "release");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[shell]\ncolour = true\n").unwrap();
        assert!(load_config(dir.path()).is_err());
    }
}

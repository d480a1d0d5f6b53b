use anyhow::{Result, bail};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::shell::commands::Executable;

/// Process state the executor reads and mutates: working directory,
/// environment and the built-in command registry.
///
/// Branches of a parallel or pipe composition work on a clone, so changes made
/// there never reach the orchestrating context.
#[derive(Clone)]
pub struct ShellContext {
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
    pub trace: bool,
    pub registry: Arc<HashMap<String, Arc<dyn Executable>>>,
}

impl ShellContext {
    pub fn new() -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut ctx = Self {
            cwd,
            env,
            trace: false,
            registry: Arc::new(HashMap::new()),
        };
        crate::shell::commands::builtins::register_all_builtins(&mut ctx);
        ctx
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn register_command(&mut self, name: &str, command: Arc<dyn Executable>) -> Result<()> {
        // Such a verb is always an assignment, the command could never be reached.
        if name.is_empty() || name.contains('=') {
            bail!("Invalid command name: {:?}", name);
        }
        Arc::make_mut(&mut self.registry).insert(name.to_string(), command);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Executable>> {
        self.registry.get(name).cloned()
    }

    pub fn set_var(&mut self, key: &str, value: &str) {
        self.env.insert(key.to_string(), value.to_string());
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Resolves `path` against the context's working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    pub fn clone_for_branch(&self) -> Self {
        Self {
            cwd: self.cwd.clone(),
            env: self.env.clone(),
            trace: self.trace,
            registry: self.registry.clone(),
        }
    }
}

impl Default for ShellContext {
    fn default() -> Self {
        Self::new()
    }
}

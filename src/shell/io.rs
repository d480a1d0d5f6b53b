use anyhow::{Context, Result};
use os_pipe::{PipeReader, PipeWriter};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::Stdio;
use crate::shell::ast::SimpleCommand;
use crate::shell::context::ShellContext;

/// Where a command's standard input comes from.
#[derive(Debug)]
pub enum Input {
    Inherit,
    File(File),
    Pipe(PipeReader),
}

/// Where a command's standard output or error goes.
#[derive(Debug)]
pub enum Output {
    Inherit,
    File(File),
    Pipe(PipeWriter),
}

impl Input {
    pub fn try_clone(&self) -> io::Result<Self> {
        Ok(match self {
            Input::Inherit => Input::Inherit,
            Input::File(f) => Input::File(f.try_clone()?),
            Input::Pipe(p) => Input::Pipe(p.try_clone()?),
        })
    }

    /// A fresh descriptor for a child process's fd 0.
    pub fn to_stdio(&self) -> io::Result<Stdio> {
        Ok(match self {
            Input::Inherit => Stdio::inherit(),
            Input::File(f) => Stdio::from(f.try_clone()?),
            Input::Pipe(p) => Stdio::from(p.try_clone()?),
        })
    }

    pub fn reader(&self) -> io::Result<Box<dyn Read + Send>> {
        Ok(match self {
            Input::Inherit => Box::new(io::stdin()),
            Input::File(f) => Box::new(f.try_clone()?),
            Input::Pipe(p) => Box::new(p.try_clone()?),
        })
    }
}

impl Output {
    pub fn try_clone(&self) -> io::Result<Self> {
        Ok(match self {
            Output::Inherit => Output::Inherit,
            Output::File(f) => Output::File(f.try_clone()?),
            Output::Pipe(p) => Output::Pipe(p.try_clone()?),
        })
    }

    pub fn to_stdio(&self) -> io::Result<Stdio> {
        Ok(match self {
            Output::Inherit => Stdio::inherit(),
            Output::File(f) => Stdio::from(f.try_clone()?),
            Output::Pipe(p) => Stdio::from(p.try_clone()?),
        })
    }

    /// Writer for in-process commands. `stderr` picks the inherited stream.
    pub fn writer(&self, stderr: bool) -> io::Result<Box<dyn Write + Send>> {
        Ok(match self {
            Output::Inherit if stderr => Box::new(io::stderr()),
            Output::Inherit => Box::new(io::stdout()),
            Output::File(f) => Box::new(f.try_clone()?),
            Output::Pipe(p) => Box::new(p.try_clone()?),
        })
    }
}

/// The three standard streams a node runs with.
///
/// Every holder of a pipe end keeps the channel open, so a `Streams` must be
/// dropped once its node has finished.
#[derive(Debug)]
pub struct Streams {
    pub stdin: Input,
    pub stdout: Output,
    pub stderr: Output,
}

impl Streams {
    pub fn inherit() -> Self {
        Self {
            stdin: Input::Inherit,
            stdout: Output::Inherit,
            stderr: Output::Inherit,
        }
    }

    pub fn try_clone(&self) -> io::Result<Self> {
        Ok(Self {
            stdin: self.stdin.try_clone()?,
            stdout: self.stdout.try_clone()?,
            stderr: self.stderr.try_clone()?,
        })
    }

    pub fn with_stdin(mut self, stdin: Input) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_stdout(mut self, stdout: Output) -> Self {
        self.stdout = stdout;
        self
    }

    /// Applies the command's redirections on top of these streams.
    ///
    /// Input is opened read-only. Output and error are created if missing and
    /// truncated unless `append` is set. When output and error name the same
    /// path, error reuses the output descriptor (one file offset) instead of
    /// opening the file twice. Targets resolve against the context's cwd.
    pub fn redirected(&self, cmd: &SimpleCommand, ctx: &ShellContext) -> Result<Streams> {
        let stdin = match &cmd.stdin {
            Some(path) => {
                let path = ctx.resolve(path);
                let file = File::open(&path)
                    .with_context(|| format!("Open error: {}", path.display()))?;
                Input::File(file)
            }
            None => self.stdin.try_clone().context("Failed to duplicate stdin")?,
        };

        let stdout = match &cmd.stdout {
            Some(path) => Output::File(open_output(&ctx.resolve(path), cmd.append)?),
            None => self.stdout.try_clone().context("Failed to duplicate stdout")?,
        };

        let stderr = match (&cmd.stderr, &stdout) {
            (Some(_), Output::File(shared)) if cmd.shares_output() => {
                Output::File(shared.try_clone().context("dup error")?)
            }
            (Some(path), _) => Output::File(open_output(&ctx.resolve(path), cmd.append)?),
            (None, _) => self.stderr.try_clone().context("Failed to duplicate stderr")?,
        };

        Ok(Streams { stdin, stdout, stderr })
    }
}

pub fn open_output(path: &Path, append: bool) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true);
    if append {
        opts.append(true);
    } else {
        opts.truncate(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o644);
    }
    opts.open(path)
        .with_context(|| format!("Open error: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn ctx_in(dir: &TempDir) -> ShellContext {
        ShellContext::new().with_cwd(dir.path())
    }

    #[test]
    fn test_open_output_truncates_or_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "X").unwrap();

        let mut f = open_output(&path, true).unwrap();
        f.write_all(b"Y").unwrap();
        drop(f);
        assert_eq!(fs::read_to_string(&path).unwrap(), "XY");

        let mut f = open_output(&path, false).unwrap();
        f.write_all(b"Z").unwrap();
        drop(f);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Z");
    }

    #[test]
    fn test_shared_output_uses_one_offset() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx_in(&dir);
        let cmd = SimpleCommand::new(["x"]).stdout("both.txt").stderr("both.txt");

        let streams = Streams::inherit().redirected(&cmd, &ctx).unwrap();
        let mut out = streams.stdout.writer(false).unwrap();
        let mut err = streams.stderr.writer(true).unwrap();
        out.write_all(b"out1 ").unwrap();
        err.write_all(b"err ").unwrap();
        out.write_all(b"out2").unwrap();
        drop((out, err, streams));

        assert_eq!(fs::read_to_string(dir.path().join("both.txt")).unwrap(), "out1 err out2");
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let ctx = ctx_in(&dir);
        let cmd = SimpleCommand::new(["cat"]).stdin("missing.txt").stdout("out.txt");

        let err = Streams::inherit().redirected(&cmd, &ctx).unwrap_err();
        assert!(format!("{:#}", err).contains("Open error"));
        // Input is opened first; nothing else gets touched.
        assert!(!dir.path().join("out.txt").exists());
    }
}

use log::{trace, warn};
use std::io;
use std::process::{Child, Command, ExitStatus};

/// A spawned child that must be reaped exactly once.
///
/// `wait` consumes the guard. A guard dropped without waiting (an early return
/// on an error path) reaps the child itself so no zombie is left behind.
pub struct ChildGuard {
    child: Option<Child>,
    label: String,
}

impl ChildGuard {
    pub fn spawn(command: &mut Command, label: &str) -> io::Result<Self> {
        let child = command.spawn()?;
        trace!("spawned '{}' as pid {}", label, child.id());
        Ok(Self {
            child: Some(child),
            label: label.to_string(),
        })
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    pub fn wait(mut self) -> io::Result<ExitStatus> {
        match self.child.take() {
            Some(mut child) => {
                let status = child.wait()?;
                trace!("'{}' (pid {}) exited: {}", self.label, child.id(), status);
                Ok(status)
            }
            None => Err(io::Error::other("child already reaped")),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            warn!("reaping unwaited child '{}' (pid {})", self.label, child.id());
            if let Err(e) = child.wait() {
                warn!("failed to reap '{}': {}", self.label, e);
            }
        }
    }
}

/// Human-readable description of an abnormal termination.
pub fn describe_abnormal(status: &ExitStatus) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("killed by signal {}", signal);
        }
    }
    format!("terminated abnormally ({})", status)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_wait_returns_status() {
        let guard = ChildGuard::spawn(Command::new("sh").args(["-c", "exit 4"]), "sh").unwrap();
        assert!(guard.id().is_some());
        assert_eq!(guard.wait().unwrap().code(), Some(4));
    }

    #[test]
    fn test_drop_reaps_child() {
        let guard = ChildGuard::spawn(&mut Command::new("true"), "true").unwrap();
        let pid = guard.id().unwrap();
        drop(guard);
        // Reaped: the pid no longer names a zombie of ours.
        let proc_entry = std::path::Path::new("/proc").join(pid.to_string());
        if proc_entry.exists() {
            let stat = std::fs::read_to_string(proc_entry.join("stat")).unwrap_or_default();
            assert!(!stat.contains(") Z "));
        }
    }

    #[test]
    fn test_describe_signal() {
        let guard = ChildGuard::spawn(Command::new("sh").args(["-c", "kill -9 $$"]), "sh").unwrap();
        let status = guard.wait().unwrap();
        assert_eq!(status.code(), None);
        assert_eq!(describe_abnormal(&status), "killed by signal 9");
    }
}

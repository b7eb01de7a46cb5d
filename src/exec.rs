//! Subprocess execution for hooks and the link tool.
//!
//! Both hooks and `stow` inherit the caller's stdio, working directory and
//! environment; only the exit status is reported back.
use std::process::{Command, ExitStatus};

/// Result of a command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
}

impl ExecResult {
    /// A successful result with exit code zero.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    /// A failed result with the given exit code.
    #[must_use]
    pub const fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
        }
    }

    /// Exit code for diagnostics, `-1` when the process was killed by a signal.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(-1)
    }
}

impl From<ExitStatus> for ExecResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// Abstraction over process execution so the orchestrator can be tested
/// without spawning anything.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run `program` with `args` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ExecResult>;

    /// Run a single statement in its own shell (`sh -c`).
    ///
    /// # Errors
    ///
    /// Returns an error if the shell cannot be spawned.
    fn run_shell(&self, statement: &str) -> std::io::Result<ExecResult>;
}

/// Production [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ExecResult> {
        Command::new(program).args(args).status().map(Into::into)
    }

    fn run_shell(&self, statement: &str) -> std::io::Result<ExecResult> {
        Command::new("sh")
            .arg("-c")
            .arg(statement)
            .status()
            .map(Into::into)
    }
}

/// Check if a program is available on PATH.
#[must_use]
pub fn which(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn run_true_succeeds() {
        let result = SystemExecutor.run("true", &[]).unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code(), 0);
    }

    #[test]
    fn run_reports_failure_without_error() {
        let result = SystemExecutor.run("false", &[]).unwrap();
        assert!(!result.success, "non-zero exit should set success=false");
        assert_eq!(result.exit_code(), 1);
    }

    #[test]
    fn run_missing_program_is_spawn_error() {
        let result = SystemExecutor.run("this-program-does-not-exist-12345", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn run_shell_reports_exit_code() {
        let result = SystemExecutor.run_shell("exit 3").unwrap();
        assert_eq!(result, ExecResult::failed(3));
    }

    #[test]
    fn run_shell_statements_do_not_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let first = SystemExecutor.run_shell("FOO=bar; cd /").unwrap();
        assert!(first.success);
        let second = SystemExecutor
            .run_shell(&format!(
                "test -z \"$FOO\" && touch '{}'",
                marker.display()
            ))
            .unwrap();
        assert!(second.success);
        assert!(marker.exists());
    }

    #[test]
    fn which_finds_known_program() {
        assert!(which("sh"), "sh should be found on Unix");
    }

    #[test]
    fn which_missing_program() {
        assert!(
            !which("this-program-does-not-exist-12345"),
            "non-existent program should not be found"
        );
    }
}

// Shared helpers for integration tests.
//
// Provides a temporary stow directory with a fluent package builder and
// recording fakes for the process and ownership backends, so each test can
// drive a full run and inspect the exact order of side effects.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use stowy::error::StowyError;
use stowy::exec::{ExecResult, Executor};
use stowy::ownership::{OwnerIds, OwnershipOps};
use stowy::package::Defaults;

/// Defaults used by every integration test: home `/home/u`, user `u`.
pub fn defaults() -> Defaults {
    Defaults {
        home: PathBuf::from("/home/u"),
        user: "u".to_string(),
    }
}

/// An isolated stow directory backed by a [`tempfile::TempDir`].
pub struct StowDir {
    /// Temporary directory holding the packages.
    pub root: tempfile::TempDir,
}

impl StowDir {
    /// Create an empty stow directory.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the stow directory.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Add a package directory without a `package.yaml`.
    pub fn with_package(self, name: &str) -> Self {
        std::fs::create_dir_all(self.path().join(name)).expect("create package dir");
        self
    }

    /// Add a package directory with the given `package.yaml` contents.
    pub fn with_config(self, name: &str, yaml: &str) -> Self {
        let dir = self.path().join(name);
        std::fs::create_dir_all(&dir).expect("create package dir");
        std::fs::write(dir.join("package.yaml"), yaml).expect("write package.yaml");
        self
    }

    /// Replace the canonical stow directory path in `line` with `<STOW>`.
    pub fn redact(&self, line: &str) -> String {
        let canonical = dunce::canonicalize(self.path()).expect("canonicalize stow dir");
        line.replace(&canonical.display().to_string(), "<STOW>")
    }
}

/// Ordered record of every side effect a run requested.
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    fn push(&self, entry: String) {
        self.0.lock().expect("trace lock").push(entry);
    }

    /// Snapshot of the recorded entries.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("trace lock").clone()
    }
}

/// [`Executor`] that records invocations instead of spawning processes.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    /// Shared side-effect record.
    pub trace: Trace,
    /// Hook statements that exit with status 1.
    pub failing_statements: HashSet<String>,
    /// When set, every link-tool run exits with this code.
    pub link_tool_exit: Option<i32>,
}

impl RecordingExecutor {
    /// Executor writing into `trace`.
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
            ..Self::default()
        }
    }

    /// Make `statement` fail when run as a hook.
    pub fn failing(mut self, statement: &str) -> Self {
        self.failing_statements.insert(statement.to_string());
        self
    }

    /// Make every link-tool run exit with `code`.
    pub fn link_tool_exits(mut self, code: i32) -> Self {
        self.link_tool_exit = Some(code);
        self
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<ExecResult> {
        self.trace.push(format!("{program} {}", args.join(" ")));
        Ok(self.link_tool_exit.map_or_else(ExecResult::ok, ExecResult::failed))
    }

    fn run_shell(&self, statement: &str) -> std::io::Result<ExecResult> {
        self.trace.push(format!("sh -c {statement}"));
        if self.failing_statements.contains(statement) {
            Ok(ExecResult::failed(1))
        } else {
            Ok(ExecResult::ok())
        }
    }
}

/// [`OwnershipOps`] over a fixed user table that records `chown` requests.
#[derive(Debug, Default)]
pub struct RecordingOwnership {
    /// Shared side-effect record.
    pub trace: Trace,
    /// Known users.
    pub users: HashMap<String, OwnerIds>,
    /// When true, every `chown` is denied.
    pub deny: bool,
}

impl RecordingOwnership {
    /// Ownership backend knowing only user `u` (uid/gid 1000).
    pub fn new(trace: &Trace) -> Self {
        let mut users = HashMap::new();
        users.insert("u".to_string(), OwnerIds { uid: 1000, gid: 1000 });
        Self {
            trace: trace.clone(),
            users,
            deny: false,
        }
    }

    /// Add a known user.
    pub fn with_user(mut self, name: &str, uid: u32, gid: u32) -> Self {
        self.users.insert(name.to_string(), OwnerIds { uid, gid });
        self
    }

    /// Deny every ownership change.
    pub fn denying(mut self) -> Self {
        self.deny = true;
        self
    }
}

impl OwnershipOps for RecordingOwnership {
    fn lookup(&self, username: &str) -> Result<Option<OwnerIds>, StowyError> {
        Ok(self.users.get(username).copied())
    }

    fn chown_recursive(&self, top: &Path, ids: OwnerIds) -> Result<(), StowyError> {
        if self.deny {
            return Err(StowyError::Permission {
                path: top.display().to_string(),
            });
        }
        self.trace
            .push(format!("chown {}:{} {}", ids.uid, ids.gid, top.display()));
        Ok(())
    }
}

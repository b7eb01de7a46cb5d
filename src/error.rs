//! Domain-specific error types for the stow front-end.
//!
//! Library modules return [`StowyError`]; the command boundary in
//! [`commands`](crate::commands) converts it to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! StowyError
//! ├── Validation(ValidationError)   package names, config shape, defaults
//! ├── ConfigParse                   package.yaml is not valid YAML
//! ├── Io                            reading config, walking package trees
//! ├── OwnerLookup                   configured owner does not exist
//! ├── Permission                    chown denied, needs elevated privileges
//! ├── HookFailed                    a hook statement exited non-zero
//! ├── LinkToolFailed                stow exited non-zero or is missing
//! └── Spawn                         a process could not be started at all
//! ```

use std::fmt;

use thiserror::Error;

/// Top-level error type for a single run.
#[derive(Error, Debug)]
pub enum StowyError {
    /// A package reference or its configuration is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `package.yaml` exists but is not valid YAML.
    #[error("Invalid YAML file: {path}: {source}")]
    ConfigParse {
        /// Path of the configuration file.
        path: String,
        /// Underlying parser error.
        source: serde_yaml::Error,
    },

    /// An I/O error while reading configuration or package contents.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path that could not be accessed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configured owner is not a known user.
    #[error("Unknown owner '{owner}' for package {package}")]
    OwnerLookup {
        /// Package whose owner could not be resolved.
        package: String,
        /// Configured owner name.
        owner: String,
    },

    /// Changing ownership was denied by the operating system.
    #[error("Permission denied changing ownership of {path}. Please rerun with elevated privileges (e.g. sudo)")]
    Permission {
        /// Path whose ownership could not be changed.
        path: String,
    },

    /// A user hook statement exited non-zero.
    #[error("{kind} hook of package {package} failed (exit {exit_code}): {statement}")]
    HookFailed {
        /// Package the hook belongs to.
        package: String,
        /// Which hook list the statement came from.
        kind: HookKind,
        /// The shell statement that failed.
        statement: String,
        /// Exit code, or `-1` when terminated by a signal.
        exit_code: i32,
    },

    /// The underlying link tool failed or could not be found.
    #[error("{program} failed for target {target}: {reason}")]
    LinkToolFailed {
        /// Program name (normally `stow`).
        program: String,
        /// Target directory of the failing invocation.
        target: String,
        /// Human-readable reason (exit code or lookup failure).
        reason: String,
    },

    /// A process could not be started.
    #[error("failed to execute: {label}: {source}")]
    Spawn {
        /// Description of what was being started.
        label: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Validation failures detected before any filesystem mutation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// The package directory does not exist under the stow directory.
    #[error("The stow directory {root} does not contain package {package}")]
    MissingPackage {
        /// Requested package name.
        package: String,
        /// Stow directory that was searched.
        root: String,
    },

    /// The package path exists but is not a directory.
    #[error("Package {package} in {root} is not a directory")]
    NotADirectory {
        /// Requested package name.
        package: String,
        /// Stow directory that was searched.
        root: String,
    },

    /// The package name contains a path separator.
    #[error("Slashes are not permitted in package names: {0}")]
    ContainsSeparator(String),

    /// The package name is empty, `.` or `..`.
    #[error("Invalid package name: '{0}'")]
    InvalidName(String),

    /// The configuration document is not a mapping.
    #[error("The configuration file {path} has to be a mapping")]
    ConfigShape {
        /// Path of the configuration file.
        path: String,
    },

    /// A recognised configuration key holds a value of the wrong type.
    #[error("Invalid value in {path}: {message}")]
    ConfigValue {
        /// Path of the configuration file.
        path: String,
        /// Description of the offending key.
        message: String,
    },

    /// A default (home directory, invoking user) could not be determined.
    #[error("Cannot determine default {0}")]
    MissingDefault(String),
}

/// The four hook lists a package may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Runs before the stow invocation, after ownership transfer.
    PreStow,
    /// Runs after every stow invocation has completed.
    PostStow,
    /// Runs before the unstow invocation.
    PreUnstow,
    /// Runs after every unstow invocation has completed.
    PostUnstow,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreStow => write!(f, "pre-stow"),
            Self::PostStow => write!(f, "post-stow"),
            Self::PreUnstow => write!(f, "pre-unstow"),
            Self::PostUnstow => write!(f, "post-unstow"),
        }
    }
}

//! User lookup and recursive ownership changes for package directories.
//!
//! Provides the [`OwnershipOps`] trait so the orchestrator can be tested
//! without root privileges. Production code uses [`SystemOwnership`].
use std::path::Path;

use crate::error::StowyError;

/// Numeric user and primary group of an owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerIds {
    /// User id.
    pub uid: u32,
    /// Primary group id.
    pub gid: u32,
}

/// Abstraction over user database queries and `chown`.
#[cfg_attr(test, mockall::automock)]
pub trait OwnershipOps: Send + Sync + std::fmt::Debug {
    /// Resolve `username` to its uid and primary gid (`id -u`, `id -g`).
    ///
    /// Returns `Ok(None)` when no such user exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the user database cannot be queried.
    fn lookup(&self, username: &str) -> Result<Option<OwnerIds>, StowyError>;

    /// Recursively change the owner of `top` and everything below it,
    /// following symlinks (`chown -RL`).
    ///
    /// # Errors
    ///
    /// Returns [`StowyError::Permission`] if the OS denies the change and
    /// [`StowyError::Io`] for any other failure.
    fn chown_recursive(&self, top: &Path, ids: OwnerIds) -> Result<(), StowyError>;
}

/// Production [`OwnershipOps`] backed by the system user database.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOwnership;

#[cfg(unix)]
impl OwnershipOps for SystemOwnership {
    fn lookup(&self, username: &str) -> Result<Option<OwnerIds>, StowyError> {
        let user = nix::unistd::User::from_name(username).map_err(|errno| StowyError::Io {
            path: "/etc/passwd".to_string(),
            source: errno.into(),
        })?;
        Ok(user.map(|u| OwnerIds {
            uid: u.uid.as_raw(),
            gid: u.gid.as_raw(),
        }))
    }

    fn chown_recursive(&self, top: &Path, ids: OwnerIds) -> Result<(), StowyError> {
        use nix::unistd::{Gid, Uid};

        let uid = Uid::from_raw(ids.uid);
        let gid = Gid::from_raw(ids.gid);
        for entry in walkdir::WalkDir::new(top).follow_links(true) {
            let entry = entry.map_err(|e| StowyError::Io {
                path: e
                    .path()
                    .unwrap_or(top)
                    .display()
                    .to_string(),
                source: e.into(),
            })?;
            let path = entry.path();
            nix::unistd::chown(path, Some(uid), Some(gid)).map_err(|errno| match errno {
                nix::errno::Errno::EPERM => StowyError::Permission {
                    path: path.display().to_string(),
                },
                other => StowyError::Io {
                    path: path.display().to_string(),
                    source: other.into(),
                },
            })?;
        }
        Ok(())
    }
}

#[cfg(not(unix))]
impl OwnershipOps for SystemOwnership {
    fn lookup(&self, _username: &str) -> Result<Option<OwnerIds>, StowyError> {
        Ok(None)
    }

    fn chown_recursive(&self, top: &Path, _ids: OwnerIds) -> Result<(), StowyError> {
        Err(StowyError::Permission {
            path: top.display().to_string(),
        })
    }
}

/// Name of the user running this process: `$USER`, else the passwd entry.
#[must_use]
pub fn current_username() -> Option<String> {
    std::env::var("USER")
        .ok()
        .filter(|u| !u.is_empty())
        .or_else(username_from_uid)
}

#[cfg(unix)]
fn username_from_uid() -> Option<String> {
    nix::unistd::User::from_uid(nix::unistd::Uid::current())
        .ok()
        .flatten()
        .map(|u| u.name)
}

#[cfg(not(unix))]
fn username_from_uid() -> Option<String> {
    std::env::var("USERNAME").ok()
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::os::unix::fs::MetadataExt;

    fn current_ids() -> OwnerIds {
        OwnerIds {
            uid: nix::unistd::Uid::current().as_raw(),
            gid: nix::unistd::Gid::current().as_raw(),
        }
    }

    #[test]
    fn lookup_root_is_uid_zero() {
        let ids = SystemOwnership.lookup("root").unwrap().unwrap();
        assert_eq!(ids.uid, 0);
    }

    #[test]
    fn lookup_unknown_user_is_none() {
        assert!(
            SystemOwnership
                .lookup("no-such-user-12345")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn chown_to_self_succeeds_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("file"), "x").unwrap();

        let ids = current_ids();
        SystemOwnership.chown_recursive(dir.path(), ids).unwrap();

        let meta = std::fs::metadata(nested.join("file")).unwrap();
        assert_eq!(meta.uid(), ids.uid);
        assert_eq!(meta.gid(), ids.gid);
    }

    #[test]
    fn chown_to_root_without_privileges_is_permission_error() {
        if nix::unistd::Uid::effective().is_root() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("file"), "x").unwrap();
        let err = SystemOwnership
            .chown_recursive(dir.path(), OwnerIds { uid: 0, gid: 0 })
            .unwrap_err();
        assert!(
            matches!(err, StowyError::Permission { .. }),
            "expected Permission, got {err:?}"
        );
    }

    #[test]
    fn chown_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SystemOwnership
            .chown_recursive(&dir.path().join("missing"), current_ids())
            .unwrap_err();
        assert!(matches!(err, StowyError::Io { .. }));
    }
}

//! Package registry: validation of package names and construction of fully
//! resolved [`Package`] descriptors.
use std::path::{Path, PathBuf};

use crate::config::{self, PackageConfig};
use crate::error::{StowyError, ValidationError};
use crate::expand;
use crate::ownership;

/// Values used for keys a package does not configure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    /// Default install target (the invoking user's home directory).
    pub home: PathBuf,
    /// Default owner (the invoking user).
    pub user: String,
}

impl Defaults {
    /// Detect defaults from the environment of the running process.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingDefault`] if the home directory or
    /// the invoking user cannot be determined.
    pub fn detect() -> Result<Self, ValidationError> {
        let home = expand::home_dir()
            .ok_or_else(|| ValidationError::MissingDefault("home directory".to_string()))?;
        let user = ownership::current_username()
            .ok_or_else(|| ValidationError::MissingDefault("user".to_string()))?;
        Ok(Self { home, user })
    }
}

/// One unit of stowable content, fully resolved and immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    stow_dir: PathBuf,
    name: String,
    target: PathBuf,
    owner: String,
    pre_stow: Vec<String>,
    post_stow: Vec<String>,
    pre_unstow: Vec<String>,
    post_unstow: Vec<String>,
}

impl Package {
    /// Validate `name` against `stow_dir` and build the package from its
    /// configuration file and `defaults`.
    ///
    /// Reading `package.yaml` is the only side effect.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad names or configuration shape and a
    /// parse error for malformed YAML.
    pub fn build(name: &str, stow_dir: &Path, defaults: &Defaults) -> Result<Self, StowyError> {
        let name = validate(name, stow_dir)?;
        let config = config::load(&stow_dir.join(&name))?;
        Ok(Self::from_config(name, stow_dir, config, defaults))
    }

    /// Apply `defaults` and expansion to an already loaded configuration.
    #[must_use]
    pub fn from_config(
        name: String,
        stow_dir: &Path,
        config: PackageConfig,
        defaults: &Defaults,
    ) -> Self {
        let target = config.target.map_or_else(
            || defaults.home.clone(),
            |t| absolute(PathBuf::from(expand::expand(&t))),
        );
        let owner = config
            .owner
            .map_or_else(|| defaults.user.clone(), |o| expand::expand_vars(&o));
        Self {
            stow_dir: stow_dir.to_path_buf(),
            name,
            target,
            owner,
            pre_stow: config.pre_stow,
            post_stow: config.post_stow,
            pre_unstow: config.pre_unstow,
            post_unstow: config.post_unstow,
        }
    }

    /// Package name, a direct child of the stow directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the package directory.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.stow_dir.join(&self.name)
    }

    /// Directory the package is linked into.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// User that owns the package files after stowing.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Statements run before stowing.
    #[must_use]
    pub fn pre_stow(&self) -> &[String] {
        &self.pre_stow
    }

    /// Statements run after stowing.
    #[must_use]
    pub fn post_stow(&self) -> &[String] {
        &self.post_stow
    }

    /// Statements run before unstowing.
    #[must_use]
    pub fn pre_unstow(&self) -> &[String] {
        &self.pre_unstow
    }

    /// Statements run after unstowing.
    #[must_use]
    pub fn post_unstow(&self) -> &[String] {
        &self.post_unstow
    }
}

/// Check that `name` is an immediate subdirectory of `stow_dir`.
///
/// Trailing separators (as left by shell completion) are ignored.
/// Returns the normalized name.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the name contains a separator, is empty,
/// `.` or `..`, does not exist under `stow_dir`, or is not a directory.
pub fn validate(name: &str, stow_dir: &Path) -> Result<String, ValidationError> {
    let trimmed = name.trim_end_matches(std::path::is_separator);
    if trimmed.contains(std::path::is_separator) {
        return Err(ValidationError::ContainsSeparator(name.to_string()));
    }
    if matches!(trimmed, "" | "." | "..") {
        return Err(ValidationError::InvalidName(name.to_string()));
    }

    let path = stow_dir.join(trimmed);
    if !path.exists() {
        return Err(ValidationError::MissingPackage {
            package: trimmed.to_string(),
            root: stow_dir.display().to_string(),
        });
    }
    if !path.is_dir() {
        return Err(ValidationError::NotADirectory {
            package: trimmed.to_string(),
            root: stow_dir.display().to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Validate and build every requested package, in input order.
///
/// Stops at the first failure so nothing runs with a partially valid set.
///
/// # Errors
///
/// Returns the first validation or configuration error encountered.
pub fn build_all<S: AsRef<str>>(
    names: &[S],
    stow_dir: &Path,
    defaults: &Defaults,
) -> Result<Vec<Package>, StowyError> {
    names
        .iter()
        .map(|name| Package::build(name.as_ref(), stow_dir, defaults))
        .collect()
}

fn absolute(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::path::absolute(&path).unwrap_or(path)
    }
}

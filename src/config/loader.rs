//! YAML loading for `package.yaml` with shape validation.
use std::path::Path;

use serde_yaml::Value;

use super::package::PackageConfig;
use crate::error::{StowyError, ValidationError};

/// Name of the optional configuration file inside each package directory.
pub const CONFIG_FILE_NAME: &str = "package.yaml";

/// Load the configuration of the package at `package_dir`.
///
/// A missing `package.yaml` yields the empty configuration.
///
/// # Errors
///
/// Returns [`StowyError::ConfigParse`] for malformed YAML,
/// [`ValidationError::ConfigShape`] when the document is not a mapping,
/// [`ValidationError::ConfigValue`] when a known key has the wrong type, and
/// [`StowyError::Io`] when the file exists but cannot be read.
pub fn load(package_dir: &Path) -> Result<PackageConfig, StowyError> {
    let path = package_dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(PackageConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| StowyError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse(&content, &path)
}

/// Parse configuration text; `path` is only used in error messages.
///
/// An empty document counts as an empty mapping.
///
/// # Errors
///
/// See [`load`].
pub fn parse(content: &str, path: &Path) -> Result<PackageConfig, StowyError> {
    if content.trim().is_empty() {
        return Ok(PackageConfig::default());
    }

    let value: Value = serde_yaml::from_str(content).map_err(|source| StowyError::ConfigParse {
        path: path.display().to_string(),
        source,
    })?;

    match value {
        Value::Null => Ok(PackageConfig::default()),
        Value::Mapping(_) => serde_yaml::from_value(value).map_err(|e| {
            ValidationError::ConfigValue {
                path: path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        }),
        _ => Err(ValidationError::ConfigShape {
            path: path.display().to_string(),
        }
        .into()),
    }
}

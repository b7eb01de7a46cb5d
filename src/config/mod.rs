//! Per-package declarative configuration (`package.yaml`).
//!
//! A package directory may contain a `package.yaml` mapping with the optional
//! keys `Target`, `Owner`, `PreStow`, `PostStow`, `PreUnstow` and
//! `PostUnstow`. Absence of the file is the same as an empty mapping.

pub mod loader;
pub mod package;

pub use loader::{CONFIG_FILE_NAME, load, parse};
pub use package::PackageConfig;

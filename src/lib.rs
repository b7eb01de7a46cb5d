//! Declarative front-end for GNU Stow.
//!
//! Each package directory may carry a `package.yaml` naming its install
//! target, the user that should own its files, and shell hooks to run around
//! stowing and unstowing. The crate validates the requested packages, groups
//! them by target so the link tool runs once per target, and sequences hooks,
//! ownership transfer and link-tool invocations.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: parse `package.yaml`
//! - **[`package`]**: validate names and resolve packages against defaults
//! - **[`plan`]**: group packages by target and build link-tool commands
//! - **[`orchestrator`]**: run hooks, ownership transfer and the link tool in order
//! - **[`commands`]**: wire the CLI to real processes and the filesystem
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod expand;
pub mod logging;
pub mod orchestrator;
pub mod ownership;
pub mod package;
pub mod plan;

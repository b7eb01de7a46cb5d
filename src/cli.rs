//! Command-line surface: package names, pass-through stow options and the action.
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser};

use crate::logging::Verbosity;
use crate::plan::{Action, StowOptions};

/// Top-level CLI entry point: a YAML-configured front-end for GNU Stow.
// Each flag mirrors one stow option.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(
    name = "stowy",
    about = "Stow packages described by package.yaml, running their lifecycle hooks",
    version = option_env!("STOWY_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
)]
pub struct Cli {
    /// Packages to operate on (directories directly inside the stow directory)
    #[arg(value_name = "PACKAGE", required = true)]
    pub packages: Vec<String>,

    /// Set stow dir to DIR (default is `$STOW_DIR`, then current dir)
    #[arg(short = 'd', long = "dir", value_name = "DIR", env = "STOW_DIR")]
    pub stow_dir: Option<PathBuf>,

    /// Ignore files ending in this Perl regex
    #[arg(long = "ignore", value_name = "REGEX")]
    pub ignores: Vec<String>,

    /// Don't stow files beginning with this Perl regex if the file is already
    /// stowed to another package
    #[arg(long = "defer", value_name = "REGEX")]
    pub defers: Vec<String>,

    /// Force stowing files beginning with this Perl regex if the file is
    /// already stowed to another package
    #[arg(long = "override", value_name = "REGEX")]
    pub overrides: Vec<String>,

    /// Disable tree folding (only leaves will be symlinked)
    #[arg(long)]
    pub no_folding: bool,

    /// (Use with care!) Import existing files into stow package from target
    #[arg(long)]
    pub adopt: bool,

    /// Use legacy algorithm for unstowing
    #[arg(short = 'p', long)]
    pub compat: bool,

    /// Do not actually make any filesystem changes
    #[arg(short = 'n', long, visible_alias = "no")]
    pub simulate: bool,

    /// Increase verbosity by 1 (levels are from 0 to 5)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[allow(missing_docs)]
    #[command(flatten)]
    pub action: ActionOpts,
}

/// Mutually exclusive action selectors; stow is the default.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct ActionOpts {
    /// Stow packages (default)
    #[arg(short = 'S', long)]
    pub stow: bool,

    /// Unstow packages
    #[arg(short = 'D', long)]
    pub delete: bool,

    /// Restow packages (like stow -D followed by stow -S)
    #[arg(short = 'R', long)]
    pub restow: bool,
}

impl ActionOpts {
    /// The selected action.
    #[must_use]
    pub const fn action(&self) -> Action {
        if self.delete {
            Action::Unstow
        } else if self.restow {
            Action::Restow
        } else {
            Action::Stow
        }
    }
}

impl Cli {
    /// Clamped verbosity.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::new(self.verbose)
    }

    /// Options forwarded to the link tool for packages in `stow_dir`.
    #[must_use]
    pub fn stow_options(&self, stow_dir: PathBuf) -> StowOptions {
        StowOptions {
            compat: self.compat,
            simulate: self.simulate,
            verbosity: self.verbosity().get(),
            no_folding: self.no_folding,
            adopt: self.adopt,
            ignores: self.ignores.clone(),
            defers: self.defers.clone(),
            overrides: self.overrides.clone(),
            ..StowOptions::new(stow_dir)
        }
    }
}

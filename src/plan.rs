//! Target grouping and link-tool command construction.
//!
//! Packages are partitioned by resolved target so that `stow` runs once per
//! target directory, and the requested [`Action`] is turned into at most one
//! unstow and one stow [`LinkCommand`].
use std::fmt;
use std::path::{Path, PathBuf};

use crate::logging::MAX_VERBOSITY;
use crate::package::Package;

/// Default link tool.
pub const DEFAULT_PROGRAM: &str = "stow";

/// Operator-selected action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    /// Link packages into their targets.
    #[default]
    Stow,
    /// Remove package links from their targets.
    Unstow,
    /// Full unstow (with hooks) followed by full stow (with hooks).
    Restow,
}

impl Action {
    /// Whether the unstow phase runs.
    #[must_use]
    pub const fn unstows(self) -> bool {
        matches!(self, Self::Unstow | Self::Restow)
    }

    /// Whether the stow phase runs.
    #[must_use]
    pub const fn stows(self) -> bool {
        matches!(self, Self::Stow | Self::Restow)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stow => write!(f, "stow"),
            Self::Unstow => write!(f, "unstow"),
            Self::Restow => write!(f, "restow"),
        }
    }
}

/// Options forwarded verbatim to every link-tool invocation.
// Each flag mirrors one stow option.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StowOptions {
    /// Link tool executable.
    pub program: String,
    /// Directory containing the packages (`-d`).
    pub stow_dir: PathBuf,
    /// Legacy unstow algorithm (`-p`).
    pub compat: bool,
    /// No filesystem changes (`-n`).
    pub simulate: bool,
    /// Number of `-v` flags, clamped to the maximum verbosity.
    pub verbosity: u8,
    /// Disable tree folding (`--no-folding`).
    pub no_folding: bool,
    /// Import existing target files into the package (`--adopt`).
    pub adopt: bool,
    /// `--ignore` patterns.
    pub ignores: Vec<String>,
    /// `--defer` patterns.
    pub defers: Vec<String>,
    /// `--override` patterns.
    pub overrides: Vec<String>,
}

impl StowOptions {
    /// Options with every flag off for packages in `stow_dir`.
    #[must_use]
    pub fn new(stow_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            stow_dir: stow_dir.into(),
            compat: false,
            simulate: false,
            verbosity: 0,
            no_folding: false,
            adopt: false,
            ignores: Vec::new(),
            defers: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Pass-through arguments shared by every invocation, in stow's order.
    #[must_use]
    pub fn base_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.compat {
            args.push("-p".to_string());
        }
        if self.simulate {
            args.push("-n".to_string());
        }
        for _ in 0..self.verbosity.min(MAX_VERBOSITY) {
            args.push("-v".to_string());
        }
        if self.no_folding {
            args.push("--no-folding".to_string());
        }
        if self.adopt {
            args.push("--adopt".to_string());
        }
        for (flag, patterns) in [
            ("--ignore", &self.ignores),
            ("--defer", &self.defers),
            ("--override", &self.overrides),
        ] {
            for pattern in patterns {
                args.push(flag.to_string());
                args.push(pattern.clone());
            }
        }
        args.push("-d".to_string());
        args.push(self.stow_dir.display().to_string());
        args
    }
}

/// Packages sharing one resolved target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroup<'a> {
    /// Normalized target directory.
    pub target: PathBuf,
    /// Member packages in input order.
    pub packages: Vec<&'a Package>,
}

impl TargetGroup<'_> {
    /// Package names passed as trailing positional arguments.
    #[must_use]
    pub fn package_names(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.name().to_string()).collect()
    }
}

/// Partition `packages` by normalized target, ordered by first occurrence.
#[must_use]
pub fn group_by_target(packages: &[Package]) -> Vec<TargetGroup<'_>> {
    let mut groups: Vec<TargetGroup<'_>> = Vec::new();
    for package in packages {
        let target = normalize(package.target());
        match groups.iter_mut().find(|g| g.target == target) {
            Some(group) => group.packages.push(package),
            None => groups.push(TargetGroup {
                target,
                packages: vec![package],
            }),
        }
    }
    groups
}

fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

/// One link-tool command, completed per target group by [`LinkCommand::args_for`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCommand {
    /// Executable to run.
    pub program: String,
    /// Pass-through options plus the action flag.
    pub args: Vec<String>,
}

impl LinkCommand {
    /// Full argument list for one target group: `-t TARGET` then package names.
    #[must_use]
    pub fn args_for(&self, group: &TargetGroup<'_>) -> Vec<String> {
        let mut args = self.args.clone();
        args.push("-t".to_string());
        args.push(group.target.display().to_string());
        args.extend(group.package_names());
        args
    }
}

/// The commands needed for one action.
///
/// Restow is deliberately two commands so that both phases run their hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Requested action.
    pub action: Action,
    /// Unstow command, present for [`Action::Unstow`] and [`Action::Restow`].
    pub unstow: Option<LinkCommand>,
    /// Stow command, present for [`Action::Stow`] and [`Action::Restow`].
    pub stow: Option<LinkCommand>,
}

impl Plan {
    /// Build the commands for `action` from the shared `options`.
    #[must_use]
    pub fn new(options: &StowOptions, action: Action) -> Self {
        let base = options.base_args();
        let unstow = action.unstows().then(|| {
            let mut args = base.clone();
            args.push("-D".to_string());
            LinkCommand {
                program: options.program.clone(),
                args,
            }
        });
        let stow = action.stows().then(|| LinkCommand {
            program: options.program.clone(),
            args: base.clone(),
        });
        Self {
            action,
            unstow,
            stow,
        }
    }
}

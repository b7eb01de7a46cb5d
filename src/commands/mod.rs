//! Command orchestration: turn parsed CLI input into a validated package
//! list and a plan, then hand both to the [`Orchestrator`].
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::error::StowyError;
use crate::exec::{self, Executor, SystemExecutor};
use crate::logging::Log;
use crate::orchestrator::Orchestrator;
use crate::ownership::{OwnershipOps, SystemOwnership};
use crate::package::{self, Defaults, Package};
use crate::plan::{Plan, StowOptions};

/// Everything resolved before the first side effect.
#[derive(Debug)]
pub struct CommandSetup {
    /// Validated packages in input order.
    pub packages: Vec<Package>,
    /// Pass-through link-tool options.
    pub options: StowOptions,
    /// Commands for the selected action.
    pub plan: Plan,
}

impl CommandSetup {
    /// Resolve the stow directory, validate every package and build the plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the stow directory cannot be resolved or any
    /// package fails validation or configuration loading.
    pub fn init(cli: &Cli, defaults: &Defaults, log: &dyn Log) -> Result<Self> {
        let stow_dir = resolve_stow_dir(cli.stow_dir.as_deref())?;
        log.trace(&format!("stow directory: {}", stow_dir.display()));

        let packages = package::build_all(cli.packages.as_slice(), &stow_dir, defaults)?;
        for p in &packages {
            log.trace(&format!(
                "package {}: target {}, owner {}, {} hook(s)",
                p.name(),
                p.target().display(),
                p.owner(),
                p.pre_stow().len()
                    + p.post_stow().len()
                    + p.pre_unstow().len()
                    + p.post_unstow().len()
            ));
        }

        let options = cli.stow_options(stow_dir);
        let plan = Plan::new(&options, cli.action.action());
        Ok(Self {
            packages,
            options,
            plan,
        })
    }

    /// Run the plan with the given process and ownership backends.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the run.
    pub fn execute(
        &self,
        executor: &dyn Executor,
        ownership: &dyn OwnershipOps,
        log: &dyn Log,
    ) -> Result<(), StowyError> {
        Orchestrator::new(executor, ownership, log).run(&self.packages, &self.plan)
    }
}

/// Canonicalize the stow directory, defaulting to the current directory.
///
/// # Errors
///
/// Returns an error if the directory does not exist.
pub fn resolve_stow_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().context("determining current directory")?,
    };
    dunce::canonicalize(&dir)
        .with_context(|| format!("stow directory {} is not accessible", dir.display()))
}

/// Run one stow/unstow/restow invocation against the real system.
///
/// # Errors
///
/// Returns an error if validation fails, the link tool is not installed, or
/// any step of the run fails.
pub fn run(cli: &Cli, log: &dyn Log) -> Result<()> {
    let defaults = Defaults::detect()?;
    let setup = CommandSetup::init(cli, &defaults, log)?;

    if !exec::which(&setup.options.program) {
        return Err(StowyError::LinkToolFailed {
            program: setup.options.program.clone(),
            target: setup.options.stow_dir.display().to_string(),
            reason: "not found on PATH".to_string(),
        }
        .into());
    }

    setup.execute(&SystemExecutor, &SystemOwnership, log)?;
    Ok(())
}

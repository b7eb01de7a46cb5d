//! Sequencing of hooks, ownership transfer and link-tool invocations.
//!
//! A run walks the phases below strictly in order, skipping the unstow half
//! for [`Action::Stow`](crate::plan::Action::Stow) and the stow half for
//! [`Action::Unstow`](crate::plan::Action::Unstow):
//!
//! ```text
//! Idle → PlanningUnstow → RunningPreUnstowHooks → InvokingUnstow → RunningPostUnstowHooks
//!      → PlanningStow → RunningPreStowHooks (+ownership) → InvokingStow → RunningPostStowHooks
//!      → Done
//! ```
//!
//! Any failure stops the run where it is; nothing is rolled back.
use std::cell::Cell;
use std::fmt;

use crate::error::{HookKind, StowyError};
use crate::exec::Executor;
use crate::logging::Log;
use crate::ownership::OwnershipOps;
use crate::package::Package;
use crate::plan::{LinkCommand, Plan, TargetGroup, group_by_target};

/// States of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has happened yet.
    Idle,
    /// About to run the unstow half.
    PlanningUnstow,
    /// Executing pre-unstow hooks of every package.
    RunningPreUnstowHooks,
    /// Invoking the link tool with `-D` once per target.
    InvokingUnstow,
    /// Executing post-unstow hooks of every package.
    RunningPostUnstowHooks,
    /// About to run the stow half.
    PlanningStow,
    /// Changing ownership and executing pre-stow hooks, package by package.
    RunningPreStowHooks,
    /// Invoking the link tool once per target.
    InvokingStow,
    /// Executing post-stow hooks of every package.
    RunningPostStowHooks,
    /// Every phase completed.
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PlanningUnstow => "planning unstow",
            Self::RunningPreUnstowHooks => "pre-unstow hooks",
            Self::InvokingUnstow => "unstow",
            Self::RunningPostUnstowHooks => "post-unstow hooks",
            Self::PlanningStow => "planning stow",
            Self::RunningPreStowHooks => "pre-stow hooks",
            Self::InvokingStow => "stow",
            Self::RunningPostStowHooks => "post-stow hooks",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Drives one run over a validated package list.
pub struct Orchestrator<'a> {
    executor: &'a dyn Executor,
    ownership: &'a dyn OwnershipOps,
    log: &'a dyn Log,
    phase: Cell<Phase>,
}

impl fmt::Debug for Orchestrator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("executor", &self.executor)
            .field("ownership", &self.ownership)
            .field("log", &"<dyn Log>")
            .field("phase", &self.phase.get())
            .finish()
    }
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator over the given process, ownership and log backends.
    #[must_use]
    pub const fn new(
        executor: &'a dyn Executor,
        ownership: &'a dyn OwnershipOps,
        log: &'a dyn Log,
    ) -> Self {
        Self {
            executor,
            ownership,
            log,
            phase: Cell::new(Phase::Idle),
        }
    }

    /// The phase the run is in, or stopped in after a failure.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Execute `plan` over `packages`.
    ///
    /// # Errors
    ///
    /// Returns the first hook, ownership, or link-tool failure; no later
    /// step runs after it.
    pub fn run(&self, packages: &[Package], plan: &Plan) -> Result<(), StowyError> {
        let groups = group_by_target(packages);
        self.log.trace(&format!(
            "{} package(s) in {} target group(s), action {}",
            packages.len(),
            groups.len(),
            plan.action
        ));

        if let Some(command) = &plan.unstow {
            self.unstow(packages, &groups, command)?;
        }
        if let Some(command) = &plan.stow {
            self.stow(packages, &groups, command)?;
        }

        self.enter(Phase::Done);
        Ok(())
    }

    fn unstow(
        &self,
        packages: &[Package],
        groups: &[TargetGroup<'_>],
        command: &LinkCommand,
    ) -> Result<(), StowyError> {
        self.enter(Phase::PlanningUnstow);
        self.log.stage("Planning unstow");

        self.enter(Phase::RunningPreUnstowHooks);
        self.log.info("Executing pre-unstow hooks");
        for package in packages {
            self.run_hooks(package, HookKind::PreUnstow, package.pre_unstow())?;
        }

        self.enter(Phase::InvokingUnstow);
        for group in groups {
            self.log.info(&format!(
                "Unstowing packages with target {}",
                group.target.display()
            ));
            self.invoke(command, group)?;
        }

        self.enter(Phase::RunningPostUnstowHooks);
        self.log.info("Executing post-unstow hooks");
        for package in packages {
            self.run_hooks(package, HookKind::PostUnstow, package.post_unstow())?;
        }
        Ok(())
    }

    fn stow(
        &self,
        packages: &[Package],
        groups: &[TargetGroup<'_>],
        command: &LinkCommand,
    ) -> Result<(), StowyError> {
        self.enter(Phase::PlanningStow);
        self.log.stage("Planning stow");

        self.enter(Phase::RunningPreStowHooks);
        self.log.info("Executing pre-stow hooks");
        for package in packages {
            self.transfer_ownership(package)?;
            self.run_hooks(package, HookKind::PreStow, package.pre_stow())?;
        }

        self.enter(Phase::InvokingStow);
        for group in groups {
            self.log.info(&format!(
                "Stowing packages with target {}",
                group.target.display()
            ));
            self.invoke(command, group)?;
        }

        self.enter(Phase::RunningPostStowHooks);
        self.log.info("Executing post-stow hooks");
        for package in packages {
            self.run_hooks(package, HookKind::PostStow, package.post_stow())?;
        }
        Ok(())
    }

    fn enter(&self, phase: Phase) {
        self.log.trace(&format!("phase: {} -> {phase}", self.phase.get()));
        self.phase.set(phase);
    }

    /// Give the package's files to its configured owner.
    fn transfer_ownership(&self, package: &Package) -> Result<(), StowyError> {
        let ids = self
            .ownership
            .lookup(package.owner())?
            .ok_or_else(|| StowyError::OwnerLookup {
                package: package.name().to_string(),
                owner: package.owner().to_string(),
            })?;
        self.log.detail(&format!(
            "chown -RL {}:{} {}",
            ids.uid,
            ids.gid,
            package.path().display()
        ));
        self.ownership.chown_recursive(&package.path(), ids)
    }

    /// Run each statement in its own shell, stopping at the first failure.
    fn run_hooks(
        &self,
        package: &Package,
        kind: HookKind,
        statements: &[String],
    ) -> Result<(), StowyError> {
        for statement in statements {
            self.log
                .debug(&format!("{}: {kind}: {statement}", package.name()));
            let result = self
                .executor
                .run_shell(statement)
                .map_err(|source| StowyError::Spawn {
                    label: format!("sh -c {statement}"),
                    source,
                })?;
            if !result.success {
                return Err(StowyError::HookFailed {
                    package: package.name().to_string(),
                    kind,
                    statement: statement.clone(),
                    exit_code: result.exit_code(),
                });
            }
        }
        Ok(())
    }

    fn invoke(&self, command: &LinkCommand, group: &TargetGroup<'_>) -> Result<(), StowyError> {
        let args = command.args_for(group);
        self.log
            .detail(&format!("{} {}", command.program, args.join(" ")));
        let result = self
            .executor
            .run(&command.program, &args)
            .map_err(|source| StowyError::Spawn {
                label: command.program.clone(),
                source,
            })?;
        if result.success {
            Ok(())
        } else {
            Err(StowyError::LinkToolFailed {
                program: command.program.clone(),
                target: group.target.display().to_string(),
                reason: format!("exit {}", result.exit_code()),
            })
        }
    }
}

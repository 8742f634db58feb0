//! Prerequisite Service - host tool detection and installation.
//!
//! Each requirement walks `Unchecked → Satisfied | BelowMinimum | Missing`;
//! in interactive mode an accepted install moves it on to `Satisfied` or
//! `InstallFailed` after a fresh re-check. Nothing is cached between runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{HostProbe, Installer, Prompter},
    },
    domain::{
        OsProfile, RequirementState, ToolRequirement, ToolStatus, Version,
        capabilities::{install_guidance, install_plan},
        extract_version,
    },
    error::InfrakitResult,
};

/// How `resolve` treats unmet requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Report only; never prompt or install.
    CheckOnly,
    /// Offer to install. `assume_yes` skips the prompt.
    Interactive {
        assume_yes: bool,
        default_answer: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementOutcome {
    pub tool: String,
    pub required: bool,
    pub min_version: Version,
    pub state: RequirementState,
    /// Manual remediation when the tool is still not satisfied.
    pub guidance: Option<String>,
}

/// Result of one `resolve` run.
#[derive(Debug, Clone, Serialize)]
pub struct PrereqReport {
    pub os: OsProfile,
    pub checked_at: DateTime<Utc>,
    pub outcomes: Vec<RequirementOutcome>,
}

impl PrereqReport {
    /// Required tools that are still not satisfied.
    pub fn blocking(&self) -> impl Iterator<Item = &RequirementOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.required && !o.state.is_satisfied())
    }

    pub fn is_ready(&self) -> bool {
        self.blocking().next().is_none()
    }
}

/// Host prerequisite resolver.
pub struct PrerequisiteService {
    probe: Box<dyn HostProbe>,
    installer: Box<dyn Installer>,
    prompter: Box<dyn Prompter>,
}

impl PrerequisiteService {
    pub fn new(
        probe: Box<dyn HostProbe>,
        installer: Box<dyn Installer>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self {
            probe,
            installer,
            prompter,
        }
    }

    /// Read the OS-release descriptor, falling back to the kernel name.
    pub fn detect_os(&self) -> OsProfile {
        let kernel = self.probe.kernel_name();
        let machine = self.probe.machine();

        let os = match self.probe.os_release() {
            Some(contents) => OsProfile::from_os_release(&contents, &kernel, &machine),
            None => OsProfile::from_kernel(&kernel, &machine, self.probe.os_version().as_deref()),
        };
        debug!(os = %os, family = %os.family(), "Detected host");
        os
    }

    /// `PATH` lookup, then the first `MAJOR.MINOR` of the version output.
    pub fn check_tool(&self, requirement: &ToolRequirement) -> ToolStatus {
        if !self.probe.command_exists(requirement.binary) {
            debug!(tool = requirement.tool, "Not found on PATH");
            return ToolStatus::Missing;
        }

        let Some(output) = self
            .probe
            .command_output(requirement.binary, requirement.version_args)
        else {
            debug!(
                tool = requirement.tool,
                probe = %requirement.probe_command(),
                "Version probe failed"
            );
            return ToolStatus::Missing;
        };

        match extract_version(&output).and_then(|raw| Version::parse(&raw).ok()) {
            Some(version) => {
                debug!(tool = requirement.tool, %version, "Found");
                ToolStatus::Installed(version)
            }
            None => {
                debug!(
                    tool = requirement.tool,
                    output = %output.trim(),
                    "Unparseable version output"
                );
                ToolStatus::Missing
            }
        }
    }

    pub fn evaluate(&self, requirement: &ToolRequirement) -> RequirementState {
        RequirementState::from_status(self.check_tool(requirement), requirement.min_version)
    }

    /// Check every requirement and, in interactive mode, install on consent.
    #[instrument(skip_all, fields(count = requirements.len(), mode = ?mode))]
    pub fn resolve(
        &self,
        requirements: &[ToolRequirement],
        mode: ResolveMode,
    ) -> InfrakitResult<PrereqReport> {
        let os = self.detect_os();
        let family = os.family();

        let mut outcomes = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            let mut state = self.evaluate(requirement);
            info!(tool = requirement.tool, state = %state, "Checked");

            if state.needs_install() {
                if let ResolveMode::Interactive {
                    assume_yes,
                    default_answer,
                } = mode
                {
                    if let Some(plan) = install_plan(requirement.tool, family) {
                        let question = format!(
                            "{} is {}. Install it now ({} step(s))?",
                            requirement.tool,
                            state,
                            plan.steps.len()
                        );
                        let accepted =
                            assume_yes || self.prompter.confirm(&question, default_answer)?;

                        if accepted {
                            state = self.install(requirement, &plan);
                        } else {
                            info!(tool = requirement.tool, "Install declined");
                        }
                    }
                }
            }

            let guidance = (!state.is_satisfied()).then(|| install_guidance(requirement, family));
            outcomes.push(RequirementOutcome {
                tool: requirement.tool.to_string(),
                required: requirement.required,
                min_version: requirement.min_version,
                state,
                guidance,
            });
        }

        Ok(PrereqReport {
            os,
            checked_at: Utc::now(),
            outcomes,
        })
    }

    /// Block catalog operations on unmet required tools.
    ///
    /// Optional tools that are missing only produce a warning.
    #[instrument(skip_all)]
    pub fn gate(&self, requirements: &[ToolRequirement]) -> InfrakitResult<()> {
        for requirement in requirements {
            let state = self.evaluate(requirement);
            if state.is_satisfied() {
                continue;
            }

            let remediation = install_guidance(requirement, self.detect_os().family());
            if requirement.required {
                return Err(ApplicationError::PreconditionFailed {
                    tool: requirement.tool.to_string(),
                    reason: state.to_string(),
                    remediation,
                }
                .into());
            }
            warn!(tool = requirement.tool, state = %state, %remediation, "Optional tool not ready");
        }
        Ok(())
    }

    fn install(
        &self,
        requirement: &ToolRequirement,
        plan: &crate::domain::InstallPlan,
    ) -> RequirementState {
        info!(tool = requirement.tool, family = %plan.family, "Running install plan");

        if let Err(e) = self.installer.run(plan) {
            warn!(tool = requirement.tool, error = %e, "Install failed");
            return RequirementState::InstallFailed {
                reason: e.to_string(),
            };
        }

        match self.evaluate(requirement) {
            state @ RequirementState::Satisfied { .. } => state,
            other => RequirementState::InstallFailed {
                reason: format!("still {other} after install"),
            },
        }
    }
}

//! Install plan executor.

use std::process::{Command, Stdio};

use tracing::{info, instrument};

use infrakit_core::{
    application::{ApplicationError, ports::Installer},
    domain::InstallPlan,
    error::InfrakitResult,
};

/// Runs plan steps as child processes with the terminal attached, so `sudo`
/// can prompt for a password.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellInstaller {
    dry_run: bool,
}

impl ShellInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log each step instead of running it.
    pub fn dry_run() -> Self {
        Self { dry_run: true }
    }
}

impl Installer for ShellInstaller {
    #[instrument(skip_all, fields(tool = %plan.tool, family = %plan.family))]
    fn run(&self, plan: &InstallPlan) -> InfrakitResult<()> {
        for (index, step) in plan.steps.iter().enumerate() {
            info!(step = index + 1, total = plan.steps.len(), command = %step, "Install step");
            if self.dry_run {
                continue;
            }

            let status = Command::new(&step.program)
                .args(&step.args)
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map_err(|e| ApplicationError::InstallFailed {
                    tool: plan.tool.clone(),
                    reason: format!("failed to run `{step}`: {e}"),
                })?;

            if !status.success() {
                return Err(ApplicationError::InstallFailed {
                    tool: plan.tool.clone(),
                    reason: format!(
                        "`{step}` exited with {}",
                        status
                            .code()
                            .map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
                    ),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrakit_core::domain::{InstallStep, OsFamily};

    fn plan(program: &str, args: &[&str]) -> InstallPlan {
        InstallPlan {
            tool: "demo".into(),
            family: OsFamily::Debian,
            steps: vec![InstallStep {
                program: program.into(),
                args: args.iter().map(|a| a.to_string()).collect(),
            }],
        }
    }

    #[test]
    fn dry_run_never_spawns() {
        let plan = plan("infrakit-no-such-program", &[]);
        assert!(ShellInstaller::dry_run().run(&plan).is_ok());
    }

    #[test]
    fn spawn_failure_is_install_failure() {
        let plan = plan("infrakit-no-such-program", &[]);
        let err = ShellInstaller::new().run(&plan).unwrap_err();
        assert!(err.to_string().contains("Installing 'demo' failed"));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_aborts_plan() {
        let plan = plan("sh", &["-c", "exit 3"]);
        let err = ShellInstaller::new().run(&plan).unwrap_err();
        assert!(err.to_string().contains("code 3"));
    }
}

//! `infrakit prereq`: check, and optionally install, host tools.

use infrakit_core::{
    application::{PrereqReport, RequirementOutcome, ResolveMode},
    domain::{RequirementState, capabilities::REQUIREMENTS},
};

use crate::{
    cli::{GlobalArgs, PrereqArgs},
    commands::prerequisite_service,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: PrereqArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let mode = resolve_mode(&args, &config);
    let report = prerequisite_service().resolve(REQUIREMENTS, mode)?;

    if output.is_json() {
        output.json(&report)?;
    } else {
        print_report(&output, &report)?;
    }

    let blocking: Vec<_> = report.blocking().map(|o| o.tool.as_str()).collect();
    if !blocking.is_empty() {
        return Err(CliError::PrerequisitesUnmet {
            tools: blocking.join(", "),
        });
    }
    Ok(())
}

fn resolve_mode(args: &PrereqArgs, config: &AppConfig) -> ResolveMode {
    if args.check {
        ResolveMode::CheckOnly
    } else {
        ResolveMode::Interactive {
            assume_yes: args.yes || config.prerequisites.assume_yes,
            default_answer: config.prerequisites.default_answer,
        }
    }
}

fn print_report(output: &OutputManager, report: &PrereqReport) -> std::io::Result<()> {
    output.header(&format!(
        "Host: {} (checked {})",
        report.os,
        report.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
    ))?;

    for outcome in &report.outcomes {
        let line = describe(outcome);
        match (&outcome.state, outcome.required) {
            (RequirementState::Satisfied { .. }, _) => output.success(&line)?,
            (_, true) => output.error(&line)?,
            (_, false) => output.warning(&line)?,
        }
        if let Some(guidance) = &outcome.guidance {
            for hint in guidance.lines() {
                output.print(&format!("    {hint}"))?;
            }
        }
    }
    Ok(())
}

fn describe(outcome: &RequirementOutcome) -> String {
    let optional = if outcome.required { "" } else { " (optional)" };
    format!(
        "{} >= {}{optional}: {}",
        outcome.tool, outcome.min_version, outcome.state
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrakit_core::domain::Version;

    #[test]
    fn check_flag_never_installs() {
        let args = PrereqArgs {
            check: true,
            yes: false,
        };
        assert_eq!(
            resolve_mode(&args, &AppConfig::default()),
            ResolveMode::CheckOnly
        );
    }

    #[test]
    fn config_assume_yes_applies_without_flag() {
        let mut config = AppConfig::default();
        config.prerequisites.assume_yes = true;
        config.prerequisites.default_answer = false;
        let args = PrereqArgs {
            check: false,
            yes: false,
        };
        assert_eq!(
            resolve_mode(&args, &config),
            ResolveMode::Interactive {
                assume_yes: true,
                default_answer: false,
            }
        );
    }

    #[test]
    fn describe_marks_optional_tools() {
        let outcome = RequirementOutcome {
            tool: "task".into(),
            required: false,
            min_version: Version::new(3, 0),
            state: RequirementState::Missing,
            guidance: None,
        };
        let line = describe(&outcome);
        assert!(line.starts_with("task >= 3.0 (optional)"));
    }
}

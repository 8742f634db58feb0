//! Prerequisite resolution against scripted hosts.

use infrakit_adapters::{ShellInstaller, StaticHostProbe};
use infrakit_core::{
    application::{
        ApplicationError, PrerequisiteService, ResolveMode,
        ports::{HostProbe, Prompter},
    },
    domain::{
        CpuArch, OsFamily, RequirementState, ToolStatus, Version,
        capabilities::{DOCKER, DOCKER_COMPOSE, REQUIREMENTS, TASK, required_tools},
    },
    error::{InfrakitError, InfrakitResult},
};

/// Answers every question with a fixed value.
struct Answer(bool);

impl Prompter for Answer {
    fn confirm(&self, _question: &str, _default: bool) -> InfrakitResult<bool> {
        Ok(self.0)
    }
}

fn service(probe: StaticHostProbe) -> PrerequisiteService {
    PrerequisiteService::new(
        Box::new(probe),
        Box::new(ShellInstaller::dry_run()),
        Box::new(Answer(false)),
    )
}

#[test]
fn detects_ubuntu_profile() {
    let os = service(StaticHostProbe::ubuntu()).detect_os();
    assert_eq!(os.distro_id, "ubuntu");
    assert_eq!(os.version_id, "22.04");
    assert_eq!(os.arch, CpuArch::Amd64);
    assert_eq!(os.family(), OsFamily::Debian);
}

#[test]
fn falls_back_to_kernel_name_without_os_release() {
    let os = service(StaticHostProbe::macos()).detect_os();
    assert_eq!(os.distro_id, "macos");
    assert_eq!(os.version_id, "14.4");
    assert_eq!(os.arch, CpuArch::Arm64);
    assert_eq!(os.family(), OsFamily::MacOs);
}

#[test]
fn raspberry_pi_arch_is_normalized() {
    let probe = StaticHostProbe::ubuntu()
        .with_os_release("ID=raspbian\nID_LIKE=debian\nVERSION_ID=\"12\"\n")
        .with_machine("armv7l");
    let os = service(probe).detect_os();
    assert_eq!(os.arch, CpuArch::Armv7);
    assert_eq!(os.family(), OsFamily::Debian);
}

#[test]
fn docker_19_03_is_below_minimum() {
    let probe = StaticHostProbe::ubuntu()
        .with_tool("docker --version", "Docker version 19.03.12, build 48a66213fe");
    let svc = service(probe);

    assert_eq!(
        svc.check_tool(&DOCKER),
        ToolStatus::Installed(Version::new(19, 3))
    );
    assert_eq!(
        svc.evaluate(&DOCKER),
        RequirementState::BelowMinimum {
            found: Version::new(19, 3),
            required: Version::new(20, 10),
        }
    );
}

#[test]
fn current_stack_is_satisfied() {
    let svc = service(StaticHostProbe::ubuntu().with_docker());
    assert!(svc.evaluate(&DOCKER).is_satisfied());
    assert!(svc.evaluate(&DOCKER_COMPOSE).is_satisfied());
    assert!(svc.gate(&required_tools()).is_ok());
}

#[test]
fn broken_probe_reports_missing() {
    let probe = StaticHostProbe::ubuntu().with_broken("task");
    let svc = service(probe.clone());

    assert!(probe.command_exists("task"));
    assert_eq!(svc.check_tool(&TASK), ToolStatus::Missing);
}

#[test]
fn check_only_report_lists_every_tool() {
    let report = service(StaticHostProbe::ubuntu().with_docker())
        .resolve(REQUIREMENTS, ResolveMode::CheckOnly)
        .unwrap();

    let tools: Vec<_> = report.outcomes.iter().map(|o| o.tool.as_str()).collect();
    assert_eq!(tools, ["docker", "docker-compose", "task"]);
    assert!(report.is_ready(), "task is optional");
    assert_eq!(report.outcomes[2].state, RequirementState::Missing);
    assert!(report.outcomes[2].guidance.is_some());
}

#[test]
fn declined_install_leaves_gate_closed() {
    let svc = service(StaticHostProbe::ubuntu());
    let report = svc
        .resolve(
            &[DOCKER],
            ResolveMode::Interactive {
                assume_yes: false,
                default_answer: true,
            },
        )
        .unwrap();

    assert!(!report.is_ready());
    let err = svc.gate(&required_tools()).unwrap_err();
    assert!(matches!(
        err,
        InfrakitError::Application(ApplicationError::PreconditionFailed { .. })
    ));
    assert!(err.suggestions()[0].contains("get.docker.com"));
}

#[test]
fn dry_run_install_does_not_satisfy_tool() {
    let svc = service(StaticHostProbe::ubuntu());
    let report = svc
        .resolve(
            &[TASK],
            ResolveMode::Interactive {
                assume_yes: true,
                default_answer: false,
            },
        )
        .unwrap();

    assert!(matches!(
        report.outcomes[0].state,
        RequirementState::InstallFailed { ref reason } if reason.contains("still missing")
    ));
}

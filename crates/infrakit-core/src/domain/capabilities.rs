//! Prerequisite and install-plan registries.
//!
//! # Adding a New Tool
//!
//! 1. Add one [`ToolRequirement`] to [`REQUIREMENTS`]
//! 2. Add [`InstallPlanDef`] entries for each OS family that can install it
//! 3. The resolver and the `prereq` command derive from here
//!
//! Families with no entry get guidance text pointing at the tool's docs.

use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::requirement::ToolRequirement, value_objects::OsFamily, version::Version,
};

pub const DOCKER: ToolRequirement = ToolRequirement {
    tool: "docker",
    binary: "docker",
    version_args: &["--version"],
    min_version: Version::new(20, 10),
    required: true,
    docs_url: "https://docs.docker.com/engine/install/",
};

pub const DOCKER_COMPOSE: ToolRequirement = ToolRequirement {
    tool: "docker-compose",
    binary: "docker",
    version_args: &["compose", "version"],
    min_version: Version::new(2, 0),
    required: true,
    docs_url: "https://docs.docker.com/compose/install/",
};

pub const TASK: ToolRequirement = ToolRequirement {
    tool: "task",
    binary: "task",
    version_args: &["--version"],
    min_version: Version::new(3, 0),
    required: false,
    docs_url: "https://taskfile.dev/installation/",
};

/// Every tool the `prereq` command checks, in check order.
pub static REQUIREMENTS: &[ToolRequirement] = &[DOCKER, DOCKER_COMPOSE, TASK];

/// Tools whose absence blocks catalog operations.
pub fn required_tools() -> Vec<ToolRequirement> {
    REQUIREMENTS.iter().copied().filter(|r| r.required).collect()
}

pub fn find_requirement(tool: &str) -> Option<&'static ToolRequirement> {
    REQUIREMENTS.iter().find(|r| r.tool == tool)
}

// ── Install plans ─────────────────────────────────────────────────────────────

/// Static description of how to install one tool on one OS family.
#[derive(Debug, Clone, Copy)]
pub struct InstallPlanDef {
    pub tool: &'static str,
    pub family: OsFamily,
    /// Each step is `[program, args...]`, run in order; the first failing
    /// step aborts the plan.
    pub steps: &'static [&'static [&'static str]],
}

const GET_DOCKER: &[&str] = &["sh", "-c", "curl -fsSL https://get.docker.com | sudo sh"];
const ADD_DOCKER_GROUP: &[&str] = &["sh", "-c", "sudo usermod -aG docker \"$USER\""];
const ENABLE_DOCKER: &[&str] = &["sudo", "systemctl", "enable", "--now", "docker"];
const GET_TASK: &[&str] = &[
    "sh",
    "-c",
    "curl -fsSL https://taskfile.dev/install.sh | sudo sh -s -- -d -b /usr/local/bin",
];

pub static INSTALL_PLANS: &[InstallPlanDef] = &[
    // ── docker ────────────────────────────────────────────────────────────────
    InstallPlanDef {
        tool: "docker",
        family: OsFamily::Debian,
        steps: &[GET_DOCKER, ADD_DOCKER_GROUP],
    },
    InstallPlanDef {
        tool: "docker",
        family: OsFamily::Fedora,
        steps: &[GET_DOCKER, ENABLE_DOCKER, ADD_DOCKER_GROUP],
    },
    InstallPlanDef {
        tool: "docker",
        family: OsFamily::Arch,
        steps: &[
            &["sudo", "pacman", "-S", "--needed", "--noconfirm", "docker"],
            ENABLE_DOCKER,
            ADD_DOCKER_GROUP,
        ],
    },
    InstallPlanDef {
        tool: "docker",
        family: OsFamily::MacOs,
        steps: &[&["brew", "install", "--cask", "docker"]],
    },
    // ── docker compose plugin ─────────────────────────────────────────────────
    // Docker Desktop bundles compose on macOS, so there is no macOS entry.
    InstallPlanDef {
        tool: "docker-compose",
        family: OsFamily::Debian,
        steps: &[
            &["sudo", "apt-get", "update"],
            &["sudo", "apt-get", "install", "-y", "docker-compose-plugin"],
        ],
    },
    InstallPlanDef {
        tool: "docker-compose",
        family: OsFamily::Fedora,
        steps: &[&["sudo", "dnf", "install", "-y", "docker-compose-plugin"]],
    },
    InstallPlanDef {
        tool: "docker-compose",
        family: OsFamily::Arch,
        steps: &[&["sudo", "pacman", "-S", "--needed", "--noconfirm", "docker-compose"]],
    },
    // ── task ──────────────────────────────────────────────────────────────────
    InstallPlanDef {
        tool: "task",
        family: OsFamily::Debian,
        steps: &[GET_TASK],
    },
    InstallPlanDef {
        tool: "task",
        family: OsFamily::Fedora,
        steps: &[GET_TASK],
    },
    InstallPlanDef {
        tool: "task",
        family: OsFamily::Arch,
        steps: &[&["sudo", "pacman", "-S", "--needed", "--noconfirm", "go-task"]],
    },
    InstallPlanDef {
        tool: "task",
        family: OsFamily::MacOs,
        steps: &[&["brew", "install", "go-task"]],
    },
];

/// One command of an install plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallStep {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for InstallStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Ordered, owned install procedure for one tool on the detected host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPlan {
    pub tool: String,
    pub family: OsFamily,
    pub steps: Vec<InstallStep>,
}

/// Look up the install plan for `tool` on `family`.
pub fn install_plan(tool: &str, family: OsFamily) -> Option<InstallPlan> {
    INSTALL_PLANS
        .iter()
        .find(|def| def.tool == tool && def.family == family)
        .map(|def| InstallPlan {
            tool: def.tool.to_string(),
            family: def.family,
            steps: def
                .steps
                .iter()
                .filter_map(|step| step.split_first())
                .map(|(program, args)| InstallStep {
                    program: (*program).to_string(),
                    args: args.iter().map(|a| (*a).to_string()).collect(),
                })
                .collect(),
        })
}

/// Guidance shown when no plan exists or the user declined.
pub fn install_guidance(requirement: &ToolRequirement, family: OsFamily) -> String {
    match install_plan(requirement.tool, family) {
        Some(plan) => {
            let commands: Vec<String> = plan.steps.iter().map(|s| s.to_string()).collect();
            format!(
                "install {} with: {} (docs: {})",
                requirement.tool,
                commands.join(" && "),
                requirement.docs_url
            )
        }
        None if requirement.tool == "docker-compose" && family == OsFamily::MacOs => {
            "docker compose ships with Docker Desktop; update Docker Desktop".to_string()
        }
        None => format!(
            "automatic installation of {} is not supported on {}; see {}",
            requirement.tool, family, requirement.docs_url
        ),
    }
}

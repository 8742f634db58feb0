//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use infrakit_core::domain::CatalogType;

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "infrakit",
    bin_name = "infrakit",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Local infrastructure and monitoring stacks on docker compose",
    long_about = "infrakit generates docker compose instances for databases, \
                  brokers and observability tools, then starts, stops and \
                  inspects them on a shared network.",
    after_help = "EXAMPLES:\n\
        \x20 infrakit setup infra postgres redis\n\
        \x20 infrakit start infra --all\n\
        \x20 infrakit status monitoring\n\
        \x20 infrakit prereq --check",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate instance directories for catalog resources.
    #[command(
        about = "Generate compose instances",
        after_help = "EXAMPLES:\n\
            \x20 infrakit setup infra postgres redis\n\
            \x20 infrakit setup monitoring --all\n\
            \x20 infrakit --base-dir /srv/stack setup infra clickhouse"
    )]
    Setup(BatchArgs),

    /// Bring resources up.
    #[command(
        about = "Start resources",
        after_help = "EXAMPLES:\n\
            \x20 infrakit start infra postgres\n\
            \x20 infrakit start monitoring --all"
    )]
    Start(BatchArgs),

    /// Bring resources down.
    #[command(
        about = "Stop resources",
        after_help = "EXAMPLES:\n\
            \x20 infrakit stop infra redis\n\
            \x20 infrakit stop monitoring --all"
    )]
    Stop(BatchArgs),

    /// Show the state of set-up instances.
    #[command(
        visible_alias = "ps",
        about = "Show instance status",
        after_help = "EXAMPLES:\n\
            \x20 infrakit status infra\n\
            \x20 infrakit status monitoring grafana"
    )]
    Status(StatusArgs),

    /// List catalog resources.
    #[command(
        visible_alias = "ls",
        about = "List available resources",
        after_help = "EXAMPLES:\n\
            \x20 infrakit list\n\
            \x20 infrakit list infra --format json"
    )]
    List(ListArgs),

    /// Check and install host prerequisites.
    #[command(
        about = "Check host prerequisites",
        after_help = "EXAMPLES:\n\
            \x20 infrakit prereq --check\n\
            \x20 infrakit prereq --yes"
    )]
    Prereq(PrereqArgs),

    /// Initialise an infrakit configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 infrakit init\n\
            \x20 infrakit --config ./infrakit.toml init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 infrakit completions bash > ~/.local/share/bash-completion/completions/infrakit\n\
            \x20 infrakit completions zsh  > ~/.zfunc/_infrakit\n\
            \x20 infrakit completions fish > ~/.config/fish/completions/infrakit.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the infrakit configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 infrakit config get runtime.network\n\
            \x20 infrakit config list\n\
            \x20 infrakit config path"
    )]
    Config(ConfigCommands),
}

// ── setup / start / stop ──────────────────────────────────────────────────────

/// Arguments shared by the batch verbs.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("targets").required(true).args(["names", "all"])))]
pub struct BatchArgs {
    /// Catalog the names belong to.
    #[arg(value_name = "CATALOG", value_parser = parse_catalog, help = "infra | monitoring")]
    pub catalog: CatalogType,

    /// Resources to act on, in order.
    #[arg(value_name = "NAME", help = "Resource names")]
    pub names: Vec<String>,

    /// Every resource of the catalog, in declared order.
    #[arg(long = "all", conflicts_with = "names", help = "Act on every resource")]
    pub all: bool,
}

// ── status ────────────────────────────────────────────────────────────────────

/// Arguments for `infrakit status`.
#[derive(Debug, Args)]
pub struct StatusArgs {
    #[arg(value_name = "CATALOG", value_parser = parse_catalog, help = "infra | monitoring")]
    pub catalog: CatalogType,

    /// Limit to one resource; otherwise every instance directory is shown.
    #[arg(value_name = "NAME", help = "Resource name")]
    pub name: Option<String>,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `infrakit list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only this catalog.
    #[arg(value_name = "CATALOG", value_parser = parse_catalog, help = "infra | monitoring")]
    pub catalog: Option<CatalogType>,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── prereq ────────────────────────────────────────────────────────────────────

/// Arguments for `infrakit prereq`.
#[derive(Debug, Args)]
pub struct PrereqArgs {
    /// Report only; never prompt or install.
    #[arg(long = "check", help = "Only check, never install")]
    pub check: bool,

    /// Install missing tools without asking.
    #[arg(
        short = 'y',
        long = "yes",
        conflicts_with = "check",
        help = "Answer yes to every install prompt"
    )]
    pub yes: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `infrakit init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `infrakit completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `infrakit config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `runtime.network`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

fn parse_catalog(raw: &str) -> Result<CatalogType, String> {
    raw.parse::<CatalogType>()
        .map_err(|e| format!("{e} (expected infra or monitoring)"))
}

// ── tests ─────────────────────────────────────────────────────────────────────

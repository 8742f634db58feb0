//! `infrakit setup|start|stop`: run one verb over a batch of resources.

use tracing::{info, instrument};

use infrakit_core::{
    application::{BatchReport, CatalogService},
    domain::CatalogType,
};

use crate::{
    cli::{BatchArgs, GlobalArgs},
    commands::{catalog_service, ensure_ready},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// The three batch verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Setup,
    Start,
    Stop,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }

    /// Setup only writes files; the other verbs drive the runtime.
    fn needs_runtime(self) -> bool {
        !matches!(self, Self::Setup)
    }

    fn run(
        self,
        service: &CatalogService,
        catalog: CatalogType,
        names: &[String],
    ) -> CliResult<BatchReport> {
        let report = match self {
            Self::Setup => service.setup(catalog, names)?,
            Self::Start => service.start(catalog, names)?,
            Self::Stop => service.stop(catalog, names)?,
        };
        Ok(report)
    }
}

#[instrument(skip_all, fields(verb = verb.as_str(), catalog = %args.catalog))]
pub fn execute(
    verb: Verb,
    args: BatchArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = catalog_service(&config)?;
    let names = if args.all {
        service.all_names(args.catalog)
    } else {
        args.names
    };

    if let Some(dup) = first_duplicate(&names) {
        return Err(CliError::InvalidInput {
            message: format!("'{dup}' is listed more than once"),
        });
    }
    // Reject unknown names before the gate so typos are reported as such.
    service.validate(args.catalog, &names)?;
    ensure_ready(&global, &service, verb.needs_runtime())?;

    if !output.is_json() {
        output.header(&format!(
            "{} {} ({})",
            capitalize(verb.as_str()),
            args.catalog,
            names.join(", ")
        ))?;
    }

    let spinner = if verb.needs_runtime() {
        output.spinner(format!("{} {} resource(s)...", verb.as_str(), names.len()))
    } else {
        indicatif::ProgressBar::hidden()
    };
    let report = verb.run(&service, args.catalog, &names);
    spinner.finish_and_clear();
    let report = report?;

    if output.is_json() {
        output.json(&report)?;
    } else {
        output.batch(&report)?;
    }

    info!(
        total = report.len(),
        failed = report.failed().count(),
        "Batch finished"
    );

    if report.has_failures() {
        let failed: Vec<_> = report.failed().map(|o| o.name.as_str()).collect();
        return Err(CliError::BatchFailed {
            verb: verb.as_str(),
            failed: failed.len(),
            total: report.len(),
            names: failed.join(", "),
        });
    }

    if verb == Verb::Setup && !output.is_json() {
        output.info(&format!(
            "Next: infrakit start {} {}",
            args.catalog,
            names.join(" ")
        ))?;
    }
    Ok(())
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(*name))
        .map(|(_, name)| name.as_str())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! `infrakit status`: per-instance container state.

use infrakit_core::application::{InstanceState, InstanceStatus};

use crate::{
    cli::{GlobalArgs, StatusArgs},
    commands::{catalog_service, ensure_ready},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: StatusArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = catalog_service(&config)?;
    if let Some(name) = &args.name {
        service.validate(args.catalog, std::slice::from_ref(name))?;
    }
    ensure_ready(&global, &service, true)?;

    let spinner = output.spinner(format!("Querying {} instances...", args.catalog));
    let statuses = service.status(args.catalog, args.name.as_deref());
    spinner.finish_and_clear();
    let statuses = statuses?;

    if output.is_json() {
        output.json(&statuses)?;
        return Ok(());
    }

    if statuses.is_empty() {
        output.info(&format!(
            "No {} instances under {}",
            args.catalog,
            service.base_dir().join(args.catalog.as_str()).display()
        ))?;
        return Ok(());
    }

    output.header(&format!("{} instances:", args.catalog))?;
    for status in &statuses {
        print_status(&output, status)?;
    }
    Ok(())
}

fn print_status(output: &OutputManager, status: &InstanceStatus) -> std::io::Result<()> {
    let line = format!("{:<12} {}", status.resource, status.state);
    match &status.state {
        InstanceState::Running(services) if services.iter().all(|s| s.is_running()) => {
            output.success(&line)?
        }
        InstanceState::Running(_) | InstanceState::NoContainers => output.warning(&line)?,
        InstanceState::NotSetUp => output.print(&format!("  {line}"))?,
        InstanceState::Error(_) => output.error(&line)?,
    }

    if let InstanceState::Running(services) = &status.state {
        for svc in services {
            output.print(&format!(
                "    {:<24} {:<10} {}",
                svc.service, svc.state, svc.status
            ))?;
        }
    }
    Ok(())
}

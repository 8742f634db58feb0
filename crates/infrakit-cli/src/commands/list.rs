//! Implementation of the `infrakit list` command.

use std::path::PathBuf;

use serde::Serialize;

use infrakit_core::{
    application::CatalogService,
    domain::{COMPOSE_FILE, CatalogType},
};

use crate::{
    cli::{GlobalArgs, ListArgs, ListFormat},
    commands::catalog_service,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// One catalog entry as shown to the user.
#[derive(Debug, Serialize)]
struct ListedResource {
    catalog: CatalogType,
    name: &'static str,
    summary: &'static str,
    path: PathBuf,
    set_up: bool,
}

pub fn execute(
    args: ListArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let service = catalog_service(&config)?;
    let catalogs = match args.catalog {
        Some(catalog) => vec![catalog],
        None => CatalogType::ALL.to_vec(),
    };
    let resources = collect(&service, &catalogs);

    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            for catalog in &catalogs {
                output.header(&format!("{catalog}:"))?;
                for r in resources.iter().filter(|r| r.catalog == *catalog) {
                    let marker = if r.set_up { " (set up)" } else { "" };
                    output.print(&format!("  {:<12} {}{marker}", r.name, r.summary))?;
                }
            }
        }
        // Machine-readable formats bypass quiet mode.
        ListFormat::List => {
            for r in &resources {
                println!("{}", r.name);
            }
        }
        ListFormat::Json => output.json(&resources)?,
    }

    Ok(())
}

fn collect(service: &CatalogService, catalogs: &[CatalogType]) -> Vec<ListedResource> {
    catalogs
        .iter()
        .flat_map(|&catalog| {
            service.list(catalog).into_iter().map(move |d| {
                let path = service.instance_dir(catalog, d.name);
                ListedResource {
                    catalog,
                    name: d.name,
                    summary: d.summary,
                    set_up: path.join(COMPOSE_FILE).is_file(),
                    path,
                }
            })
        })
        .collect()
}

//! Strata command-line entry point.
//!
//! Prepares the config directory, loads the settings file and dispatches to
//! the CLI command registry.

use std::{error::Error, process};

use tracing::{info, instrument};

use strata::{
    cli::{CliService, formatting::format_error},
    config::{ConfigPaths, bootstrap_config_dir},
    config_store::ConfigStore,
    tracing_config,
};

const MAX_CONCURRENT_COPIES: usize = 8;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_config::init_cli_mode()?;

    let args: Vec<String> = std::env::args().skip(1).collect();

    ensure_config_directory()?;

    let config_store = ConfigStore::load(toml::Table::new(), ConfigPaths::settings_file()?)?;
    let cli_service = CliService::new(config_store);

    let category = args.first().map(String::as_str).unwrap_or("help");

    let result = match category {
        "help" | "--help" | "-h" => match (args.get(1), args.get(2)) {
            (Some(category), Some(command)) => {
                cli_service.help(Some((category.as_str(), command.as_str())))
            }
            _ => cli_service.help(None),
        },
        _ => match args.get(1) {
            None => cli_service.category_usage(category),
            Some(command) => {
                let command_args = args.get(2..).unwrap_or(&[]);
                cli_service.execute_command(category, command, command_args)
            }
        },
    };

    match result {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}

/// Creates the config directory and seeds it from the template.
///
/// Seeding is retried on every start until one run has completed it.
#[instrument]
fn ensure_config_directory() -> Result<(), Box<dyn Error>> {
    let config_dir = ConfigPaths::config_dir()?;
    let template = ConfigPaths::template_dir()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Some(report) = runtime.block_on(bootstrap_config_dir(
        &template,
        &config_dir,
        MAX_CONCURRENT_COPIES,
    ))? {
        info!(
            config_dir = %config_dir.display(),
            copied = report.copied.len(),
            "Config directory initialized"
        );
    }

    Ok(())
}

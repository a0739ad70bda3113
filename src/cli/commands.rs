//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument, warn};

use crate::application::services::{FetchOptions, FetchReport};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `cardcat --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = resolve_project_dir(cli.project_dir.as_deref())?;
    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Build {
            document,
            templates,
            web_dir,
        } => cmd_build(
            &container,
            document.as_deref(),
            templates.as_deref(),
            web_dir.as_deref(),
        ),
        Commands::Download {
            document,
            web_dir,
            skip_errored,
            timeout,
            no_normalize,
        } => {
            let mut options = FetchOptions::from(&container.settings.fetch);
            options.skip_errored |= *skip_errored;
            if let Some(secs) = timeout {
                options.timeout = Duration::from_secs(*secs);
            }
            if *no_normalize {
                options.normalize_shorthand = false;
            }
            cmd_download(&container, document, web_dir, options)
        }
        Commands::Normalize { document } => cmd_normalize(&container, document.as_deref()),
        Commands::Config { command } => cmd_config(&container, command, &project_dir),
        Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_project_dir(project_dir: Option<&Path>) -> CliResult<PathBuf> {
    match project_dir {
        Some(dir) if !dir.is_dir() => Err(CliError::InvalidArgs(format!(
            "project directory does not exist: {}",
            dir.display()
        ))),
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e).into()),
    }
}

#[instrument(skip(container))]
fn cmd_build(
    container: &ServiceContainer,
    document: Option<&Path>,
    templates: Option<&Path>,
    web_dir: Option<&Path>,
) -> CliResult<()> {
    let settings = &container.settings;
    let document = document.unwrap_or(settings.document.as_path());
    let templates = templates.unwrap_or(settings.template_dir.as_path());
    let web_dir = web_dir.unwrap_or(settings.web_dir.as_path());
    debug!(
        "document: {:?}, templates: {:?}, web_dir: {:?}",
        document, templates, web_dir
    );

    let builder = container.page_builder(templates)?;
    let catalog = container.catalog_store().load(document)?;
    let outfile = builder.write_index(&catalog, web_dir)?;

    output::success(&format!(
        "Wrote {} ({} cards)",
        outfile.display(),
        catalog.root().card_count()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_download(
    container: &ServiceContainer,
    document: &Path,
    web_dir: &Path,
    options: FetchOptions,
) -> CliResult<()> {
    let fetcher = container.image_fetcher(options)?;
    install_interrupt_handler(fetcher.interrupt_handle());

    let report = fetcher.sync_document(document, web_dir)?;
    print_fetch_report(&report, document);
    Ok(())
}

/// First Ctrl-C finishes the current card and saves; a second one exits.
fn install_interrupt_handler(flag: Arc<AtomicBool>) {
    let result = ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            std::process::exit(crate::exitcode::INTERRUPTED);
        }
        eprintln!("Interrupted, finishing current card...");
    });
    if let Err(e) = result {
        warn!("Cannot install Ctrl-C handler: {}", e);
    }
}

fn print_fetch_report(report: &FetchReport, document: &Path) {
    output::header("Images");
    output::detail(&format!("downloaded: {}", report.downloaded));
    output::detail(&format!("cached:     {}", report.cached));
    output::detail(&format!("skipped:    {}", report.skipped));
    if report.failed > 0 {
        output::failure(&format!("failed:     {}", report.failed));
    }
    if report.normalized > 0 {
        output::action("Normalized", &format!("{} bare URL entries", report.normalized));
    }
    if report.interrupted {
        output::warning("interrupted, remaining cards were not visited");
    }
    if report.changed {
        output::success(&format!("Updated {}", document.display()));
    } else {
        output::success(&format!("{} unchanged", document.display()));
    }
}

#[instrument(skip(container))]
fn cmd_normalize(container: &ServiceContainer, document: Option<&Path>) -> CliResult<()> {
    let document = document.unwrap_or(container.settings.document.as_path());
    let converted = container.catalog_store().normalize(document)?;
    if converted > 0 {
        output::success(&format!(
            "Converted {} entries in {}",
            converted,
            document.display()
        ));
    } else {
        output::success(&format!("{} already normalized", document.display()));
    }
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &describe_config_path(&path)),
                None => output::action("global", "<no config directory>"),
            }
            output::action("local", &describe_config_path(&local_config_path(project_dir)));
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}

fn describe_config_path(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}

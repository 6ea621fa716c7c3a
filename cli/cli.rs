mod cli_args;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use coalesce_core::{AppError, Reporter};
use std::process;

use cli_args::{Cli, Commands};
use output::{ConsoleReporter, ReporterSettings};

const MERGE_EXAMPLE: &str = "Example: coalesce coalesce.md ./src";
const HELP_SUGGESTION: &str = "\nRun 'coalesce --help' for a list of commands and options.";

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);
    log::debug!("CLI args parsed: {:?}", cli_args);

    let reporter = ConsoleReporter::new(ReporterSettings::from_flags(
        cli_args.quiet,
        cli_args.verbose,
    ));

    let exit_code = match run_app(cli_args, &reporter) {
        Ok(()) => 0,
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            report_failure(&e, core_err, &reporter);
            exit_code_for(core_err)
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 | 1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, reporter: &dyn Reporter) -> Result<()> {
    match cli.command {
        None => {
            log::debug!("Executing merge...");
            commands::merge::handle_merge_command(&cli.merge, reporter)?;
        }
        Some(Commands::Init(args)) => {
            log::debug!("Executing 'init' command...");
            commands::init::handle_init_command(&args, reporter)?;
        }
        Some(Commands::Preset { action }) => {
            log::debug!("Executing 'preset' command...");
            commands::preset::handle_preset_command(&action, reporter)?;
        }
        Some(Commands::InstallPath) => {
            log::debug!("Executing 'install-path' command...");
            commands::path::handle_install_path(reporter)?;
        }
        Some(Commands::UninstallPath) => {
            log::debug!("Executing 'uninstall-path' command...");
            commands::path::handle_uninstall_path(reporter)?;
        }
    }
    Ok(())
}

fn report_failure(err: &anyhow::Error, core_err: Option<&AppError>, reporter: &dyn Reporter) {
    match core_err {
        Some(AppError::Validation(issues)) => {
            for issue in issues {
                reporter.error(&format!("{} {}", issue, MERGE_EXAMPLE));
            }
            reporter.suggestion(HELP_SUGGESTION);
        }
        Some(AppError::PathResolution(_) | AppError::NoValidSourceDirectories) => {
            reporter.error(&format!("{:#}", err));
            reporter.suggestion(HELP_SUGGESTION);
        }
        Some(AppError::Preset(_)) => {
            reporter.error(&format!("{:#}", err));
            reporter.suggestion("Run 'coalesce preset list' to see all available presets.");
        }
        _ => reporter.error(&format!("{:#}", err)),
    }
}

fn exit_code_for(core_err: Option<&AppError>) -> i32 {
    match core_err {
        Some(AppError::ConfigLoad(_)) => 1,
        Some(AppError::Validation(_)) => 1,
        Some(AppError::Preset(_)) => 1,
        Some(AppError::Asset(_)) => 1,
        Some(AppError::PathResolution(_)) => 2,
        Some(AppError::NoValidSourceDirectories) => 2,
        Some(AppError::DirectoryAccess { .. }) => 2,
        Some(AppError::EntryWrite { .. }) => 2,
        Some(AppError::OutputOpen { .. }) => 2,
        Some(AppError::OutputWrite { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::Io(_)) => 2,
        Some(_) => 1,
        None => 1,
    }
}

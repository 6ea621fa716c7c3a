use anyhow::{Context, Result};
use coalesce_core::{ConfigSource, DirectoryMerger, Reporter, build_options};

use crate::cli_args::MergeArgs;

pub fn handle_merge_command(args: &MergeArgs, reporter: &dyn Reporter) -> Result<()> {
    let working_dir =
        std::env::current_dir().context("Failed to determine the current directory")?;

    let source = ConfigSource::resolve(args.config.as_deref(), &working_dir, reporter);
    log::debug!("Configuration source: {:?}", source);

    let options = build_options(&source, &args.overrides(), reporter)?;
    let summary = DirectoryMerger::new(options, args.dry_run, reporter).merge()?;

    log::debug!("Merge finished: {:?}", summary);
    Ok(())
}

use anyhow::Result;
use coalesce_core::{PresetStore, Reporter};

use crate::cli_args::PresetCommand;

pub fn handle_preset_command(action: &PresetCommand, reporter: &dyn Reporter) -> Result<()> {
    let store = PresetStore::user_default();
    store.ensure_directory(reporter);

    match action {
        PresetCommand::List => list_presets(&store, reporter),
        PresetCommand::Path => show_path(&store, reporter),
    }
}

fn list_presets(store: &PresetStore, reporter: &dyn Reporter) -> Result<()> {
    reporter.info("Available presets:");
    for entry in store.list(reporter) {
        reporter.info(&format!("- {} ({})", entry.name, entry.origin));
    }
    Ok(())
}

fn show_path(store: &PresetStore, reporter: &dyn Reporter) -> Result<()> {
    match store.dir() {
        Some(dir) => {
            reporter.info(&dir.display().to_string());
            Ok(())
        }
        None => anyhow::bail!("Could not determine the presets directory path."),
    }
}

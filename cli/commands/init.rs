use anyhow::{Context, Result};
use coalesce_core::assets::{self, UNIX_RUN_SCRIPT_ASSET, WINDOWS_RUN_SCRIPT_ASSET};
use coalesce_core::{AppError, DEFAULT_CONFIG_FILENAME, PresetStore, Reporter};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::cli_args::InitArgs;

const UNIX_RUN_SCRIPT: &str = "coalesce-run.sh";
const WINDOWS_RUN_SCRIPT: &str = "coalesce-run.bat";

pub fn handle_init_command(args: &InitArgs, reporter: &dyn Reporter) -> Result<()> {
    let working_dir =
        std::env::current_dir().context("Failed to determine the current directory")?;

    let store = PresetStore::user_default();
    store.ensure_directory(reporter);

    let (content, source_name) = match args.preset.as_deref() {
        Some(name) => (store.content(name, reporter)?, format!("preset '{}'", name)),
        None => (assets::default_config()?, "default configuration".to_string()),
    };

    let config_path = working_dir.join(DEFAULT_CONFIG_FILENAME);
    if write_new_file(&config_path, &content, "Configuration file", reporter)? {
        reporter.success(&format!(
            "Created configuration file from {}: {}",
            source_name,
            config_path.display()
        ));
    }

    write_run_script(&working_dir, reporter)
}

fn write_run_script(dir: &Path, reporter: &dyn Reporter) -> Result<()> {
    if cfg!(windows) {
        let content = assets::get_embedded_text(WINDOWS_RUN_SCRIPT_ASSET)?
            .replace("\r\n", "\n")
            .replace('\n', "\r\n");
        let path = dir.join(WINDOWS_RUN_SCRIPT);
        if write_new_file(&path, &content, "Batch file", reporter)? {
            reporter.success(&format!("Created Windows run script: {}", path.display()));
        }
    } else if cfg!(unix) {
        let content = assets::get_embedded_text(UNIX_RUN_SCRIPT_ASSET)?.replace("\r\n", "\n");
        let path = dir.join(UNIX_RUN_SCRIPT);
        if write_new_file(&path, &content, "Shell script", reporter)? {
            make_executable(&path).map_err(|source| AppError::FileWrite {
                path: path.clone(),
                source,
            })?;
            reporter.success(&format!(
                "Created Linux/macOS run script: {}",
                path.display()
            ));
        }
    }
    Ok(())
}

/// Writes `content` to `path` unless the file already exists. Returns whether it was written.
fn write_new_file(path: &Path, content: &str, kind: &str, reporter: &dyn Reporter) -> Result<bool> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            reporter.warning(&format!(
                "{} '{}' already exists. Generation skipped.",
                kind, file_name
            ));
            reporter.info(&path.display().to_string());
            return Ok(false);
        }
        Err(source) => {
            return Err(AppError::FileWrite {
                path: path.to_path_buf(),
                source,
            }
            .into());
        }
    };

    file.write_all(content.as_bytes())
        .map_err(|source| AppError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(true)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

use crate::diagnostics::Reporter;
use crate::error::{AppError, Result};
use crate::options::AppOptions;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Expands a leading `~`, makes `path` absolute against the working
/// directory and folds away `.` and `..` components.
pub fn resolve_absolute(path: &Path) -> io::Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::tilde(raw.as_ref());
    let absolute = std::path::absolute(expanded.as_ref())?;
    Ok(normalize(&absolute))
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolves the output path and source directories of `options` in place.
///
/// Afterwards `output_file_path` is absolute with an existing parent and
/// `valid_source_directory_paths` holds every source directory that exists.
pub fn resolve_paths(options: &mut AppOptions, reporter: &dyn Reporter) -> Result<()> {
    resolve_output(options)?;

    let mut valid = Vec::new();
    for source in &options.source_directory_paths {
        let full_source_path = match resolve_absolute(source) {
            Ok(path) => path,
            Err(e) => {
                reporter.warning(&format!(
                    "Could not resolve source directory '{}': {}. Skipping.",
                    source.display(),
                    e
                ));
                continue;
            }
        };

        if full_source_path.is_dir() {
            reporter.info(&format!(
                "- Added Source Directory: {}",
                full_source_path.display()
            ));
            valid.push(full_source_path);
        } else {
            reporter.warning(&format!(
                "Source directory not found: '{}'. Skipping.",
                full_source_path.display()
            ));
        }
    }

    if valid.is_empty() {
        return Err(AppError::NoValidSourceDirectories);
    }
    options.set_valid_source_directory_paths(valid);
    Ok(())
}

fn resolve_output(options: &mut AppOptions) -> Result<()> {
    let output = resolve_absolute(&options.output_file_path)
        .map_err(|_| AppError::PathResolution(options.output_file_path.clone()))?;

    let output_dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf);
    match output_dir {
        Some(dir) if dir.is_dir() => {
            log::debug!("Output file resolved to {}", output.display());
            options.output_file_path = output;
            Ok(())
        }
        Some(dir) => Err(AppError::PathResolution(dir)),
        None => Err(AppError::PathResolution(output)),
    }
}

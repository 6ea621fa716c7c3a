use crate::diagnostics::Reporter;
use crate::error::{AppError, Result};
use crate::options::AppOptions;
use crate::paths;
use crate::render::MarkdownWriter;
use crate::scanner::Scanner;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Counts gathered by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub processed: usize,
    pub skipped: usize,
    pub source_directories: usize,
    pub dry_run: bool,
}

/// Drives one merge: resolve paths, then preview or write, then summarize.
pub struct DirectoryMerger<'a> {
    options: AppOptions,
    dry_run: bool,
    reporter: &'a dyn Reporter,
    display_root: PathBuf,
}

impl<'a> DirectoryMerger<'a> {
    /// Section headers are shown relative to the current working directory at this point.
    pub fn new(options: AppOptions, dry_run: bool, reporter: &'a dyn Reporter) -> Self {
        let display_root = std::env::current_dir().unwrap_or_else(|e| {
            log::warn!("Could not read the current directory: {}", e);
            PathBuf::new()
        });
        Self {
            options,
            dry_run,
            reporter,
            display_root,
        }
    }

    pub fn with_display_root(mut self, display_root: impl Into<PathBuf>) -> Self {
        self.display_root = display_root.into();
        self
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    pub fn merge(&mut self) -> Result<MergeSummary> {
        paths::resolve_paths(&mut self.options, self.reporter)?;

        let summary = if self.dry_run {
            self.preview()
        } else {
            self.write()?
        };

        self.summarize(&summary);
        Ok(summary)
    }

    fn preview(&self) -> MergeSummary {
        self.reporter.warning("--- DRY RUN MODE ---");
        self.reporter
            .info("The following files would be included in the merge output:");

        let scanner = Scanner::new(&self.options, self.reporter);
        let mut processed = 0;
        for source in self.options.valid_source_directory_paths() {
            for file in scanner.eligible_files(source) {
                self.reporter.info(&format!("- {}", file.display()));
                processed += 1;
            }
        }
        self.reporter.info("");

        MergeSummary {
            processed,
            skipped: 0,
            source_directories: self.options.valid_source_directory_paths().len(),
            dry_run: true,
        }
    }

    fn write(&self) -> Result<MergeSummary> {
        let output_path = self.options.output_file_path();
        self.reporter.info(&format!(
            "Starting merge process. Output will be saved to: {}",
            output_path.display()
        ));

        let file = self.open_output(output_path)?;
        let mut writer = MarkdownWriter::new(BufWriter::new(&file), &self.display_root);
        let scanner = Scanner::new(&self.options, self.reporter);

        let mut summary = MergeSummary {
            source_directories: self.options.valid_source_directory_paths().len(),
            ..MergeSummary::default()
        };
        for source in self.options.valid_source_directory_paths() {
            self.reporter
                .info(&format!("\n--- Processing Source: {} ---", source.display()));

            for file_path in scanner.eligible_files(source) {
                match writer.write_entry(&file_path, &self.options) {
                    Ok(()) => {
                        self.reporter.verbose(&format!("Added: {}", file_path.display()));
                        summary.processed += 1;
                    }
                    Err(e @ AppError::EntryWrite { .. }) => {
                        self.reporter.warning(&e.to_string());
                        summary.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        writer.flush().map_err(|source| AppError::OutputWrite {
            path: output_path.to_path_buf(),
            source,
        })?;
        drop(writer);
        if let Err(e) = FileExt::unlock(&file) {
            log::debug!("Releasing lock on {} failed: {}", output_path.display(), e);
        }

        self.reporter.info("");
        Ok(summary)
    }

    /// Opens the output without replacing its inode, locks it, then truncates.
    ///
    /// An existing output that cannot be opened for writing is deleted first;
    /// a failed deletion is only a warning and the second open reports the error.
    fn open_output(&self, output_path: &Path) -> Result<File> {
        let open_error = |source| AppError::OutputOpen {
            path: output_path.to_path_buf(),
            source,
        };
        let mut existing = output_path.exists();
        let file = match open_for_writing(output_path) {
            Ok(file) => file,
            Err(e) if existing => {
                log::debug!("Opening {} for writing failed: {}", output_path.display(), e);
                self.delete_existing_output(output_path);
                existing = false;
                open_for_writing(output_path).map_err(open_error)?
            }
            Err(e) => return Err(open_error(e)),
        };

        file.try_lock_exclusive().map_err(open_error)?;
        log::debug!("Locked output file {}", output_path.display());
        file.set_len(0).map_err(open_error)?;
        if existing {
            self.reporter.info(&format!(
                "Cleared existing output file: {}",
                output_path.display()
            ));
        }
        Ok(file)
    }

    fn delete_existing_output(&self, output_path: &Path) {
        match fs::remove_file(output_path) {
            Ok(()) => self.reporter.info(&format!(
                "Deleted existing output file: {}",
                output_path.display()
            )),
            Err(e) => self.reporter.warning(&format!(
                "Could not delete existing file '{}'. It might be locked or protected. Error: {}",
                output_path.display(),
                e
            )),
        }
    }

    fn summarize(&self, summary: &MergeSummary) {
        if summary.dry_run {
            if summary.processed > 0 {
                self.reporter.success(&format!(
                    "Dry run complete. Found {} files to include.",
                    summary.processed
                ));
            } else {
                self.reporter
                    .warning("Dry run complete. No eligible files were found.");
            }
            return;
        }

        if summary.processed > 0 {
            self.reporter.success(&format!(
                "Merging complete. Processed {} files across {} source directories.",
                summary.processed, summary.source_directories
            ));
        } else {
            self.reporter
                .warning("No eligible files were found in the provided source directories.");
        }

        if summary.skipped > 0 {
            self.reporter.info(&format!(
                "Skipped {} files (unreadable, excluded, or output file itself).",
                summary.skipped
            ));
        }
    }
}

fn open_for_writing(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

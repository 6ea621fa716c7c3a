use crate::diagnostics::Reporter;
use crate::options::{AppOptions, eq_ignore_case};
use std::fmt;
use std::path::{Component, Path};

/// Extension of `path` including the leading dot, taken from the last `.` of the file name.
///
/// `.gitignore` has the extension `.gitignore`; `Makefile` and `name.` have none.
pub fn file_extension(path: &Path) -> String {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return String::new();
    };
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx..].to_string(),
        _ => String::new(),
    }
}

/// Why a file was left out of the merge. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    OutputFile,
    ExcludedFileName(String),
    ExcludedDirectory(String),
    ExcludedExtension(String),
    NotWhitelisted(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OutputFile => f.write_str("it is the output file"),
            SkipReason::ExcludedFileName(_) => f.write_str("of the 'excludeFileNames' rule"),
            SkipReason::ExcludedDirectory(segment) => {
                write!(f, "it is in an excluded directory ('{}')", segment)
            }
            SkipReason::ExcludedExtension(ext) => {
                write!(f, "of the 'excludeExtensions' rule for '{}'", ext)
            }
            SkipReason::NotWhitelisted(ext) => write!(
                f,
                "its extension ('{}') is not in 'includeExtensions' or 'pathOnlyExtensions'",
                ext
            ),
        }
    }
}

/// Decides whether a single file takes part in the merge.
pub struct FileFilter<'a> {
    options: &'a AppOptions,
    reporter: &'a dyn Reporter,
}

impl<'a> FileFilter<'a> {
    pub fn new(options: &'a AppOptions, reporter: &'a dyn Reporter) -> Self {
        Self { options, reporter }
    }

    pub fn should_skip(&self, file_path: &Path, source_root: &Path) -> bool {
        match self.skip_reason(file_path, source_root) {
            Some(reason) => {
                self.reporter.verbose(&format!(
                    "Skipping '{}' because {}.",
                    file_path.display(),
                    reason
                ));
                true
            }
            None => false,
        }
    }

    /// First matching exclusion rule for `file_path`, or `None` when it is eligible.
    pub fn skip_reason(&self, file_path: &Path, source_root: &Path) -> Option<SkipReason> {
        let options = self.options;

        if eq_ignore_case(
            &file_path.to_string_lossy(),
            &options.output_file_path.to_string_lossy(),
        ) {
            return Some(SkipReason::OutputFile);
        }

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if options.exclude_file_names.contains(&file_name) {
            return Some(SkipReason::ExcludedFileName(file_name));
        }

        if let Some(segment) = self.excluded_directory(file_path, source_root) {
            return Some(SkipReason::ExcludedDirectory(segment));
        }

        let extension = file_extension(file_path);
        if !options.exclude_extensions.is_empty() && options.exclude_extensions.contains(&extension)
        {
            return Some(SkipReason::ExcludedExtension(extension));
        }

        // Path-only extensions count as whitelisted too.
        if !options.include_extensions.is_empty()
            && !options.include_extensions.contains(&extension)
            && !options.path_only_extensions.contains(&extension)
        {
            return Some(SkipReason::NotWhitelisted(extension));
        }

        None
    }

    /// Directory segment between `source_root` and the file name that is excluded, if any.
    fn excluded_directory(&self, file_path: &Path, source_root: &Path) -> Option<String> {
        let relative = pathdiff::diff_paths(file_path, source_root)?;
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let (_, directories) = segments.split_last()?;
        directories
            .iter()
            .find(|segment| self.options.exclude_directory_names.contains(segment))
            .cloned()
    }
}

use crate::diagnostics::Reporter;
use crate::error::AppError;
use crate::filter::FileFilter;
use crate::options::AppOptions;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

type Prune<'a> = Box<dyn FnMut(&DirEntry) -> bool + 'a>;

/// Walks source directories and yields the files that pass the [`FileFilter`].
pub struct Scanner<'a> {
    options: &'a AppOptions,
    reporter: &'a dyn Reporter,
}

impl<'a> Scanner<'a> {
    pub fn new(options: &'a AppOptions, reporter: &'a dyn Reporter) -> Self {
        Self { options, reporter }
    }

    /// Lazily enumerates eligible files below `source_root`, depth-first in
    /// lexical order. Every call starts a fresh walk.
    pub fn eligible_files(&self, source_root: &Path) -> EligibleFiles<'a> {
        log::debug!("Scanning source directory: {}", source_root.display());
        let options = self.options;
        let reporter = self.reporter;
        // Excluded directories are pruned, never descended.
        let prune: Prune<'a> = Box::new(move |entry: &DirEntry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            if options.exclude_directory_names.contains(name.as_ref()) {
                reporter.verbose(&format!(
                    "Skipping directory '{}' because '{}' is in 'excludeDirectoryNames'.",
                    entry.path().display(),
                    name
                ));
                return false;
            }
            true
        });
        let walker = WalkDir::new(source_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(prune);
        EligibleFiles {
            walker,
            source_root: source_root.to_path_buf(),
            filter: FileFilter::new(self.options, self.reporter),
            reporter: self.reporter,
            finished: false,
        }
    }
}

pub struct EligibleFiles<'a> {
    walker: walkdir::FilterEntry<walkdir::IntoIter, Prune<'a>>,
    source_root: PathBuf,
    filter: FileFilter<'a>,
    reporter: &'a dyn Reporter,
    finished: bool,
}

impl EligibleFiles<'_> {
    fn report_walk_error(&mut self, err: walkdir::Error) {
        let at_root = err.depth() == 0;
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.source_root.clone());
        let error = AppError::DirectoryAccess {
            path,
            source: err.into(),
        };

        if at_root {
            self.reporter
                .warning(&format!("{} Skipping this source directory.", error));
            self.finished = true;
        } else {
            self.reporter.warning(&error.to_string());
        }
    }
}

impl Iterator for EligibleFiles<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while !self.finished {
            let entry = match self.walker.next() {
                Some(Ok(entry)) => entry,
                Some(Err(err)) => {
                    self.report_walk_error(err);
                    continue;
                }
                None => {
                    self.finished = true;
                    break;
                }
            };

            // Symlinked files are kept; symlinked directories are not descended.
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }

            let path = entry.into_path();
            if self.filter.should_skip(&path, &self.source_root) {
                continue;
            }
            log::trace!("Eligible file: {}", path.display());
            return Some(path);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemoryReporter, Severity};
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, "x").expect("write");
    }

    fn names(root: &Path, files: impl Iterator<Item = PathBuf>) -> Vec<String> {
        files
            .map(|p| {
                p.strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn walks_depth_first_in_lexical_order() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        for file in ["b.txt", "a/z.txt", "a/m/n.txt", "c.txt"] {
            touch(root, file);
        }
        let options = AppOptions::new(root.join("out.md"), vec![root.to_path_buf()]);
        let reporter = MemoryReporter::new();
        let scanner = Scanner::new(&options, &reporter);

        let found = names(root, scanner.eligible_files(root));

        assert_eq!(found, vec!["a/m/n.txt", "a/z.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn filter_is_applied_while_walking() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        for file in ["src/main.rs", "target/debug/app", "notes.log", "out.md"] {
            touch(root, file);
        }
        let mut options = AppOptions::new(root.join("out.md"), vec![root.to_path_buf()]);
        options.exclude_directory_names.insert("target");
        options.exclude_extensions.insert(".log");
        let reporter = MemoryReporter::new();
        let scanner = Scanner::new(&options, &reporter);

        let found = names(root, scanner.eligible_files(root));

        assert_eq!(found, vec!["src/main.rs"]);
        assert_eq!(reporter.messages(Severity::Verbose).len(), 3);
    }

    #[test]
    fn excluded_directories_are_pruned_not_walked() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        touch(root, "index.js");
        for i in 0..20 {
            touch(root, &format!("node_modules/pkg{}/index.js", i));
        }
        let mut options = AppOptions::new(root.join("out.md"), vec![root.to_path_buf()]);
        options.exclude_directory_names.insert("NODE_MODULES");
        let reporter = MemoryReporter::new();
        let scanner = Scanner::new(&options, &reporter);

        let found = names(root, scanner.eligible_files(root));

        assert_eq!(found, vec!["index.js"]);
        let verbose = reporter.messages(Severity::Verbose);
        assert_eq!(verbose.len(), 1);
        assert!(verbose[0].contains("node_modules"));
    }

    #[test]
    fn source_root_is_never_pruned() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path().join("build");
        touch(&root, "main.c");
        let mut options = AppOptions::new(tmp.path().join("out.md"), vec![root.clone()]);
        options.exclude_directory_names.insert("build");
        let reporter = MemoryReporter::new();
        let scanner = Scanner::new(&options, &reporter);

        assert_eq!(names(&root, scanner.eligible_files(&root)), vec!["main.c"]);
    }

    #[test]
    fn enumeration_is_lazy_and_restartable() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path();
        for file in ["a.txt", "b.txt", "c.txt"] {
            touch(root, file);
        }
        let options = AppOptions::new(root.join("out.md"), vec![root.to_path_buf()]);
        let reporter = MemoryReporter::new();
        let scanner = Scanner::new(&options, &reporter);

        let first = scanner.eligible_files(root).next();
        let all: Vec<_> = scanner.eligible_files(root).collect();

        assert_eq!(first, Some(root.join("a.txt")));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn missing_root_yields_nothing_and_warns() {
        let tmp = TempDir::new().expect("tmp");
        let missing = tmp.path().join("gone");
        let options = AppOptions::new(tmp.path().join("out.md"), vec![missing.clone()]);
        let reporter = MemoryReporter::new();
        let scanner = Scanner::new(&options, &reporter);

        assert_eq!(scanner.eligible_files(&missing).count(), 0);
        assert!(reporter.contains(Severity::Warning, "Could not access directory"));
    }
}

pub mod assets;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod merger;
pub mod options;
pub mod paths;
pub mod presets;
pub mod render;
pub mod scanner;

pub use config::{
    ConfigSource, DEFAULT_CONFIG_FILENAME, MERGE_RULES, MergeStrategy, OverrideSet, build_options,
};
pub use diagnostics::{LogReporter, MemoryReporter, Reporter, Severity};
pub use error::{AppError, Result, ValidationIssue};
pub use filter::{FileFilter, SkipReason, file_extension};
pub use merger::{DirectoryMerger, MergeSummary};
pub use options::{AppOptions, NameSet, OptionField};
pub use presets::{PresetEntry, PresetOrigin, PresetStore};
pub use render::{MarkdownWriter, language_for};
pub use scanner::{EligibleFiles, Scanner};

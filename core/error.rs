use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// A single problem found while validating merged options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingOutputPath,
    MissingSourceDirectories,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingOutputPath => f.write_str(
                "Missing output file path. Please specify it as an argument or in your config file.",
            ),
            ValidationIssue::MissingSourceDirectories => f.write_str(
                "Missing source directories. Please provide at least one source directory as an argument or in your config file.",
            ),
        }
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    ConfigLoad(String),

    #[error("Validation Error: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("Output directory not found: '{}'. Please ensure the directory exists.", .0.display())]
    PathResolution(PathBuf),

    #[error("No valid source directories were provided or found.")]
    NoValidSourceDirectories,

    #[error("Could not access directory '{path}'. Error: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not process file '{path}'. Error: {source}")]
    EntryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open output file '{path}'. Error: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not finish writing output file '{path}'. Error: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Embedded Resource Error: {0}")]
    Asset(String),

    #[error("Preset Error: {0}")]
    Preset(String),

    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<serde_yml::Error> for AppError {
    fn from(err: serde_yml::Error) -> Self {
        AppError::ConfigLoad(format!("The configuration file is malformed. {}", err))
    }
}

impl From<std::str::Utf8Error> for AppError {
    fn from(err: std::str::Utf8Error) -> Self {
        AppError::Asset(format!("UTF-8 decoding error: {}", err))
    }
}

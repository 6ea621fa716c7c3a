use crate::assets;
use crate::diagnostics::Reporter;
use crate::error::{AppError, Result, ValidationIssue};
use crate::options::{AppOptions, FieldSlot, OptionField};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "coalesce.yaml";

/// Where the base options of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    BuiltinDefault,
}

impl ConfigSource {
    /// Picks the config file for a run.
    ///
    /// An explicit file wins; if it does not exist the built-in defaults are
    /// used instead. Without an explicit file, `coalesce.yaml` in
    /// `working_dir` is used when present.
    pub fn resolve(
        explicit: Option<&Path>,
        working_dir: &Path,
        reporter: &dyn Reporter,
    ) -> ConfigSource {
        if let Some(path) = explicit {
            let full_path = working_dir.join(path);
            if !full_path.is_file() {
                reporter.warning(&format!(
                    "Configuration file specified via --config not found: {}",
                    full_path.display()
                ));
                return ConfigSource::BuiltinDefault;
            }
            return ConfigSource::File(full_path);
        }

        let default_path = working_dir.join(DEFAULT_CONFIG_FILENAME);
        if default_path.is_file() {
            return ConfigSource::File(default_path);
        }

        reporter.verbose(&format!(
            "No '{}' found. Using built-in default configuration.",
            DEFAULT_CONFIG_FILENAME
        ));
        ConfigSource::BuiltinDefault
    }

    pub fn load(&self, reporter: &dyn Reporter) -> Result<AppOptions> {
        match self {
            ConfigSource::File(path) => {
                reporter.info(&format!("Loading configuration from: {}", path.display()));
                load_from_path(path)
            }
            ConfigSource::BuiltinDefault => {
                let content = assets::default_config().map_err(|e| {
                    AppError::ConfigLoad(format!(
                        "FATAL: Could not load the built-in default configuration. {}",
                        e
                    ))
                })?;
                parse_options(&content)
            }
        }
    }
}

pub fn load_from_path(config_path: &Path) -> Result<AppOptions> {
    log::debug!("Reading configuration file: {}", config_path.display());
    let yaml_content = fs::read_to_string(config_path).map_err(|e| {
        AppError::ConfigLoad(format!(
            "Error loading config file '{}': {}",
            config_path.display(),
            e
        ))
    })?;
    parse_options(&yaml_content).map_err(|e| match e {
        AppError::ConfigLoad(msg) => AppError::ConfigLoad(format!(
            "Error parsing config file '{}': {}",
            config_path.display(),
            msg
        )),
        other => other,
    })
}

/// Parses YAML options. Empty or comment-only input yields all-empty options.
pub fn parse_options(yaml_content: &str) -> Result<AppOptions> {
    if yaml_content.trim().is_empty() {
        return Ok(AppOptions::default());
    }
    let value: serde_yml::Value = serde_yml::from_str(yaml_content)?;
    if value.is_null() {
        return Ok(AppOptions::default());
    }
    Ok(serde_yml::from_value(value)?)
}

/// Values supplied on top of the base configuration, usually from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    pub output_file_path: Option<String>,
    pub source_directory_paths: Vec<String>,
    pub exclude_directory_names: Vec<String>,
    pub exclude_file_names: Vec<String>,
    pub include_extensions: Vec<String>,
    pub exclude_extensions: Vec<String>,
    pub path_only_extensions: Vec<String>,
}

impl OverrideSet {
    fn values(&self, field: OptionField) -> &[String] {
        match field {
            OptionField::OutputFilePath => self.output_file_path.as_slice(),
            OptionField::SourceDirectoryPaths => &self.source_directory_paths,
            OptionField::ExcludeDirectoryNames => &self.exclude_directory_names,
            OptionField::ExcludeFileNames => &self.exclude_file_names,
            OptionField::IncludeExtensions => &self.include_extensions,
            OptionField::ExcludeExtensions => &self.exclude_extensions,
            OptionField::PathOnlyExtensions => &self.path_only_extensions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    Replace,
    Add,
}

/// How an override combines with the base value of each field.
pub const MERGE_RULES: [(OptionField, MergeStrategy); 7] = [
    (OptionField::OutputFilePath, MergeStrategy::Replace),
    (OptionField::SourceDirectoryPaths, MergeStrategy::Replace),
    (OptionField::ExcludeDirectoryNames, MergeStrategy::Add),
    (OptionField::ExcludeFileNames, MergeStrategy::Add),
    (OptionField::IncludeExtensions, MergeStrategy::Replace),
    (OptionField::ExcludeExtensions, MergeStrategy::Add),
    (OptionField::PathOnlyExtensions, MergeStrategy::Add),
];

pub fn merge_strategy(field: OptionField) -> MergeStrategy {
    MERGE_RULES
        .iter()
        .find(|(f, _)| *f == field)
        .map_or(MergeStrategy::Replace, |(_, strategy)| *strategy)
}

/// Applies every non-empty override to `options` according to [`MERGE_RULES`].
pub fn apply_overrides(options: &mut AppOptions, overrides: &OverrideSet, reporter: &dyn Reporter) {
    for (field, strategy) in MERGE_RULES {
        let values = overrides.values(field);
        if values.is_empty() || values.iter().all(String::is_empty) {
            continue;
        }

        match strategy {
            MergeStrategy::Replace => reporter.verbose(&format!(
                "Overriding '{}' with CLI arguments.",
                field.key()
            )),
            MergeStrategy::Add => reporter.verbose(&format!(
                "Adding to '{}' from CLI arguments.",
                field.key()
            )),
        }

        match (options.slot_mut(field), strategy) {
            (FieldSlot::Path(path), _) => {
                if let Some(last) = values.iter().rev().find(|v| !v.is_empty()) {
                    *path = PathBuf::from(last);
                }
            }
            (FieldSlot::Paths(paths), MergeStrategy::Replace) => {
                *paths = values.iter().map(PathBuf::from).collect();
            }
            (FieldSlot::Paths(paths), MergeStrategy::Add) => {
                for value in values {
                    let path = PathBuf::from(value);
                    if !paths.contains(&path) {
                        paths.push(path);
                    }
                }
            }
            (FieldSlot::Names(names), MergeStrategy::Replace) => names.replace(values.iter().cloned()),
            (FieldSlot::Names(names), MergeStrategy::Add) => names.extend(values.iter().cloned()),
        }
    }
}

pub fn validate(options: &AppOptions) -> Result<()> {
    let mut issues = Vec::new();
    if options.output_file_path.as_os_str().is_empty() {
        issues.push(ValidationIssue::MissingOutputPath);
    }
    if options.source_directory_paths.is_empty() {
        issues.push(ValidationIssue::MissingSourceDirectories);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(issues))
    }
}

/// Loads the base options, layers the overrides on top and validates the result.
pub fn build_options(
    source: &ConfigSource,
    overrides: &OverrideSet,
    reporter: &dyn Reporter,
) -> Result<AppOptions> {
    let mut options = source.load(reporter)?;
    apply_overrides(&mut options, overrides, reporter);
    validate(&options)?;

    if log::log_enabled!(log::Level::Debug) {
        match serde_yml::to_string(&options) {
            Ok(yaml) => log::debug!("Effective configuration:\n{}", yaml),
            Err(e) => log::debug!("Could not render effective configuration: {}", e),
        }
    }
    Ok(options)
}

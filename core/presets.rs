use crate::assets;
use crate::diagnostics::Reporter;
use crate::error::{AppError, Result};
use crate::options::eq_ignore_case;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const PRESETS_README_FILENAME: &str = "_readme.md";
pub const PRESETS_TEMPLATE_FILENAME: &str = "_template.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOrigin {
    BuiltIn,
    Custom,
    CustomOverridesBuiltIn,
}

impl fmt::Display for PresetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetOrigin::BuiltIn => f.write_str("built-in"),
            PresetOrigin::Custom => f.write_str("custom"),
            PresetOrigin::CustomOverridesBuiltIn => f.write_str("custom, overrides built-in"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetEntry {
    pub name: String,
    pub origin: PresetOrigin,
}

/// User presets live as `<name>.yaml` files in one directory; built-in presets are embedded.
#[derive(Debug, Clone)]
pub struct PresetStore {
    dir: Option<PathBuf>,
}

impl PresetStore {
    /// The per-user presets directory under the platform config directory.
    pub fn user_default() -> Self {
        Self {
            dir: dirs::config_dir().map(|d| d.join("coalesce").join("presets")),
        }
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Creates the presets directory and seeds the readme and template when missing.
    /// Failures are reported, never fatal.
    pub fn ensure_directory(&self, reporter: &dyn Reporter) {
        let Some(dir) = self.dir() else {
            reporter.warning(
                "Could not determine the presets directory. Custom presets will be unavailable.",
            );
            return;
        };

        if let Err(e) = seed_directory(dir, reporter) {
            reporter.warning(&format!(
                "Could not create or write to the presets directory '{}': {}",
                dir.display(),
                e
            ));
        }
    }

    pub fn list(&self, reporter: &dyn Reporter) -> Vec<PresetEntry> {
        let custom = self.custom_preset_names(reporter);
        let builtin = assets::builtin_preset_names();

        let mut names: Vec<String> = custom.clone();
        for name in &builtin {
            if !names.iter().any(|n| eq_ignore_case(n, name)) {
                names.push(name.clone());
            }
        }
        names.sort_by_key(|n| n.to_lowercase());

        names
            .into_iter()
            .map(|name| {
                let is_custom = custom.iter().any(|n| eq_ignore_case(n, &name));
                let is_builtin = builtin.iter().any(|n| eq_ignore_case(n, &name));
                let origin = match (is_custom, is_builtin) {
                    (true, true) => PresetOrigin::CustomOverridesBuiltIn,
                    (true, false) => PresetOrigin::Custom,
                    _ => PresetOrigin::BuiltIn,
                };
                PresetEntry { name, origin }
            })
            .collect()
    }

    /// Returns the YAML of preset `name`, preferring a user preset over a built-in one.
    pub fn content(&self, name: &str, reporter: &dyn Reporter) -> Result<String> {
        if let Some(dir) = self.dir() {
            let user_path = dir.join(format!("{}.yaml", name));
            if user_path.is_file() {
                reporter.verbose(&format!(
                    "Loading user-defined preset from: {}",
                    user_path.display()
                ));
                match fs::read_to_string(&user_path) {
                    Ok(content) => return Ok(content),
                    Err(e) => reporter.warning(&format!(
                        "Could not read user preset file '{}': {}",
                        user_path.display(),
                        e
                    )),
                }
            }
        }

        let is_builtin = assets::builtin_preset_names()
            .iter()
            .any(|n| eq_ignore_case(n, name));
        if !is_builtin {
            return Err(AppError::Preset(format!("Preset '{}' not found.", name)));
        }

        reporter.verbose(&format!("Loading built-in preset: {}", name));
        assets::builtin_preset(name)
            .map_err(|e| AppError::Preset(format!("Could not load built-in preset '{}': {}", name, e)))
    }

    fn custom_preset_names(&self, reporter: &dyn Reporter) -> Vec<String> {
        let Some(dir) = self.dir().filter(|d| d.is_dir()) else {
            return Vec::new();
        };

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                reporter.warning(&format!(
                    "Could not read custom presets from '{}': {}",
                    dir.display(),
                    e
                ));
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "yaml"))
            .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .filter(|name| !name.starts_with('_'))
            .collect()
    }
}

fn seed_directory(dir: &Path, reporter: &dyn Reporter) -> Result<()> {
    if !dir.is_dir() {
        fs::create_dir_all(dir)?;
        reporter.verbose(&format!("Created presets directory: {}", dir.display()));
    }

    let seeds = [
        (PRESETS_README_FILENAME, assets::PRESETS_README_ASSET),
        (PRESETS_TEMPLATE_FILENAME, assets::DEFAULT_CONFIG_ASSET),
    ];
    for (file_name, asset) in seeds {
        let path = dir.join(file_name);
        if !path.exists() {
            let content = assets::get_embedded_text(asset)?;
            fs::write(&path, content).map_err(|source| AppError::FileWrite { path, source })?;
        }
    }
    Ok(())
}

use crate::error::{AppError, Result};
use rust_embed::RustEmbed;

pub const DEFAULT_CONFIG_ASSET: &str = "default_config.yaml";
pub const PRESETS_README_ASSET: &str = "presets/_readme.md";
pub const UNIX_RUN_SCRIPT_ASSET: &str = "scripts/coalesce-run.sh";
pub const WINDOWS_RUN_SCRIPT_ASSET: &str = "scripts/coalesce-run.bat";

#[derive(RustEmbed)]
#[folder = "../data/"]
struct DataAssets;

pub fn get_embedded_text(asset_path: &str) -> Result<String> {
    log::trace!("Attempting to get embedded asset: {}", asset_path);
    let asset = DataAssets::get(asset_path).ok_or_else(|| {
        AppError::Asset(format!("Could not find embedded resource '{}'.", asset_path))
    })?;
    let content = std::str::from_utf8(asset.data.as_ref())?;
    Ok(content.to_string())
}

pub fn default_config() -> Result<String> {
    get_embedded_text(DEFAULT_CONFIG_ASSET)
}

pub fn builtin_preset(name: &str) -> Result<String> {
    get_embedded_text(&format!("presets/{}.yaml", name.to_lowercase()))
}

/// Names of the presets shipped inside the binary.
pub fn builtin_preset_names() -> Vec<String> {
    let mut names: Vec<String> = DataAssets::iter()
        .filter_map(|path| {
            let name = path.strip_prefix("presets/")?.strip_suffix(".yaml")?;
            (!name.starts_with('_') && !name.contains('/')).then(|| name.to_string())
        })
        .collect();
    names.sort();
    names
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ordinal, case-insensitive string equality. No locale-specific folding.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Insertion-ordered set of names compared without regard to case.
///
/// Used for extensions, directory names and file names. The first spelling
/// added wins; later spellings that differ only in case are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameSet {
    names: Vec<String>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| eq_ignore_case(n, name))
    }

    /// Adds `name` unless an equal name is already present. Returns whether it was added.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.insert(name);
        }
    }

    pub fn replace<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.clear();
        self.extend(names);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = NameSet::new();
        set.extend(iter);
        set
    }
}

impl<'de> Deserialize<'de> for NameSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let names = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(names.unwrap_or_default().into_iter().collect())
    }
}

/// Every option a merge can be configured with, named as in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    OutputFilePath,
    SourceDirectoryPaths,
    ExcludeDirectoryNames,
    ExcludeFileNames,
    IncludeExtensions,
    ExcludeExtensions,
    PathOnlyExtensions,
}

impl OptionField {
    pub fn key(self) -> &'static str {
        match self {
            OptionField::OutputFilePath => "outputFilePath",
            OptionField::SourceDirectoryPaths => "sourceDirectoryPaths",
            OptionField::ExcludeDirectoryNames => "excludeDirectoryNames",
            OptionField::ExcludeFileNames => "excludeFileNames",
            OptionField::IncludeExtensions => "includeExtensions",
            OptionField::ExcludeExtensions => "excludeExtensions",
            OptionField::PathOnlyExtensions => "pathOnlyExtensions",
        }
    }
}

/// Mutable view of one field, used by the table-driven override merge.
pub(crate) enum FieldSlot<'a> {
    Path(&'a mut PathBuf),
    Paths(&'a mut Vec<PathBuf>),
    Names(&'a mut NameSet),
}

/// Settled configuration for a merge run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppOptions {
    #[serde(deserialize_with = "null_as_default")]
    pub output_file_path: PathBuf,
    #[serde(deserialize_with = "null_as_default")]
    pub source_directory_paths: Vec<PathBuf>,
    #[serde(skip)]
    valid_source_directory_paths: Vec<PathBuf>,
    pub include_extensions: NameSet,
    pub exclude_extensions: NameSet,
    pub exclude_directory_names: NameSet,
    pub exclude_file_names: NameSet,
    pub path_only_extensions: NameSet,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl AppOptions {
    pub fn new(output_file_path: impl Into<PathBuf>, source_directory_paths: Vec<PathBuf>) -> Self {
        Self {
            output_file_path: output_file_path.into(),
            source_directory_paths,
            ..Self::default()
        }
    }

    /// Source directories confirmed to exist, in configured order. Empty until paths are resolved.
    pub fn valid_source_directory_paths(&self) -> &[PathBuf] {
        &self.valid_source_directory_paths
    }

    pub(crate) fn set_valid_source_directory_paths(&mut self, paths: Vec<PathBuf>) {
        self.valid_source_directory_paths = paths;
    }

    pub fn is_path_only(&self, extension: &str) -> bool {
        self.path_only_extensions.contains(extension)
    }

    pub fn output_file_path(&self) -> &Path {
        &self.output_file_path
    }

    pub(crate) fn slot_mut(&mut self, field: OptionField) -> FieldSlot<'_> {
        match field {
            OptionField::OutputFilePath => FieldSlot::Path(&mut self.output_file_path),
            OptionField::SourceDirectoryPaths => FieldSlot::Paths(&mut self.source_directory_paths),
            OptionField::ExcludeDirectoryNames => FieldSlot::Names(&mut self.exclude_directory_names),
            OptionField::ExcludeFileNames => FieldSlot::Names(&mut self.exclude_file_names),
            OptionField::IncludeExtensions => FieldSlot::Names(&mut self.include_extensions),
            OptionField::ExcludeExtensions => FieldSlot::Names(&mut self.exclude_extensions),
            OptionField::PathOnlyExtensions => FieldSlot::Names(&mut self.path_only_extensions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_set_ignores_case_duplicates() {
        let mut set = NameSet::new();
        assert!(set.insert(".CS"));
        assert!(!set.insert(".cs"));
        assert!(set.insert(".txt"));
        assert_eq!(set.len(), 2);
        assert!(set.contains(".Cs"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![".CS", ".txt"]);
    }

    #[test]
    fn name_set_replace_drops_previous_names() {
        let mut set: NameSet = [".yaml", ".json"].into_iter().collect();
        set.replace([".md"]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![".md"]);
    }

    #[test]
    fn eq_ignore_case_handles_non_ascii() {
        assert!(eq_ignore_case("ÄBC", "äbc"));
        assert!(!eq_ignore_case("abc", "abd"));
        assert!(!eq_ignore_case("ab", "abc"));
    }

    #[test]
    fn null_and_missing_keys_deserialize_as_empty() {
        let options: AppOptions =
            serde_yml::from_str("outputFilePath: out.md\nincludeExtensions:\nunknownKey: 3\n")
                .unwrap();
        assert_eq!(options.output_file_path, PathBuf::from("out.md"));
        assert!(options.include_extensions.is_empty());
        assert!(options.source_directory_paths.is_empty());
        assert!(options.valid_source_directory_paths().is_empty());
    }
}

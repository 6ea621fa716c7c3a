use clap::{Args, Parser, Subcommand};
use coalesce_core::OverrideSet;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "coalesce",
    author,
    version,
    about = "Merge the files of one or more source directories into a single Markdown document.",
    long_about = "coalesce walks the given source directories, filters files by name, directory and \nextension, and writes every eligible file as a fenced code block into one Markdown file. \nSettings come from 'coalesce.yaml' (or --config) and can be overridden on the command line.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  coalesce merged.md ./src ./docs\n  coalesce out.md . --include-ext .rs .toml --exclude-dir target\n  coalesce --dry-run\n  coalesce init --preset node",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub merge: MergeArgs,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Show why files are skipped and how configuration is applied (-vv, -vvv for internal logs).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Suppress informational output. Warnings and errors are still shown."
    )]
    pub quiet: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct MergeArgs {
    #[arg(
        value_name = "OUTPUT_FILE",
        help = "Path for the merged output file. Required if not in config."
    )]
    pub output_file: Option<String>,

    #[arg(
        value_name = "SOURCE_DIRS",
        help = "Source directories to scan. Required if not in config."
    )]
    pub source_dirs: Vec<String>,

    #[arg(
        long,
        num_args = 1..,
        value_name = "NAME",
        help = "Exclude a directory by name (e.g. 'node_modules'). Adds to the config list.",
        help_heading = "Filters"
    )]
    pub exclude_dir: Vec<String>,

    #[arg(
        long,
        num_args = 1..,
        value_name = "NAME",
        help = "Exclude a file by name (e.g. 'package-lock.json'). Adds to the config list.",
        help_heading = "Filters"
    )]
    pub exclude_file: Vec<String>,

    #[arg(
        long,
        num_args = 1..,
        value_name = "EXT",
        help = "Include only these extensions (e.g. '.md'). Replaces the config list.",
        help_heading = "Filters"
    )]
    pub include_ext: Vec<String>,

    #[arg(
        long,
        num_args = 1..,
        value_name = "EXT",
        help = "Exclude an extension (e.g. '.log'). Adds to the config list.",
        help_heading = "Filters"
    )]
    pub exclude_ext: Vec<String>,

    #[arg(
        long,
        num_args = 1..,
        value_name = "EXT",
        help = "List files with this extension by path only, without content (e.g. '.png'). Adds to the config list.",
        help_heading = "Filters"
    )]
    pub path_only_ext: Vec<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "YAML configuration file (default: 'coalesce.yaml' in the current directory, if present)."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Print which files would be merged without writing the output file."
    )]
    pub dry_run: bool,
}

impl MergeArgs {
    pub fn overrides(&self) -> OverrideSet {
        OverrideSet {
            output_file_path: self.output_file.clone(),
            source_directory_paths: self.source_dirs.clone(),
            exclude_directory_names: self.exclude_dir.clone(),
            exclude_file_names: self.exclude_file.clone(),
            include_extensions: self.include_ext.clone(),
            exclude_extensions: self.exclude_ext.clone(),
            path_only_extensions: self.path_only_ext.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Create 'coalesce.yaml' and a run script in the current directory.")]
    Init(InitArgs),

    #[command(about = "Manage configuration presets.")]
    Preset {
        #[command(subcommand)]
        action: PresetCommand,
    },

    #[command(about = "Show how to add the coalesce executable to your PATH.")]
    InstallPath,

    #[command(about = "Show how to remove the coalesce executable from your PATH.")]
    UninstallPath,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    #[arg(
        long,
        value_name = "NAME",
        help = "Start from a built-in or custom preset instead of the default configuration."
    )]
    pub preset: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PresetCommand {
    #[command(about = "List built-in and custom presets.")]
    List,

    #[command(about = "Print the custom presets directory.")]
    Path,
}

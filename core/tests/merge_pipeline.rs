use coalesce_core::{
    AppError, AppOptions, ConfigSource, DirectoryMerger, LogReporter, MemoryReporter, OverrideSet,
    Severity, build_options,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, content).expect("write");
}

fn sample_tree(tmp: &TempDir) -> PathBuf {
    let src = tmp.path().join("src");
    write_file(&src.join("file1.cs"), "public class Test {}");
    write_file(&src.join("file2.txt"), "some text");
    src
}

fn section_count(document: &str) -> usize {
    document.lines().filter(|l| l.starts_with("### ")).count()
}

#[test]
fn merges_whitelisted_files_with_language_tags() {
    let tmp = TempDir::new().expect("tmp");
    let src = sample_tree(&tmp);
    let output = tmp.path().join("out.md");
    let mut options = AppOptions::new(&output, vec![src]);
    options.include_extensions.extend([".cs", ".txt"]);
    let reporter = MemoryReporter::new();

    let summary = DirectoryMerger::new(options, false, &reporter)
        .with_display_root(tmp.path())
        .merge()
        .expect("merge");

    assert_eq!(summary.processed, 2);
    let document = fs::read_to_string(&output).expect("read output");
    assert_eq!(section_count(&document), 2);

    let cs = document.find("```csharp\npublic class Test {}\n```").expect("cs block");
    let txt = document.find("```text\nsome text\n```").expect("txt block");
    assert!(cs < txt);
    assert_eq!(document.matches("\n---\n").count(), 2);
}

#[test]
fn dry_run_counts_without_creating_output() {
    let tmp = TempDir::new().expect("tmp");
    let src = sample_tree(&tmp);
    let output = tmp.path().join("out.md");
    let reporter = MemoryReporter::new();

    let summary = DirectoryMerger::new(AppOptions::new(&output, vec![src]), true, &reporter)
        .merge()
        .expect("merge");

    assert_eq!(summary.processed, 2);
    assert!(!output.exists());
    let listed: Vec<_> = reporter
        .messages(Severity::Info)
        .into_iter()
        .filter(|m| m.starts_with("- "))
        .collect();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].ends_with("file1.cs"));
}

#[test]
fn output_inside_source_tree_is_never_merged() {
    let tmp = TempDir::new().expect("tmp");
    let src = sample_tree(&tmp);
    let output = src.join("merged.md");
    write_file(&output, "previous run");
    let reporter = MemoryReporter::new();

    let summary = DirectoryMerger::new(AppOptions::new(&output, vec![src]), false, &reporter)
        .merge()
        .expect("merge");

    assert_eq!(summary.processed, 2);
    let document = fs::read_to_string(&output).expect("read output");
    assert!(!document.contains("merged.md"));
    assert!(!document.contains("previous run"));
}

#[test]
fn excluded_directories_and_path_only_files() {
    let tmp = TempDir::new().expect("tmp");
    let src = tmp.path().join("src");
    write_file(&src.join("app.rs"), "fn main() {}\n");
    write_file(&src.join("assets").join("logo.png"), "\u{89}PNG");
    write_file(&src.join("target").join("debug").join("app.rs"), "compiled");
    let output = tmp.path().join("out.md");
    let mut options = AppOptions::new(&output, vec![src]);
    options.exclude_directory_names.insert("target");
    options.path_only_extensions.insert(".png");

    let summary = DirectoryMerger::new(options, false, &MemoryReporter::new())
        .with_display_root(tmp.path())
        .merge()
        .expect("merge");

    assert_eq!(summary.processed, 2);
    let document = fs::read_to_string(&output).expect("read output");
    assert!(document.contains("<!-- Content of binary file 'logo.png' not included. -->"));
    assert!(!document.contains("compiled"));
    assert!(!document.contains("PNG"));
}

#[test]
fn multiple_sources_are_processed_in_order() {
    let tmp = TempDir::new().expect("tmp");
    let first = tmp.path().join("b-first");
    let second = tmp.path().join("a-second");
    write_file(&first.join("one.md"), "# one");
    write_file(&second.join("two.md"), "# two");
    let output = tmp.path().join("out.md");
    let reporter = MemoryReporter::new();

    let summary = DirectoryMerger::new(AppOptions::new(&output, vec![first, second]), false, &reporter)
        .merge()
        .expect("merge");

    assert_eq!(summary.source_directories, 2);
    let document = fs::read_to_string(&output).expect("read output");
    let one = document.find("# one").expect("one");
    let two = document.find("# two").expect("two");
    assert!(one < two);
    assert!(reporter.contains(Severity::Success, "across 2 source directories"));
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_skipped_and_counted() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().expect("tmp");
    let src = sample_tree(&tmp);
    let locked = src.join("secret.txt");
    write_file(&locked, "hidden");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
    if fs::File::open(&locked).is_ok() {
        // Running with privileges that ignore file modes.
        return;
    }
    let output = tmp.path().join("out.md");
    let reporter = MemoryReporter::new();

    let summary = DirectoryMerger::new(AppOptions::new(&output, vec![src]), false, &reporter)
        .merge()
        .expect("merge");

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 1);
    assert!(reporter.contains(Severity::Warning, "Could not process file"));
    assert!(reporter.contains(Severity::Info, "Skipped 1 files"));
    let document = fs::read_to_string(&output).expect("read output");
    assert!(!document.contains("secret.txt"));
}

#[test]
fn config_file_and_overrides_feed_the_merge() {
    let tmp = TempDir::new().expect("tmp");
    let src = sample_tree(&tmp);
    let config = tmp.path().join("coalesce.yaml");
    write_file(
        &config,
        "outputFilePath: ignored.md\nexcludeExtensions:\n  - .txt\n",
    );
    let overrides = OverrideSet {
        output_file_path: Some(tmp.path().join("out.md").to_string_lossy().into_owned()),
        source_directory_paths: vec![src.to_string_lossy().into_owned()],
        ..OverrideSet::default()
    };
    let reporter = MemoryReporter::new();

    let source = ConfigSource::resolve(None, tmp.path(), &reporter);
    let options = build_options(&source, &overrides, &reporter).expect("options");
    let summary = DirectoryMerger::new(options, false, &reporter)
        .merge()
        .expect("merge");

    assert_eq!(source, ConfigSource::File(config));
    assert_eq!(summary.processed, 1);
    assert!(tmp.path().join("out.md").is_file());
    assert!(!tmp.path().join("ignored.md").exists());
}

#[test]
fn validation_failure_returns_no_options() {
    let tmp = TempDir::new().expect("tmp");
    let config = tmp.path().join("empty.yaml");
    write_file(&config, "");
    let reporter = MemoryReporter::new();

    let err = build_options(
        &ConfigSource::File(config),
        &OverrideSet::default(),
        &reporter,
    )
    .unwrap_err();

    match err {
        AppError::Validation(issues) => assert_eq!(issues.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn log_reporter_can_drive_a_merge() {
    let tmp = TempDir::new().expect("tmp");
    let src = sample_tree(&tmp);
    let output = tmp.path().join("out.md");

    let summary = DirectoryMerger::new(AppOptions::new(&output, vec![src]), false, &LogReporter)
        .merge()
        .expect("merge");

    assert_eq!(summary.processed, 2);
    assert!(output.is_file());
}

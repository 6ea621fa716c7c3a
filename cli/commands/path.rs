use anyhow::{Context, Result};
use coalesce_core::Reporter;
use std::path::PathBuf;

fn executable_location() -> Result<(PathBuf, String)> {
    let exe_path = std::env::current_exe().context("Could not determine the application's path.")?;
    let exe_name = exe_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "coalesce".to_string());
    Ok((exe_path, exe_name))
}

pub fn handle_install_path(reporter: &dyn Reporter) -> Result<()> {
    let (exe_path, exe_name) = executable_location()?;
    let app_dir = exe_path
        .parent()
        .context("Could not determine the application's path details.")?;

    reporter.info("coalesce does not modify your PATH itself.");
    reporter.info("Add the application directory to your PATH manually.");

    if cfg!(windows) {
        reporter.suggestion("\nRun in PowerShell:");
        reporter.info(&format!(
            "  [Environment]::SetEnvironmentVariable('PATH', \"$env:PATH;{}\", 'User')",
            app_dir.display()
        ));
    } else {
        reporter.suggestion("\nOption 1: Add to your shell profile (e.g. ~/.bashrc, ~/.zshrc)");
        reporter.info(&format!("  export PATH=\"$PATH:{}\"", app_dir.display()));
        reporter.suggestion("\nOption 2: Create a symbolic link to a directory in your PATH");
        reporter.info(&format!(
            "  sudo ln -s \"{}\" /usr/local/bin/{}",
            exe_path.display(),
            exe_name
        ));
    }
    reporter.info("\nAfter running one of the commands, restart your terminal.");
    Ok(())
}

pub fn handle_uninstall_path(reporter: &dyn Reporter) -> Result<()> {
    let exe_name = executable_location()
        .map(|(_, name)| name)
        .unwrap_or_else(|_| "coalesce".to_string());

    reporter.info("To uninstall, reverse the steps you took to install.");
    if cfg!(windows) {
        reporter.suggestion(
            "Remove the application directory from the user PATH in 'Edit environment variables for your account'.",
        );
    } else {
        reporter.suggestion("1. Remove the 'export PATH...' line from your shell profile.");
        reporter.suggestion(&format!(
            "2. Or, delete the symbolic link: sudo rm /usr/local/bin/{}",
            exe_name
        ));
    }
    Ok(())
}

use coalesce_core::{Reporter, Severity};
use colored::*;
use std::io::{self, IsTerminal};

/// Console behaviour fixed for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterSettings {
    pub quiet: bool,
    pub verbose: bool,
    pub color: bool,
}

impl ReporterSettings {
    pub fn from_flags(quiet: bool, verbosity: u8) -> Self {
        Self {
            quiet,
            verbose: verbosity > 0,
            color: io::stdout().is_terminal(),
        }
    }

    pub fn shows(&self, severity: Severity) -> bool {
        match severity {
            Severity::Error | Severity::Warning | Severity::Suggestion => true,
            Severity::Success | Severity::Info => !self.quiet,
            Severity::Verbose => self.verbose && !self.quiet,
        }
    }
}

/// Prints diagnostics to the terminal: errors to stderr, everything else to stdout.
pub struct ConsoleReporter {
    settings: ReporterSettings,
}

impl ConsoleReporter {
    pub fn new(settings: ReporterSettings) -> Self {
        colored::control::set_override(settings.color);
        let reporter = Self { settings };
        if settings.quiet && settings.verbose {
            reporter.warning("--quiet and --verbose were both given. --quiet takes precedence.");
        }
        reporter
    }

    fn render(severity: Severity, message: &str) -> String {
        match severity {
            Severity::Error => format!("{} {}", "ERROR:".red().bold(), message.red()),
            Severity::Warning => format!("{}", format!("WARNING: {}", message).yellow()),
            Severity::Success => format!("{}", message.green()),
            Severity::Info => message.to_string(),
            Severity::Verbose => format!("{}", message.dimmed()),
            Severity::Suggestion => format!("{}", message.cyan()),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, severity: Severity, message: &str) {
        if !self.settings.shows(severity) {
            return;
        }
        let line = Self::render(severity, message);
        if severity == Severity::Error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(quiet: bool, verbose: bool) -> ReporterSettings {
        ReporterSettings {
            quiet,
            verbose,
            color: false,
        }
    }

    #[test]
    fn quiet_hides_info_and_success_only() {
        let quiet = settings(true, false);
        assert!(!quiet.shows(Severity::Info));
        assert!(!quiet.shows(Severity::Success));
        assert!(quiet.shows(Severity::Warning));
        assert!(quiet.shows(Severity::Error));
        assert!(quiet.shows(Severity::Suggestion));
    }

    #[test]
    fn verbose_needs_flag_and_loses_to_quiet() {
        assert!(!settings(false, false).shows(Severity::Verbose));
        assert!(settings(false, true).shows(Severity::Verbose));
        assert!(!settings(true, true).shows(Severity::Verbose));
    }

    #[test]
    fn plain_rendering_keeps_prefixes() {
        colored::control::set_override(false);
        assert_eq!(
            ConsoleReporter::render(Severity::Error, "boom"),
            "ERROR: boom"
        );
        assert_eq!(
            ConsoleReporter::render(Severity::Warning, "careful"),
            "WARNING: careful"
        );
        assert_eq!(ConsoleReporter::render(Severity::Info, "plain"), "plain");
    }
}

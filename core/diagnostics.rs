//! Diagnostic sink used by every stage of a merge.
//!
//! Components never print directly. They classify each message with a
//! [`Severity`] and hand it to a [`Reporter`] they were given by reference;
//! formatting and suppression are entirely the reporter's business.

use std::cell::RefCell;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Success,
    Info,
    Verbose,
    Suggestion,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Verbose => "verbose",
            Severity::Suggestion => "suggestion",
        };
        f.write_str(name)
    }
}

pub trait Reporter {
    fn report(&self, severity: Severity, message: &str);

    fn error(&self, message: &str) {
        self.report(Severity::Error, message);
    }

    fn warning(&self, message: &str) {
        self.report(Severity::Warning, message);
    }

    fn success(&self, message: &str) {
        self.report(Severity::Success, message);
    }

    fn info(&self, message: &str) {
        self.report(Severity::Info, message);
    }

    fn verbose(&self, message: &str) {
        self.report(Severity::Verbose, message);
    }

    fn suggestion(&self, message: &str) {
        self.report(Severity::Suggestion, message);
    }
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Error => log::error!("{}", message),
            Severity::Warning => log::warn!("{}", message),
            Severity::Success | Severity::Info | Severity::Suggestion => log::info!("{}", message),
            Severity::Verbose => log::debug!("{}", message),
        }
    }
}

/// Keeps every message in memory, in emission order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: RefCell<Vec<(Severity, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|(s, m)| *s == severity && m.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, message: &str) {
        self.entries
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reporter_keeps_order_and_severity() {
        let reporter = MemoryReporter::new();
        reporter.info("first");
        reporter.warning("second");
        reporter.verbose("third");

        let entries = reporter.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (Severity::Info, "first".to_string()));
        assert_eq!(reporter.messages(Severity::Warning), vec!["second"]);
        assert!(reporter.contains(Severity::Verbose, "thi"));
        assert!(!reporter.contains(Severity::Error, "third"));
    }
}

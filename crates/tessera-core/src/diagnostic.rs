#![forbid(unsafe_code)]

//! Field-level validation diagnostics.
//!
//! A [`Diagnostic`] names the configuration field it concerns, a
//! human-readable message, and a [`Severity`]. Validators return lists of
//! diagnostics instead of failing: validation is total, and a consumer
//! decides how to present the results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a diagnostic is.
///
/// Ordered so that `Info < Warning < Error`; `max()` over a list yields the
/// worst finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One validation finding against a named field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The field the finding concerns (dotted path for nested structures).
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
    /// How serious the finding is.
    pub severity: Severity,
}

impl Diagnostic {
    /// Create a diagnostic with explicit severity.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
        }
    }

    /// Create an error-severity diagnostic.
    #[must_use]
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Error)
    }

    /// Create a warning-severity diagnostic.
    #[must_use]
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Warning)
    }

    /// Create an info-severity diagnostic.
    #[must_use]
    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, Severity::Info)
    }

    /// Whether this diagnostic is an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.field, self.message)
    }
}

/// The worst severity in a list, or `None` for an empty list.
#[must_use]
pub fn max_severity(diagnostics: &[Diagnostic]) -> Option<Severity> {
    diagnostics.iter().map(|d| d.severity).max()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn constructors_set_severity() {
        assert_eq!(Diagnostic::error("f", "m").severity, Severity::Error);
        assert_eq!(Diagnostic::warning("f", "m").severity, Severity::Warning);
        assert_eq!(Diagnostic::info("f", "m").severity, Severity::Info);
        assert!(Diagnostic::error("f", "m").is_error());
        assert!(!Diagnostic::warning("f", "m").is_error());
    }

    #[test]
    fn max_severity_picks_worst() {
        let diags = vec![
            Diagnostic::info("a", "x"),
            Diagnostic::error("b", "y"),
            Diagnostic::warning("c", "z"),
        ];
        assert_eq!(max_severity(&diags), Some(Severity::Error));
        assert_eq!(max_severity(&[]), None);
    }

    #[test]
    fn display_formats() {
        let d = Diagnostic::warning("columns", "no columns configured");
        assert_eq!(d.to_string(), "warning: columns: no columns configured");
    }

    #[test]
    fn serde_snake_case_severity() {
        let json = serde_json::to_string(&Severity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let d: Diagnostic =
            serde_json::from_str(r#"{"field":"entity_id","message":"m","severity":"error"}"#)
                .unwrap();
        assert_eq!(d.severity, Severity::Error);
    }
}

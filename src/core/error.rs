use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that prevent a document from being parsed.
///
/// No partial [`Document`](super::Document) is ever produced alongside one
/// of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Input is not well-formed XML (or not UTF-8).
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// A mandatory element is absent under both the qualified and the
    /// unqualified name.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Root element (or model discriminator) names no supported variant.
    #[error("unsupported document variant: {0}")]
    UnsupportedVariant(String),

    /// Element is present but its content cannot be interpreted.
    #[error("invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },
}

impl ParseError {
    /// Amounts in `field` are representable on their own but not once
    /// combined.
    pub(crate) fn overflow(field: &str) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: "arithmetic overflow".into(),
        }
    }
}

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural or identity-checksum failure.
    Error,
    /// Arithmetic or consistency mismatch.
    Warning,
    /// Missing but recommended data.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule code (e.g. "ID-03").
    pub code: String,
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Dot-separated path of the offending field (e.g. "issuer.identifier").
    pub field: Option<String>,
    /// How to fix it, when the rule knows.
    pub suggestion: Option<String>,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(
                f,
                "[{}] {} {}: {}",
                self.code, self.severity, field, self.message
            ),
            None => write!(f, "[{}] {} {}", self.code, self.severity, self.message),
        }
    }
}

impl Issue {
    pub fn new(code: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            field: None,
            suggestion: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Count issues of the given severity.
pub fn count_severity(issues: &[Issue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}

/// Whether any issue should block downstream processing.
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(Issue::is_error)
}

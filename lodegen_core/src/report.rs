//! Run reports: generated documents and recovered failures.

use crate::error::Error;
use crate::walk::Leaf;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Category of a recovered failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Resolution,
    Classification,
    ArchiveRead,
    Transform,
    Write,
    Config,
}

impl FailureKind {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Resolution => "resolution",
            FailureKind::Classification => "classification",
            FailureKind::ArchiveRead => "archive_read",
            FailureKind::Transform => "transform",
            FailureKind::Write => "write",
            FailureKind::Config => "config",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure tied to the address that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub address: String,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, address: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
            message: message.into(),
        }
    }
}

/// Collects failures during a run and logs each one as it arrives.
#[derive(Debug, Default)]
pub struct Failures {
    failures: Vec<Failure>,
}

impl Failures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn push(&mut self, failure: Failure) {
        warn!(
            kind = failure.kind.as_str(),
            address = %failure.address,
            "{}",
            failure.message
        );
        self.failures.push(failure);
    }

    /// Record an error raised while handling `address`.
    pub fn record(&mut self, address: &str, error: &Error) {
        self.push(Failure::new(error.kind(), address, error.to_string()));
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_vec(self) -> Vec<Failure> {
        self.failures
    }
}

/// A document written during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    /// Top-level input the document was found under.
    pub input: String,
    /// Address of the source document.
    pub source: String,
    /// Path of the written output.
    pub output: PathBuf,
}

impl Generated {
    pub fn new(leaf: &Leaf, output: PathBuf) -> Self {
        Self {
            input: leaf.input.clone(),
            source: leaf.locator.address(),
            output,
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub generated: Vec<Generated>,
    pub failures: Vec<Failure>,
}

impl Report {
    /// True when every resource was processed without failure.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_error_kind() {
        let mut failures = Failures::new();
        failures.record("bad.jar", &Error::archive_read("bad.jar", "not a zip"));
        failures.push(Failure::new(FailureKind::Resolution, "nope", "no locator found"));

        assert_eq!(failures.len(), 2);
        let failures = failures.into_vec();
        assert_eq!(failures[0].kind, FailureKind::ArchiveRead);
        assert_eq!(failures[0].address, "bad.jar");
        assert_eq!(failures[1].kind, FailureKind::Resolution);
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report {
            generated: vec![],
            failures: vec![Failure::new(FailureKind::ArchiveRead, "x.jar", "boom")],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failures"][0]["kind"], "archive_read");
        assert_eq!(json["failures"][0]["address"], "x.jar");
        assert!(!report.is_success());
    }
}

use agentlint_core::Severity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A violation instance normalized to a catalog code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedError {
    pub code: String,
    pub severity: Severity,
    pub path: String,
    pub message: String,
    pub remediation: String,
    pub docs: String,
    /// Raw source violation, kept for machine consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
}

/// Derived summary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
    pub total: usize,
}

/// Severity-partitioned validation report.
///
/// Entries are stored flat in arrival order; the partition, validity flag
/// and summary counts are derived on read so they can never drift from the
/// entries themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub entries: Vec<FormattedError>,
}

impl ErrorReport {
    pub fn new(entries: Vec<FormattedError>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: FormattedError) {
        self.entries.push(entry);
    }

    /// Append another report's entries.
    pub fn merge(&mut self, other: ErrorReport) {
        self.entries.extend(other.entries);
    }

    /// True when the report holds no error-level entries.
    pub fn valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &FormattedError> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &FormattedError> {
        self.by_severity(Severity::Warning)
    }

    pub fn info(&self) -> impl Iterator<Item = &FormattedError> {
        self.by_severity(Severity::Info)
    }

    fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &FormattedError> {
        self.entries
            .iter()
            .filter(move |entry| entry.severity == severity)
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for entry in &self.entries {
            match entry.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary.total = self.entries.len();
        summary
    }
}

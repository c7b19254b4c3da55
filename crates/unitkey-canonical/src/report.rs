use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of a canonicalization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    /// The record was already canonical.
    Ok,
    /// Duplicates were removed or elements reordered.
    Normalized,
    /// Elements sharing a key but differing elsewhere were retained.
    Ambiguous,
    /// The record was rejected.
    Invalid,
}

/// Stable warning code emitted by canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportWarning(String);

impl ReportWarning {
    /// Creates a warning from a literal code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the warning code.
    pub fn code(&self) -> &str {
        &self.0
    }
}

/// Report produced alongside a canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalizationReport {
    /// Overall status.
    pub status: ReportStatus,
    /// Stable warning codes, one per affected collection.
    pub warnings: Vec<ReportWarning>,
    /// Counters keyed `<collection>.<metric>`.
    pub metrics: BTreeMap<String, u64>,
}

impl CanonicalizationReport {
    pub(crate) fn new() -> Self {
        Self {
            status: ReportStatus::Ok,
            warnings: Vec::new(),
            metrics: BTreeMap::new(),
        }
    }

    /// Returns a counter, zero when never recorded.
    pub fn metric(&self, name: &str) -> u64 {
        self.metrics.get(name).copied().unwrap_or(0)
    }

    pub(crate) fn add_metric(&mut self, collection: &str, metric: &str, count: u64) {
        if count == 0 {
            return;
        }
        *self
            .metrics
            .entry(format!("{collection}.{metric}"))
            .or_insert(0) += count;
    }

    /// Raises the status; never lowers it.
    pub(crate) fn escalate(&mut self, status: ReportStatus) {
        if rank(status) > rank(self.status) {
            self.status = status;
        }
    }
}

fn rank(status: ReportStatus) -> u8 {
    match status {
        ReportStatus::Ok => 0,
        ReportStatus::Normalized => 1,
        ReportStatus::Ambiguous => 2,
        ReportStatus::Invalid => 3,
    }
}

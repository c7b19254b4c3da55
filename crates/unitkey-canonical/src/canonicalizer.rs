use std::fmt;

use tracing::debug;

use crate::record::{CompilationRecord, EnvironmentVariable, ExtensibleDetail, RequiredInput};
use crate::report::{CanonicalizationReport, ReportStatus, ReportWarning};

/// Order-insensitive collection of a compilation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `required_inputs`, keyed by descriptor digest.
    RequiredInputs,
    /// `source_files`, keyed by the path itself.
    SourceFiles,
    /// `environment`, keyed by variable name.
    Environment,
    /// `details`, keyed by type URL.
    Details,
}

impl Collection {
    /// Field name of the collection.
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::RequiredInputs => "required_inputs",
            Collection::SourceFiles => "source_files",
            Collection::Environment => "environment",
            Collection::Details => "details",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// Two non-identical elements share a canonical key.
    #[error("conflicting entries for key {key:?} in {collection}")]
    ConflictingKey {
        /// Collection holding the conflict.
        collection: Collection,
        /// Shared key.
        key: String,
    },
}

/// How elements that share a key but differ elsewhere are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    /// Keep every distinct element, ordered by full value within the key.
    #[default]
    Retain,
    /// Fail with [`CanonicalizationError::ConflictingKey`].
    Reject,
}

/// Result of canonicalization.
#[derive(Debug, Clone)]
pub struct CanonicalizationResult {
    /// The canonical record.
    pub record: CompilationRecord,
    /// What canonicalization changed or found.
    pub report: CanonicalizationReport,
}

/// Normalizes the order-insensitive collections of compilation records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer {
    policy: DuplicateKeyPolicy,
}

impl Canonicalizer {
    /// Creates a canonicalizer with the given conflict policy.
    pub fn new(policy: DuplicateKeyPolicy) -> Self {
        Self { policy }
    }

    /// Returns the configured conflict policy.
    pub fn policy(&self) -> DuplicateKeyPolicy {
        self.policy
    }

    /// Produces the canonical record + report.
    pub fn canonicalize(
        &self,
        record: &CompilationRecord,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        self.canonicalize_with_report(record).map_err(|(err, _)| err)
    }

    /// Produces the canonical record + report, returning the report even on error.
    pub fn canonicalize_with_report(
        &self,
        record: &CompilationRecord,
    ) -> Result<CanonicalizationResult, (CanonicalizationError, CanonicalizationReport)> {
        let mut report = CanonicalizationReport::new();
        let (canonical, conflict) = normalize_record(record, &mut report);

        if let (DuplicateKeyPolicy::Reject, Some(err)) = (self.policy, conflict) {
            report.escalate(ReportStatus::Invalid);
            return Err((err, report));
        }

        Ok(CanonicalizationResult {
            record: canonical,
            report,
        })
    }
}

/// Returns the canonical form of `record` under [`DuplicateKeyPolicy::Retain`].
///
/// Pure and idempotent: `canonicalize(&canonicalize(r)) == canonicalize(r)`.
/// `arguments` and scalar fields are copied unchanged.
pub fn canonicalize(record: &CompilationRecord) -> CompilationRecord {
    normalize_record(record, &mut CanonicalizationReport::new()).0
}

/// Normalizes every order-insensitive collection; also returns the first key conflict.
fn normalize_record(
    record: &CompilationRecord,
    report: &mut CanonicalizationReport,
) -> (CompilationRecord, Option<CanonicalizationError>) {
    let mut conflict = None;
    let canonical = CompilationRecord {
        identifier: record.identifier.clone(),
        required_inputs: normalize(
            Collection::RequiredInputs,
            &record.required_inputs,
            RequiredInput::key,
            report,
            &mut conflict,
        ),
        source_files: normalize(
            Collection::SourceFiles,
            &record.source_files,
            String::as_str,
            report,
            &mut conflict,
        ),
        arguments: record.arguments.clone(),
        output_key: record.output_key.clone(),
        working_directory: record.working_directory.clone(),
        entry_context: record.entry_context.clone(),
        environment: normalize(
            Collection::Environment,
            &record.environment,
            EnvironmentVariable::key,
            report,
            &mut conflict,
        ),
        details: normalize(
            Collection::Details,
            &record.details,
            ExtensibleDetail::key,
            report,
            &mut conflict,
        ),
    };
    (canonical, conflict)
}

/// Sorts by key (byte-wise, which is `str`'s `Ord`) then by full value, and drops
/// adjacent equal elements. Full-value tie-breaking keeps the result independent
/// of input order even when keys collide.
fn normalize<T, F>(
    collection: Collection,
    items: &[T],
    key: F,
    report: &mut CanonicalizationReport,
    conflict: &mut Option<CanonicalizationError>,
) -> Vec<T>
where
    T: Clone + Ord,
    F: Fn(&T) -> &str,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| key(a).cmp(key(b)).then_with(|| a.cmp(b)));
    sorted.dedup();

    if sorted.as_slice() != items {
        report.escalate(ReportStatus::Normalized);
    }

    let removed = (items.len() - sorted.len()) as u64;
    if removed > 0 {
        debug!(collection = %collection, removed, "removed duplicate elements");
        report.add_metric(collection.as_str(), "duplicates_removed", removed);
        report
            .warnings
            .push(ReportWarning::new(format!("DuplicateElements:{collection}")));
    }

    let shared: Vec<&str> = sorted
        .windows(2)
        .filter(|pair| key(&pair[0]) == key(&pair[1]))
        .map(|pair| key(&pair[0]))
        .collect();
    if let Some(first) = shared.first() {
        debug!(
            collection = %collection,
            conflicts = shared.len(),
            "elements share a key but differ"
        );
        report.add_metric(collection.as_str(), "conflicting_keys", shared.len() as u64);
        report
            .warnings
            .push(ReportWarning::new(format!("ConflictingKey:{collection}")));
        report.escalate(ReportStatus::Ambiguous);
        if conflict.is_none() {
            *conflict = Some(CanonicalizationError::ConflictingKey {
                collection,
                key: first.to_string(),
            });
        }
    }

    sorted
}

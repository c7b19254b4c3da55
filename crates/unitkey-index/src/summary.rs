use serde::{Deserialize, Serialize};
use tracing::{trace, warn};
use unitkey_canonical::{CompilationRecord, ExtensibleDetail};

use crate::details::{DecodedDetail, DetailRegistry};

/// Queryable projection of a compilation record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Language of the compilation's artifact.
    pub language: String,
    /// Output key of the compilation.
    pub output: String,
    /// Digests of the required inputs, in record order (not guaranteed).
    pub inputs: Vec<String>,
    /// Primary source paths, in record order.
    pub sources: Vec<String>,
    /// Build target from the build details, or empty.
    pub target: String,
}

impl Summary {
    /// Summarizes `record` using [`DetailRegistry::default`].
    pub fn from_record(record: &CompilationRecord) -> Self {
        summarize(record, &DetailRegistry::default())
    }

    /// Input digests sorted for deterministic comparison.
    pub fn sorted_inputs(&self) -> Vec<String> {
        let mut inputs = self.inputs.clone();
        inputs.sort();
        inputs
    }
}

/// Builds the [`Summary`] of `record`, decoding details through `registry`.
///
/// Never fails: unregistered detail types are skipped and undecodable ones are
/// logged and ignored.
pub fn summarize(record: &CompilationRecord, registry: &DetailRegistry) -> Summary {
    Summary {
        language: record.identifier.language.clone(),
        output: record.output_key.clone(),
        inputs: record
            .required_inputs
            .iter()
            .map(|input| input.descriptor.digest.clone())
            .collect(),
        sources: record.source_files.clone(),
        target: build_target(&record.details, registry).unwrap_or_default(),
    }
}

/// Target of the first build-details entry that decodes.
fn build_target(details: &[ExtensibleDetail], registry: &DetailRegistry) -> Option<String> {
    for detail in details {
        match registry.decode(detail) {
            None => trace!(type_url = %detail.type_url, "skipping unregistered detail"),
            Some(Err(err)) => warn!(error = %err, "ignoring undecodable detail"),
            Some(Ok(DecodedDetail::BuildDetails(build))) => return Some(build.build_target),
        }
    }
    None
}

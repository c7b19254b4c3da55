//! Compilation record model, canonicalization and fingerprint preimages.
//!
//! A [`CompilationRecord`] describes one compilation step. [`canonicalize`]
//! normalizes its order-insensitive collections (required inputs, source
//! files, environment, details) by deduplicating and sorting them, and
//! [`encode`] turns any record into the byte-exact preimage that callers hash
//! into a cache key. The two steps are independent: encoding is literal, so
//! callers wanting order independence canonicalize first.
//!
#![deny(missing_docs)]

/// Deduplication and ordering of order-insensitive collections.
pub mod canonicalizer;
/// Deterministic preimage encoding.
pub mod fingerprint;
/// Compilation record data model.
pub mod record;
/// Reports emitted during canonicalization.
pub mod report;

pub use canonicalizer::{
    canonicalize, CanonicalizationError, CanonicalizationResult, Canonicalizer, Collection,
    DuplicateKeyPolicy,
};
pub use fingerprint::{encode, encode_into, encoded_len};
pub use record::{
    CompilationRecord, EnvironmentVariable, ExtensibleDetail, FileDescriptor, Identifier,
    RequiredInput,
};
pub use report::{CanonicalizationReport, ReportStatus, ReportWarning};

//! Summaries of compilation records for querying and indexing.
//!
//! [`summarize`] projects a record onto the fields an index needs. The build
//! target comes from the record's extensible details, decoded through an
//! explicit [`DetailRegistry`].

#![deny(missing_docs)]

/// Extensible-detail registry and known detail messages.
pub mod details;
/// Summary projection.
pub mod summary;

pub use details::{
    BuildDetails, DecodedDetail, DetailDecoder, DetailError, DetailRegistry,
    BUILD_DETAILS_TYPE_URL,
};
pub use summary::{summarize, Summary};

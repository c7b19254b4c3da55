//! Decoding of schema-tagged extensible details.
//!
//! A [`DetailRegistry`] maps type URLs to decoder functions. Lookups for type
//! URLs that were never registered return `None`, so records carrying newer
//! metadata types stay readable.

use std::collections::BTreeMap;
use std::fmt;

use prost::Message;
use serde::{Deserialize, Serialize};
use unitkey_canonical::ExtensibleDetail;

/// Type URL of the build-details message.
pub const BUILD_DETAILS_TYPE_URL: &str = "kythe.io/proto/kythe.proto.BuildDetails";

/// Build-system metadata attached to a compilation record.
#[derive(Clone, PartialEq, Eq, Hash, Message, Serialize, Deserialize)]
pub struct BuildDetails {
    /// Build target that produced the compilation.
    #[prost(string, tag = "1")]
    pub build_target: String,
    /// Rule type of the target (e.g. `cc_library`).
    #[prost(string, tag = "2")]
    pub rule_type: String,
    /// Build configuration name.
    #[prost(string, tag = "3")]
    pub build_config: String,
}

impl BuildDetails {
    /// Wraps this message as an extensible detail under [`BUILD_DETAILS_TYPE_URL`].
    pub fn to_detail(&self) -> ExtensibleDetail {
        ExtensibleDetail::new(BUILD_DETAILS_TYPE_URL, self.encode_to_vec())
    }
}

/// A decoded extensible detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedDetail {
    /// Build-system metadata.
    BuildDetails(BuildDetails),
}

/// Decodes a payload registered under some type URL.
pub type DetailDecoder = fn(&[u8]) -> Result<DecodedDetail, DetailError>;

/// Error decoding a registered detail.
#[derive(thiserror::Error, Debug)]
pub enum DetailError {
    /// Payload bytes do not match the registered schema.
    #[error("malformed {type_url} payload: {source}")]
    Malformed {
        /// Type URL of the detail.
        type_url: String,
        /// Underlying decode failure.
        #[source]
        source: prost::DecodeError,
    },
    /// Payload was refused by a decoder that is not protobuf-based.
    #[error("rejected {type_url} payload: {reason}")]
    Rejected {
        /// Type URL of the detail.
        type_url: String,
        /// Why the decoder refused the payload.
        reason: String,
    },
}

/// Mapping from type URL to decoder.
#[derive(Clone)]
pub struct DetailRegistry {
    decoders: BTreeMap<String, DetailDecoder>,
}

impl DetailRegistry {
    /// Creates a registry with no decoders.
    pub fn new() -> Self {
        Self {
            decoders: BTreeMap::new(),
        }
    }

    /// Creates a registry that knows [`BuildDetails`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(BUILD_DETAILS_TYPE_URL, decode_build_details);
        registry
    }

    /// Registers `decoder` for `type_url`, replacing any previous decoder.
    pub fn register(
        &mut self,
        type_url: impl Into<String>,
        decoder: DetailDecoder,
    ) -> &mut Self {
        self.decoders.insert(type_url.into(), decoder);
        self
    }

    /// Returns `true` if a decoder is registered for `type_url`.
    pub fn contains(&self, type_url: &str) -> bool {
        self.decoders.contains_key(type_url)
    }

    /// Decodes `detail`; `None` when its type URL is not registered.
    pub fn decode(
        &self,
        detail: &ExtensibleDetail,
    ) -> Option<Result<DecodedDetail, DetailError>> {
        let decoder = self.decoders.get(&detail.type_url)?;
        Some(decoder(&detail.value))
    }
}

impl Default for DetailRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for DetailRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetailRegistry")
            .field("type_urls", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn decode_build_details(bytes: &[u8]) -> Result<DecodedDetail, DetailError> {
    BuildDetails::decode(bytes)
        .map(DecodedDetail::BuildDetails)
        .map_err(|source| DetailError::Malformed {
            type_url: BUILD_DETAILS_TYPE_URL.to_string(),
            source,
        })
}

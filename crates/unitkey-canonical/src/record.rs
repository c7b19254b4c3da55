use serde::{Deserialize, Serialize};

/// Five-part name of an artifact (a file or a build target).
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Identifier {
    /// Artifact signature, unique within the other four components.
    pub signature: String,
    /// Corpus the artifact belongs to.
    pub corpus: String,
    /// Root within the corpus.
    pub root: String,
    /// Path relative to the root.
    pub path: String,
    /// Source language of the artifact.
    pub language: String,
}

impl Identifier {
    /// Builds an identifier from its five components.
    pub fn new(
        signature: impl Into<String>,
        corpus: impl Into<String>,
        root: impl Into<String>,
        path: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            signature: signature.into(),
            corpus: corpus.into(),
            root: root.into(),
            path: path.into(),
            language: language.into(),
        }
    }
}

/// Path and content digest of a file consumed by a compilation.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(default)]
pub struct FileDescriptor {
    /// Path as seen by the compiler.
    pub path: String,
    /// Externally computed content digest; opaque here.
    pub digest: String,
}

impl FileDescriptor {
    /// Builds a descriptor from a path and digest.
    pub fn new(path: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            digest: digest.into(),
        }
    }
}

/// One file consumed by the compilation.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(default)]
pub struct RequiredInput {
    /// Optional identifier of the input; encoded as all-empty when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    /// Path and digest of the input.
    pub descriptor: FileDescriptor,
}

impl RequiredInput {
    /// Builds an input with no identifier.
    pub fn new(descriptor: FileDescriptor) -> Self {
        Self {
            identifier: None,
            descriptor,
        }
    }

    /// Attaches an identifier to this input.
    pub fn with_identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Canonical ordering key: the descriptor digest.
    pub fn key(&self) -> &str {
        &self.descriptor.digest
    }
}

/// Environment variable visible to the compilation.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(default)]
pub struct EnvironmentVariable {
    /// Variable name.
    pub name: String,
    /// Variable value.
    pub value: String,
}

impl EnvironmentVariable {
    /// Builds a variable from name and value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Canonical ordering key: the variable name.
    pub fn key(&self) -> &str {
        &self.name
    }
}

/// Schema-tagged opaque payload carrying metadata not modeled directly.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(default)]
pub struct ExtensibleDetail {
    /// Identifier of the payload schema.
    pub type_url: String,
    /// Raw payload bytes (base64 in JSON).
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

impl ExtensibleDetail {
    /// Builds a detail from a schema identifier and payload.
    pub fn new(type_url: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
        }
    }

    /// Canonical ordering key: the type URL.
    pub fn key(&self) -> &str {
        &self.type_url
    }
}

/// Everything needed to reproduce one compilation step.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(default)]
pub struct CompilationRecord {
    /// Identifier of the artifact being produced.
    pub identifier: Identifier,
    /// Files consumed by the compilation (order-insensitive).
    pub required_inputs: Vec<RequiredInput>,
    /// Primary source paths (order-insensitive).
    pub source_files: Vec<String>,
    /// Command-line arguments; order is significant.
    pub arguments: Vec<String>,
    /// Output key of the compilation.
    pub output_key: String,
    /// Working directory of the compilation.
    pub working_directory: String,
    /// Opaque build-context marker.
    pub entry_context: String,
    /// Environment variables (order-insensitive).
    pub environment: Vec<EnvironmentVariable>,
    /// Extensible metadata (order-insensitive).
    pub details: Vec<ExtensibleDetail>,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

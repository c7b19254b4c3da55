//! Fingerprint preimage encoding.
//!
//! The preimage is a literal serialization of a record: tagged sections in a
//! fixed order, each field terminated by a single NUL byte. It performs no
//! sorting or deduplication; canonicalize first when order must not matter.
//!
//! ```text
//! "CU\n"  signature\0 corpus\0 root\0 path\0 language\0
//! per input: "RI\n" <identifier, 5 fields> "IN\n" path\0 digest\0
//! "ARG\n" argument\0 ...
//! "OUT\n" output_key\0
//! "SRC\n" source\0 ...
//! "CWD\n" working_directory\0
//! "CTX\n" entry_context\0
//! "ENV\n" name\0 value\0 ...      only when non-empty
//! "DET\n" type_url\0 value\0 ...  only when non-empty
//! ```
//!
//! `ENV` and `DET` are written once per section, not per element: two
//! variables encode as `"ENV\n" A\0 1\0 B\0 2\0`.
//!
//! Field values are copied verbatim. A value containing NUL makes the
//! preimage ambiguous between records; the output is a one-way fingerprint
//! and is never parsed back.

use std::io::{self, Write};

use crate::record::{CompilationRecord, Identifier};

const TAG_UNIT: &[u8] = b"CU\n";
const TAG_INPUT_NAME: &[u8] = b"RI\n";
const TAG_INPUT_FILE: &[u8] = b"IN\n";
const TAG_ARGUMENTS: &[u8] = b"ARG\n";
const TAG_OUTPUT: &[u8] = b"OUT\n";
const TAG_SOURCES: &[u8] = b"SRC\n";
const TAG_WORKING_DIR: &[u8] = b"CWD\n";
const TAG_CONTEXT: &[u8] = b"CTX\n";
const TAG_ENVIRONMENT: &[u8] = b"ENV\n";
const TAG_DETAILS: &[u8] = b"DET\n";

const TERMINATOR: &[u8] = b"\0";

/// Number of fields an identifier contributes to the preimage.
const IDENTIFIER_FIELDS: usize = 5;

/// Returns the fingerprint preimage of `record`.
pub fn encode(record: &CompilationRecord) -> Vec<u8> {
    let mut buf = Vec::with_capacity(encoded_len(record));
    walk(record, &mut |bytes: &[u8]| buf.extend_from_slice(bytes));
    buf
}

/// Writes the fingerprint preimage of `record` to `writer`.
///
/// Stops at the first write error.
pub fn encode_into<W: Write + ?Sized>(
    record: &CompilationRecord,
    writer: &mut W,
) -> io::Result<()> {
    let mut result = Ok(());
    walk(record, &mut |bytes: &[u8]| {
        if result.is_ok() {
            result = writer.write_all(bytes);
        }
    });
    result
}

/// Exact length in bytes of [`encode`]'s output.
pub fn encoded_len(record: &CompilationRecord) -> usize {
    let mut len = 0;
    walk(record, &mut |bytes: &[u8]| len += bytes.len());
    len
}

fn walk(record: &CompilationRecord, emit: &mut impl FnMut(&[u8])) {
    emit(TAG_UNIT);
    identifier(emit, &record.identifier);

    for input in &record.required_inputs {
        emit(TAG_INPUT_NAME);
        match &input.identifier {
            Some(id) => identifier(emit, id),
            None => {
                for _ in 0..IDENTIFIER_FIELDS {
                    emit(TERMINATOR);
                }
            }
        }
        emit(TAG_INPUT_FILE);
        field(emit, input.descriptor.path.as_bytes());
        field(emit, input.descriptor.digest.as_bytes());
    }

    emit(TAG_ARGUMENTS);
    for arg in &record.arguments {
        field(emit, arg.as_bytes());
    }

    emit(TAG_OUTPUT);
    field(emit, record.output_key.as_bytes());

    emit(TAG_SOURCES);
    for source in &record.source_files {
        field(emit, source.as_bytes());
    }

    emit(TAG_WORKING_DIR);
    field(emit, record.working_directory.as_bytes());

    emit(TAG_CONTEXT);
    field(emit, record.entry_context.as_bytes());

    if !record.environment.is_empty() {
        emit(TAG_ENVIRONMENT);
        for var in &record.environment {
            field(emit, var.name.as_bytes());
            field(emit, var.value.as_bytes());
        }
    }

    if !record.details.is_empty() {
        emit(TAG_DETAILS);
        for detail in &record.details {
            field(emit, detail.type_url.as_bytes());
            field(emit, &detail.value);
        }
    }
}

fn identifier(emit: &mut impl FnMut(&[u8]), id: &Identifier) {
    field(emit, id.signature.as_bytes());
    field(emit, id.corpus.as_bytes());
    field(emit, id.root.as_bytes());
    field(emit, id.path.as_bytes());
    field(emit, id.language.as_bytes());
}

fn field(emit: &mut impl FnMut(&[u8]), bytes: &[u8]) {
    emit(bytes);
    emit(TERMINATOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EnvironmentVariable, ExtensibleDetail, FileDescriptor, RequiredInput};

    fn busy_record() -> CompilationRecord {
        CompilationRecord {
            identifier: Identifier::new("sig", "corpus", "root", "a/b.cc", "c++"),
            required_inputs: vec![
                RequiredInput::new(FileDescriptor::new("a/b.cc", "d1"))
                    .with_identifier(Identifier::new("", "corpus", "", "a/b.cc", "")),
                RequiredInput::new(FileDescriptor::new("a/b.h", "d2")),
            ],
            source_files: vec!["a/b.cc".into()],
            arguments: vec!["-c".into(), "a/b.cc".into()],
            output_key: "b.o".into(),
            working_directory: "/src".into(),
            entry_context: "ctx".into(),
            environment: vec![EnvironmentVariable::new("PATH", "/bin")],
            details: vec![ExtensibleDetail::new("t", vec![0xff, 0x00, 0x01])],
        }
    }

    #[test]
    fn encoded_len_matches_output() {
        let record = busy_record();
        assert_eq!(encoded_len(&record), encode(&record).len());
        assert_eq!(
            encoded_len(&CompilationRecord::default()),
            encode(&CompilationRecord::default()).len()
        );
    }

    #[test]
    fn encode_into_matches_encode() {
        let record = busy_record();
        let mut out = Vec::new();
        encode_into(&record, &mut out).unwrap();
        assert_eq!(out, encode(&record));
    }

    #[test]
    fn encode_into_reports_writer_failure() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = encode_into(&busy_record(), &mut Full).unwrap_err();
        assert_eq!(err.to_string(), "full");
    }

    #[test]
    fn detail_bytes_are_copied_verbatim() {
        let record = CompilationRecord {
            details: vec![ExtensibleDetail::new("t", vec![0xff, 0x00, 0x01])],
            ..Default::default()
        };
        let bytes = encode(&record);
        assert!(bytes.ends_with(b"DET\nt\0\xff\x00\x01\0"));
    }

    #[test]
    fn arguments_are_not_reordered() {
        let record = CompilationRecord {
            arguments: vec!["b".into(), "a".into()],
            ..Default::default()
        };
        let bytes = encode(&record);
        let at = bytes.windows(4).position(|w| w == TAG_ARGUMENTS).unwrap();
        assert_eq!(&bytes[at..at + 8], b"ARG\nb\0a\0");
    }
}

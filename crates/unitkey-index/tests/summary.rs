use prost::Message;
use serde_json::json;
use unitkey_canonical::{
    canonicalize, CompilationRecord, ExtensibleDetail, FileDescriptor, Identifier, RequiredInput,
};
use unitkey_index::{
    summarize, BuildDetails, DecodedDetail, DetailError, DetailRegistry, Summary,
    BUILD_DETAILS_TYPE_URL,
};

fn build_details(target: &str) -> ExtensibleDetail {
    BuildDetails {
        build_target: target.into(),
        ..Default::default()
    }
    .to_detail()
}

fn reject_build_details(_: &[u8]) -> Result<DecodedDetail, DetailError> {
    Err(DetailError::Rejected {
        type_url: BUILD_DETAILS_TYPE_URL.into(),
        reason: "signature mismatch".into(),
    })
}

fn make_record() -> CompilationRecord {
    CompilationRecord {
        identifier: Identifier {
            signature: "false target".into(),
            language: "c++".into(),
            ..Default::default()
        },
        required_inputs: vec![
            RequiredInput::new(FileDescriptor::new("../p1", "d1")).with_identifier(Identifier {
                path: "p1".into(),
                ..Default::default()
            }),
            RequiredInput::new(FileDescriptor::new("p2", "d2")),
        ],
        source_files: vec!["S".into()],
        output_key: "O".into(),
        details: vec![build_details("T")],
        ..Default::default()
    }
}

#[test]
fn test_summary_extracts_indexed_fields() {
    let summary = summarize(&make_record(), &DetailRegistry::default());

    assert_eq!(summary.language, "c++");
    assert_eq!(summary.output, "O");
    assert_eq!(summary.sorted_inputs(), vec!["d1", "d2"]);
    assert_eq!(summary.sources, vec!["S"]);
    assert_eq!(summary.target, "T");
}

#[test]
fn test_from_record_uses_default_registry() {
    assert_eq!(
        Summary::from_record(&make_record()),
        summarize(&make_record(), &DetailRegistry::with_defaults())
    );
}

#[test]
fn test_summary_without_details_has_empty_target() {
    let record = CompilationRecord {
        details: vec![],
        ..make_record()
    };
    assert_eq!(Summary::from_record(&record).target, "");
}

#[test]
fn test_unknown_details_are_skipped() {
    let record = CompilationRecord {
        details: vec![
            ExtensibleDetail::new("example.com/Other", vec![0xde, 0xad]),
            build_details("//pkg:target"),
        ],
        ..make_record()
    };
    assert_eq!(Summary::from_record(&record).target, "//pkg:target");
}

#[test]
fn test_malformed_build_details_yield_no_target() {
    let record = CompilationRecord {
        details: vec![ExtensibleDetail::new(
            BUILD_DETAILS_TYPE_URL,
            vec![0x0a, 0x0a, b'T'],
        )],
        ..make_record()
    };
    assert_eq!(Summary::from_record(&record).target, "");
}

#[test]
fn test_malformed_entry_does_not_hide_later_entry() {
    let record = CompilationRecord {
        details: vec![
            ExtensibleDetail::new(BUILD_DETAILS_TYPE_URL, vec![0x0a, 0x0a, b'T']),
            build_details("T2"),
        ],
        ..make_record()
    };
    assert_eq!(Summary::from_record(&record).target, "T2");
}

#[test]
fn test_custom_decoder_error_yields_no_target() {
    let mut registry = DetailRegistry::new();
    registry.register(BUILD_DETAILS_TYPE_URL, reject_build_details);

    let summary = summarize(&make_record(), &registry);
    assert_eq!(summary.target, "");
    assert_eq!(summary.output, "O");
}

#[test]
fn test_first_build_details_wins() {
    let record = CompilationRecord {
        details: vec![build_details("first"), build_details("second")],
        ..make_record()
    };
    assert_eq!(Summary::from_record(&record).target, "first");
}

#[test]
fn test_empty_registry_finds_no_target() {
    let summary = summarize(&make_record(), &DetailRegistry::new());
    assert_eq!(summary.target, "");
    assert_eq!(summary.output, "O");
}

#[test]
fn test_summary_of_canonical_record_sees_same_data() {
    let record = make_record();
    let raw = Summary::from_record(&record);
    let canonical = Summary::from_record(&canonicalize(&record));
    assert_eq!(raw.sorted_inputs(), canonical.sorted_inputs());
    assert_eq!(raw.target, canonical.target);
}

#[test]
fn test_build_details_wire_format() {
    let detail = build_details("T");
    assert_eq!(detail.type_url, BUILD_DETAILS_TYPE_URL);
    assert_eq!(detail.value, vec![0x0a, 0x01, b'T']);
    assert_eq!(
        BuildDetails::decode(detail.value.as_slice()).unwrap().build_target,
        "T"
    );
}

#[test]
fn test_summary_serializes_to_json() {
    let summary = Summary::from_record(&make_record());
    assert_eq!(
        serde_json::to_value(&summary).unwrap(),
        json!({
            "language": "c++",
            "output": "O",
            "inputs": ["d1", "d2"],
            "sources": ["S"],
            "target": "T"
        })
    );
}

//! Change codec tests against the fixture schema and change documents.

use chrono::{TimeZone, Utc};
use graph_delta::changes::{ChangeKind, CommitId, CommitMetadata, EntryChange};
use graph_delta::codec::ChangeCodec;
use graph_delta::error::{GraphDeltaError, MetamodelErrorKind};
use graph_delta::metamodel::{GlobalId, TypeMapper, Value};
use graph_delta::Change;
use serde_json::json;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_mapper() -> TypeMapper {
    TypeMapper::from_schema_file(&fixture("schema.yaml")).expect("fixture schema")
}

fn metadata() -> CommitMetadata {
    let date = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid date");
    CommitMetadata::new("ops", date, CommitId::new(3, 0)).with_property("ticket", "GD-7")
}

fn person(id: &str) -> GlobalId {
    GlobalId::instance("Person", id)
}

#[test]
fn test_decode_fixture_documents() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let text = std::fs::read_to_string(fixture("changes.json")).expect("fixture changes");
    let changes = codec.decode_document_str(&text).expect("decode");
    assert_eq!(changes.len(), 8);

    assert_eq!(
        changes[0],
        Change::value_changed(person("1"), "score", Value::from(10_i64), Value::from(11_i64))
            .with_commit_metadata(metadata())
    );
    assert!(changes[1..].iter().all(|c| c.commit_metadata().is_none()));

    assert_eq!(
        changes[3].kind(),
        &ChangeKind::ValueChanged {
            property: "address".to_string(),
            left: Value::object([("city", Value::from("Paris"))]),
            right: Value::object([
                ("city", Value::from("Lyon")),
                ("zip", Value::from("69001")),
            ]),
        }
    );
    assert_eq!(
        changes[4],
        Change::reference_changed(person("1"), "boss", None, Some(person("2")))
    );
    assert_eq!(
        changes[5],
        Change::map_changed(
            person("1"),
            "scores",
            vec![
                EntryChange::Added {
                    key: "math".to_string(),
                    value: Value::from(3_i64),
                },
                EntryChange::ValueChanged {
                    key: "art".to_string(),
                    left: Value::from(1_i64),
                    right: Value::from(2_i64),
                },
            ],
        )
    );
    assert_eq!(changes[6], Change::new_object(person("2")));
    assert_eq!(changes[7], Change::object_removed(person("3")));
}

#[test]
fn test_round_trip_keeps_carried_metadata() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let text = std::fs::read_to_string(fixture("changes.json")).expect("fixture changes");
    let changes = codec.decode_document_str(&text).expect("decode");

    let encoded = codec.encode_all(&changes, None).expect("encode");
    assert_eq!(encoded[0]["commitMetadata"]["author"], "ops");
    assert_eq!(encoded[0]["commitMetadata"]["id"], "3.0");
    assert!(encoded[1].get("commitMetadata").is_none());
    assert_eq!(codec.decode_all(&encoded).expect("decode again"), changes);
}

#[test]
fn test_encode_with_metadata_overrides_carried() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let stamped = metadata();
    let change = Change::value_added(person("1"), "tags", Value::from("c"));

    let json = codec.encode(&change, Some(&stamped)).expect("encode");
    assert_eq!(json["changeType"], "ValueAdded");
    assert_eq!(json["globalId"], json!({ "entity": "Person", "cdoId": "1" }));
    assert_eq!(json["property"], "tags");
    assert_eq!(json["value"], "c");
    assert_eq!(json["commitMetadata"]["properties"]["ticket"], "GD-7");

    let decoded = codec.decode(&json).expect("decode");
    assert_eq!(decoded.commit_metadata(), Some(&stamped));
    assert_eq!(decoded.kind(), change.kind());
}

#[test]
fn test_string_round_trip() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let change = Change::value_changed(
        person("7"),
        "address",
        Value::Null,
        Value::object([("city", Value::from("Oslo"))]),
    );
    let text = codec.encode_to_string(&change, None).expect("encode");
    assert!(!text.contains('\n'));
    assert_eq!(codec.decode_str(&text).expect("decode"), change);
}

#[test]
fn test_unknown_discriminator_is_unsupported() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let err = codec
        .decode(&json!({
            "changeType": "ListChange",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "property": "tags"
        }))
        .unwrap_err();
    assert!(err.is_unsupported_variant());
    assert!(!err.is_malformed_document());
}

#[test]
fn test_unknown_entry_discriminator_is_unsupported() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let err = codec
        .decode(&json!({
            "changeType": "MapChange",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "property": "scores",
            "entryChanges": [ { "entryChangeType": "EntryMoved", "key": "math" } ]
        }))
        .unwrap_err();
    assert!(err.is_unsupported_variant());
}

#[test]
fn test_unknown_class_is_unresolvable() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let err = codec
        .decode(&json!({
            "changeType": "NewObject",
            "globalId": { "entity": "Robot", "cdoId": "1" }
        }))
        .unwrap_err();
    assert!(err.is_unresolvable_type());
}

#[test]
fn test_unknown_property_is_unresolvable() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let err = codec
        .decode(&json!({
            "changeType": "ValueChange",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "property": "nickname",
            "left": "a",
            "right": "b"
        }))
        .unwrap_err();
    assert!(matches!(
        err,
        GraphDeltaError::Metamodel {
            source: MetamodelErrorKind::UnresolvableType { .. },
            ..
        }
    ));
}

#[test]
fn test_malformed_documents() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let cases = [
        json!(["not", "an", "object"]),
        json!({ "globalId": { "entity": "Person", "cdoId": "1" } }),
        json!({ "changeType": "NewObject" }),
        json!({
            "changeType": "ValueChange",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "property": "score",
            "left": "ten",
            "right": 11
        }),
        json!({
            "changeType": "ValueAdded",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "property": "score",
            "value": 1
        }),
        json!({
            "changeType": "ReferenceChange",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "property": "boss",
            "left": null
        }),
        json!({
            "changeType": "MapChange",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "property": "scores",
            "entryChanges": { "math": 3 }
        }),
        json!({
            "changeType": "NewObject",
            "globalId": { "entity": "Person", "cdoId": "1" },
            "commitMetadata": { "author": "ops" }
        }),
    ];
    for (index, doc) in cases.iter().enumerate() {
        let err = codec.decode(doc).unwrap_err();
        assert!(
            err.is_malformed_document(),
            "case #{index} should be malformed, got: {err}"
        );
    }
}

#[test]
fn test_invalid_json_text_is_malformed() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let err = codec.decode_document_str("{ not json").unwrap_err();
    assert!(err.is_malformed_document());
}

#[test]
fn test_decode_all_reports_index() {
    let mapper = fixture_mapper();
    let codec = ChangeCodec::new(&mapper);
    let err = codec
        .decode_all(&json!([
            { "changeType": "NewObject", "globalId": { "entity": "Person", "cdoId": "1" } },
            { "changeType": "NewObject" }
        ]))
        .unwrap_err();
    assert!(err.is_malformed_document());
    assert!(err.to_string().contains("change #1"));
}

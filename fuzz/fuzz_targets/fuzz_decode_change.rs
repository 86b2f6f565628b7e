#![no_main]
use graph_delta::codec::ChangeCodec;
use graph_delta::metamodel::TypeMapper;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

const SCHEMA: &str = r#"
classes:
  - name: Person
    kind: entity
    properties:
      - { name: id, type: int }
      - { name: born, type: "optional<date>" }
      - { name: address, type: Address }
      - { name: boss, type: "optional<Person>" }
      - { name: tags, type: "set<string>" }
      - { name: scores, type: "map<int, float>" }
  - name: Address
    kind: value
    properties:
      - { name: city, type: string }
"#;

fn mapper() -> &'static TypeMapper {
    static MAPPER: OnceLock<TypeMapper> = OnceLock::new();
    MAPPER.get_or_init(|| TypeMapper::from_yaml_str(SCHEMA).expect("valid schema"))
}

/// Fuzz strict change-document decoding.
///
/// Anything that decodes must encode again and decode to the same change.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let codec = ChangeCodec::new(mapper());
        if let Ok(changes) = codec.decode_document_str(s) {
            let encoded = codec.encode_all(&changes, None).expect("decoded changes encode");
            let again = codec.decode_all(&encoded).expect("encoded changes decode");
            assert_eq!(again, changes);
        }
    }
});

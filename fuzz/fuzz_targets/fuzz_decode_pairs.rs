#![no_main]
use graph_delta::codec::decode_pairs;
use graph_delta::metamodel::TypeMapper;
use graph_delta::DiffEngine;
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

const SCHEMA: &str = r#"
classes:
  - name: Person
    kind: entity
    properties:
      - { name: id, type: int }
      - { name: name, type: string }
      - { name: boss, type: "optional<Person>" }
      - { name: tags, type: "list<string>" }
      - { name: scores, type: "map<string, int>" }
"#;

fn mapper() -> &'static TypeMapper {
    static MAPPER: OnceLock<TypeMapper> = OnceLock::new();
    MAPPER.get_or_init(|| TypeMapper::from_yaml_str(SCHEMA).expect("valid schema"))
}

/// Fuzz pairs-file decoding followed by a diff of whatever decoded.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(pairs) = decode_pairs(s, mapper()) {
            let _ = DiffEngine::new().diff(pairs, mapper());
        }
    }
});

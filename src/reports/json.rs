//! JSON report generator.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::codec::ChangeCodec;
use crate::diff::Diff;
use crate::metamodel::TypeMapper;
use serde::Serialize;

/// Writes change documents as a JSON array, the same shape the `decode`
/// command reads back.
#[derive(Debug, Default)]
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn to_json_string<T: Serialize>(value: &T, pretty: bool) -> Result<String, ReportError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

impl ReportGenerator for JsonReporter {
    fn generate_diff_report(
        &self,
        diff: &Diff,
        codec: &ChangeCodec<'_>,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let documents = codec.encode_all(&diff.changes, config.commit_metadata.as_ref())?;
        to_json_string(&documents, config.pretty)
    }

    fn generate_metamodel_report(
        &self,
        mapper: &TypeMapper,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let classes: Vec<_> = mapper.classes().collect();
        to_json_string(&serde_json::json!({ "classes": classes }), config.pretty)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::{Change, CommitId, CommitMetadata};
    use crate::metamodel::{DeclaredType, EntityDefinition, GlobalId, Value};
    use chrono::{TimeZone, Utc};

    fn mapper() -> TypeMapper {
        TypeMapper::new([EntityDefinition::new("Person")
            .with_property("id", DeclaredType::Int)
            .with_property("score", DeclaredType::Int)
            .into()])
        .expect("valid")
    }

    #[test]
    fn test_documents_carry_commit_metadata() {
        let mapper = mapper();
        let codec = ChangeCodec::new(&mapper);
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single().expect("valid");
        let config = ReportConfig {
            pretty: false,
            ..ReportConfig::default()
        }
        .with_commit_metadata(Some(CommitMetadata::new("ops", date, CommitId::new(5, 0))));
        let diff = Diff::new(
            vec![Change::value_changed(
                GlobalId::instance("Person", "1"),
                "score",
                Value::Int(1),
                Value::Int(2),
            )],
            1,
        );

        let report = JsonReporter::new()
            .generate_diff_report(&diff, &codec, &config)
            .expect("report");
        let json: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(json[0]["changeType"], "ValueChange");
        assert_eq!(json[0]["commitMetadata"]["author"], "ops");

        let decoded = codec.decode_all(&json).expect("decodable");
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn test_metamodel_json() {
        let mapper = mapper();
        let report = JsonReporter::new()
            .generate_metamodel_report(&mapper, &ReportConfig::default())
            .expect("report");
        let json: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(json["classes"][0]["name"], "Person");
        assert_eq!(json["classes"][0]["kind"], "entity");
        assert_eq!(json["classes"][0]["properties"][1]["category"], "Primitive");
    }
}

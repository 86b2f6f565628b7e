//! Decoding of node-pair files.
//!
//! A pairs file lists matched snapshot sides by global id:
//!
//! ```json
//! {
//!   "pairs": [
//!     { "globalId": { "entity": "Person", "cdoId": "1" },
//!       "left": { "id": 1, "tags": ["a", "b"] },
//!       "right": { "id": 1, "tags": ["b", "c"] } }
//!   ]
//! }
//! ```
//!
//! A missing or `null` side means the object is absent from that snapshot.

use super::ValueCodec;
use crate::error::{ErrorContext, Result};
use crate::metamodel::{GlobalId, MetadataSource, NodePair, ObjectNode};
use serde::Deserialize;
use serde_json::{Map, Value as Json};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PairsFile {
    pairs: Vec<PairEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PairEntry {
    global_id: GlobalId,
    #[serde(default)]
    left: Option<Map<String, Json>>,
    #[serde(default)]
    right: Option<Map<String, Json>>,
}

/// Decode node pairs from pairs-file JSON text.
///
/// Property values are typed by the declared types of the owning class.
pub fn decode_pairs(text: &str, metadata: &dyn MetadataSource) -> Result<Vec<NodePair>> {
    let file: PairsFile = serde_json::from_str(text)?;
    let values = ValueCodec::new(metadata);

    file.pairs
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            decode_pair(entry, metadata, values).with_context(|| format!("reading pair #{index}"))
        })
        .collect()
}

fn decode_pair(entry: PairEntry, metadata: &dyn MetadataSource, values: ValueCodec<'_>) -> Result<NodePair> {
    let PairEntry {
        global_id,
        left,
        right,
    } = entry;
    let class = metadata.managed_class(global_id.type_name())?;
    let node = |side: Option<Map<String, Json>>| -> Result<Option<ObjectNode>> {
        side.map(|object| {
            let decoded = values.decode_properties(class.name(), &object)?;
            Ok(decoded
                .into_iter()
                .fold(ObjectNode::new(global_id.clone()), |node, (name, value)| {
                    node.with_value(name, value)
                }))
        })
        .transpose()
    };
    let left = node(left)?;
    let right = node(right)?;
    NodePair::new(class, global_id, left, right)
}

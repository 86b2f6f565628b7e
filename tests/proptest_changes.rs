//! Property-based tests for the diff engine and the change codec.
//!
//! Collection and map diffs must be enough to rebuild the new snapshot from
//! the old one, and every change the engine emits must survive the codec,
//! both as JSON values and as JSON text.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use graph_delta::changes::{ChangeKind, CommitId, CommitMetadata, EntryChange};
use graph_delta::codec::ChangeCodec;
use graph_delta::metamodel::{
    DeclaredType, EntityDefinition, GlobalId, MetadataSource, NodePair, ObjectNode, TypeMapper,
    Value, ValueObjectDefinition,
};
use graph_delta::{Change, DiffEngine};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn mapper() -> TypeMapper {
    TypeMapper::new([EntityDefinition::new("Item")
        .with_property("id", DeclaredType::Int)
        .with_property("label", DeclaredType::optional(DeclaredType::String))
        .with_property("tags", DeclaredType::list(DeclaredType::String))
        .with_property("counts", DeclaredType::map(DeclaredType::String, DeclaredType::Int))
        .into()])
    .expect("valid metamodel")
}

fn node(label: Option<&str>, tags: &[String], counts: &BTreeMap<String, i64>) -> ObjectNode {
    let mut node = ObjectNode::new(GlobalId::instance("Item", "1"))
        .with_value("id", 1_i64)
        .with_value("tags", Value::list(tags.iter().map(|t| Value::from(t.as_str()))))
        .with_value(
            "counts",
            Value::map(counts.iter().map(|(k, v)| (k.clone(), Value::from(*v)))),
        );
    if let Some(label) = label {
        node.set("label", label);
    }
    node
}

fn pair(mapper: &TypeMapper, left: ObjectNode, right: ObjectNode) -> NodePair {
    let class = mapper.managed_class("Item").expect("Item");
    NodePair::new(class, GlobalId::instance("Item", "1"), Some(left), Some(right)).expect("pair")
}

fn tags() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]", 0..8)
}

fn counts() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-e]", -3_i64..3, 0..5)
}

fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}

fn rich_mapper() -> TypeMapper {
    TypeMapper::new([
        EntityDefinition::new("Item")
            .with_property("id", DeclaredType::Int)
            .with_property("ratio", DeclaredType::optional(DeclaredType::Float))
            .with_property("seen", DeclaredType::optional(DeclaredType::Timestamp))
            .with_property("born", DeclaredType::optional(DeclaredType::Date))
            .with_property("address", DeclaredType::optional(DeclaredType::named("Address")))
            .with_property("parent", DeclaredType::optional(DeclaredType::named("Item")))
            .with_property("stops", DeclaredType::list(DeclaredType::named("Address")))
            .into(),
        ValueObjectDefinition::new("Address")
            .with_property("city", DeclaredType::String)
            .with_property("zip", DeclaredType::optional(DeclaredType::String))
            .into(),
    ])
    .expect("valid metamodel")
}

fn item_id() -> GlobalId {
    GlobalId::instance("Item", "1")
}

#[derive(Debug, Clone)]
struct Address {
    city: String,
    zip: Option<String>,
}

impl Address {
    fn to_value(&self) -> Value {
        Value::object([
            ("city", Value::from(self.city.as_str())),
            ("zip", Value::from(self.zip.clone())),
        ])
    }
}

#[derive(Debug, Clone)]
struct Snapshot {
    ratio: Option<f64>,
    seen: Option<DateTime<Utc>>,
    born: Option<NaiveDate>,
    address: Option<Address>,
    parent: Option<String>,
    stops: Vec<Address>,
}

impl Snapshot {
    fn to_node(&self) -> ObjectNode {
        ObjectNode::new(item_id())
            .with_value("id", 1_i64)
            .with_value("ratio", self.ratio)
            .with_value("seen", self.seen)
            .with_value("born", self.born)
            .with_value("address", self.address.as_ref().map(Address::to_value))
            .with_value(
                "parent",
                self.parent.as_ref().map(|id| GlobalId::instance("Item", id.as_str())),
            )
            .with_value("stops", Value::list(self.stops.iter().map(Address::to_value)))
    }
}

fn finite_float() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("JSON has no non-finite numbers", |f| f.is_finite())
}

fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0_i64..4_102_444_800, 0_u32..1_000_000_000).prop_map(|(secs, nanos)| {
        Utc.timestamp_opt(secs, nanos)
            .single()
            .expect("in-range timestamp")
    })
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (1_i32..800_000).prop_map(|days| NaiveDate::from_num_days_from_ce_opt(days).expect("in-range date"))
}

fn address() -> impl Strategy<Value = Address> {
    ("[A-Z][a-z]{0,5}", prop::option::of("[0-9]{5}")).prop_map(|(city, zip)| Address { city, zip })
}

prop_compose! {
    fn snapshot()(
        ratio in prop::option::of(finite_float()),
        seen in prop::option::of(timestamp()),
        born in prop::option::of(date()),
        address in prop::option::of(address()),
        parent in prop::option::of("[2-4]"),
        stops in prop::collection::vec(address(), 0..3),
    ) -> Snapshot {
        Snapshot { ratio, seen, born, address, parent, stops }
    }
}

prop_compose! {
    fn commit_metadata()(
        author in "[a-z]{1,8}",
        date in timestamp(),
        major in 0_u64..1000,
        minor in 0_u32..10,
        properties in prop::collection::btree_map("[a-z]{1,4}", "[a-z0-9]{0,6}", 0..3),
    ) -> CommitMetadata {
        properties.into_iter().fold(
            CommitMetadata::new(author, date, CommitId::new(major, minor)),
            |metadata, (key, value)| metadata.with_property(key, value),
        )
    }
}

fn assert_codec_round_trip(codec: &ChangeCodec<'_>, changes: &[Change]) -> Result<(), TestCaseError> {
    let encoded = codec.encode_all(changes, None).expect("encode");
    prop_assert_eq!(codec.decode_all(&encoded).expect("decode"), changes.to_vec());

    for change in changes {
        let text = codec.encode_to_string(change, None).expect("encode text");
        prop_assert_eq!(&codec.decode_str(&text).expect("decode text"), change);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn collection_changes_rebuild_new_multiset(left in tags(), right in tags()) {
        let mapper = mapper();
        let empty = BTreeMap::new();
        let pair = pair(&mapper, node(None, &left, &empty), node(None, &right, &empty));
        let changes = DiffEngine::new().diff_pair(&pair, &mapper).expect("diff");

        let mut rebuilt = left.clone();
        let mut seen_added = false;
        for change in &changes {
            match change.kind() {
                ChangeKind::ValueRemoved { property, value } => {
                    prop_assert_eq!(property, "tags");
                    prop_assert!(!seen_added, "removals must precede additions");
                    let Value::String(text) = value else {
                        return Err(TestCaseError::fail("non-string element"));
                    };
                    let position = rebuilt.iter().position(|t| t == text);
                    prop_assert!(position.is_some(), "removed element not in old list");
                    if let Some(position) = position {
                        rebuilt.remove(position);
                    }
                }
                ChangeKind::ValueAdded { property, value } => {
                    prop_assert_eq!(property, "tags");
                    seen_added = true;
                    let Value::String(text) = value else {
                        return Err(TestCaseError::fail("non-string element"));
                    };
                    rebuilt.push(text.clone());
                }
                other => return Err(TestCaseError::fail(format!("unexpected change {other:?}"))),
            }
        }
        prop_assert_eq!(sorted(rebuilt), sorted(right.clone()));
        prop_assert_eq!(changes.is_empty(), sorted(left) == sorted(right));
    }

    #[test]
    fn map_changes_rebuild_new_map(left in counts(), right in counts()) {
        let mapper = mapper();
        let pair = pair(&mapper, node(None, &[], &left), node(None, &[], &right));
        let changes = DiffEngine::new().diff_pair(&pair, &mapper).expect("diff");

        if left == right {
            prop_assert!(changes.is_empty());
            return Ok(());
        }
        prop_assert_eq!(changes.len(), 1);
        let ChangeKind::MapChanged { property, entries } = changes[0].kind() else {
            return Err(TestCaseError::fail("expected a map change"));
        };
        prop_assert_eq!(property, "counts");

        let mut rebuilt: BTreeMap<String, Value> =
            left.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
        for entry in entries {
            match entry {
                EntryChange::Added { key, value } => {
                    prop_assert!(rebuilt.insert(key.clone(), value.clone()).is_none());
                }
                EntryChange::Removed { key, value } => {
                    let prev = rebuilt.remove(key);
                    prop_assert_eq!(prev.as_ref(), Some(value));
                }
                EntryChange::ValueChanged { key, left, right } => {
                    prop_assert_ne!(left, right);
                    let prev = rebuilt.insert(key.clone(), right.clone());
                    prop_assert_eq!(prev.as_ref(), Some(left));
                }
            }
        }
        let expected: BTreeMap<String, Value> =
            right.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
        prop_assert_eq!(rebuilt, expected);
    }

    #[test]
    fn emitted_changes_survive_codec(
        left_label in prop::option::of("[a-z]{0,6}"),
        right_label in prop::option::of("[a-z]{0,6}"),
        left_tags in tags(),
        right_tags in tags(),
        left_counts in counts(),
        right_counts in counts(),
    ) {
        let mapper = mapper();
        let pair = pair(
            &mapper,
            node(left_label.as_deref(), &left_tags, &left_counts),
            node(right_label.as_deref(), &right_tags, &right_counts),
        );
        let changes = DiffEngine::new().diff_pair(&pair, &mapper).expect("diff");

        let codec = ChangeCodec::new(&mapper);
        let encoded = codec.encode_all(&changes, None).expect("encode");
        prop_assert_eq!(codec.decode_all(&encoded).expect("decode"), changes);
    }

    #[test]
    fn rich_changes_survive_codec(
        left in prop::option::of(snapshot()),
        right in prop::option::of(snapshot()),
        initial_changes in any::<bool>(),
        city_change in (address(), address()),
        metadata in prop::option::of(commit_metadata()),
    ) {
        prop_assume!(left.is_some() || right.is_some());
        let mapper = rich_mapper();
        let class = mapper.managed_class("Item").expect("Item");
        let pair = NodePair::new(
            class,
            item_id(),
            left.as_ref().map(Snapshot::to_node),
            right.as_ref().map(Snapshot::to_node),
        )
        .expect("pair");
        let mut changes = DiffEngine::new()
            .with_initial_changes(initial_changes)
            .diff_pair(&pair, &mapper)
            .expect("diff");

        match (&left, &right) {
            (None, _) => prop_assert_eq!(changes[0].kind(), &ChangeKind::NewObject),
            (_, None) => prop_assert_eq!(changes[0].kind(), &ChangeKind::ObjectRemoved),
            _ => {}
        }

        let (old, new) = city_change;
        changes.push(Change::value_changed(
            GlobalId::value_object("Address", item_id(), "address"),
            "city",
            Value::from(old.city),
            Value::from(new.city),
        ));
        changes.push(Change::value_changed(
            GlobalId::value_object("Address", item_id(), "stops/0"),
            "zip",
            Value::from(old.zip),
            Value::from(new.zip),
        ));
        if let Some(metadata) = &metadata {
            changes = changes
                .into_iter()
                .map(|change| change.with_commit_metadata(metadata.clone()))
                .collect();
        }

        let codec = ChangeCodec::new(&mapper);
        assert_codec_round_trip(&codec, &changes)?;
    }

    #[test]
    fn reference_changes_survive_codec(
        left in prop::option::of("[1-9]{1,3}"),
        right in prop::option::of("[1-9]{1,3}"),
    ) {
        let mapper = rich_mapper();
        let to_id = |id: &String| GlobalId::instance("Item", id.as_str());
        let change = Change::reference_changed(
            item_id(),
            "parent",
            left.as_ref().map(to_id),
            right.as_ref().map(to_id),
        );

        let codec = ChangeCodec::new(&mapper);
        assert_codec_round_trip(&codec, &[change])?;
    }

    #[test]
    fn float_changes_survive_text(left in finite_float(), right in finite_float()) {
        let mapper = rich_mapper();
        let codec = ChangeCodec::new(&mapper);
        let change = Change::value_changed(item_id(), "ratio", Value::Float(left), Value::Float(right));

        let text = codec.encode_to_string(&change, None).expect("encode text");
        let decoded = codec.decode_str(&text).expect("decode text");
        let ChangeKind::ValueChanged { left: Value::Float(l), right: Value::Float(r), .. } = decoded.kind() else {
            return Err(TestCaseError::fail(format!("unexpected change {decoded:?}")));
        };
        prop_assert_eq!(l.to_bits(), left.to_bits());
        prop_assert_eq!(r.to_bits(), right.to_bits());
    }

    #[test]
    fn decode_never_panics(text in "\\PC{0,200}") {
        let mapper = mapper();
        let codec = ChangeCodec::new(&mapper);
        let _ = codec.decode_document_str(&text);
    }
}

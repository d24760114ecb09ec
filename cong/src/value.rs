//! Hierarchical value tree shared by every document format.
//!
//! Parsers produce a [`Value`]; the store merges documents into one tree and
//! looks leaves up by canonical key during materialization.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

/// Mapping node: canonical segment to subtree.
pub type Mapping = BTreeMap<String, Value>;

/// A parsed configuration value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absent or explicitly empty value.
    #[default]
    Null,
    /// Single scalar.
    Scalar(Scalar),
    /// Ordered list of values.
    Sequence(Vec<Value>),
    /// Keyed subtree.
    Mapping(Mapping),
}

/// Scalar leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Text.
    String(String),
    /// Integer number.
    Integer(i64),
    /// Unsigned integer above `i64::MAX`.
    Unsigned(u64),
    /// Floating point number.
    Float(f64),
    /// Boolean flag.
    Boolean(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Unsigned(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl Value {
    /// Empty mapping.
    #[must_use]
    pub const fn mapping() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the mapping when this is a mapping node.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the scalar when this is a scalar leaf.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Short description of the node kind used in diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Merge `incoming` on top of `self`, in place.
    ///
    /// - A null on either side yields the other side.
    /// - Two mappings take the union of their keys, merging shared keys
    ///   recursively.
    /// - Everything else, sequences included, is replaced by `incoming`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cong::Value;
    ///
    /// let mut acc = Value::from_path(&["x"], Value::from(vec![Value::from(1), Value::from(2)]));
    /// acc.merge(Value::from_path(&["x"], Value::from(vec![Value::from(4)])));
    /// assert_eq!(acc.lookup("x"), Some(&Value::from(vec![Value::from(4)])));
    /// ```
    pub fn merge(&mut self, incoming: Self) {
        match (self, incoming) {
            (_, Self::Null) => {}
            (Self::Mapping(existing), Self::Mapping(layer)) => {
                for (key, value) in layer {
                    match existing.get_mut(&key) {
                        Some(slot) => slot.merge(value),
                        None => {
                            existing.insert(key, value);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }

    /// Build a tree holding `leaf` at `path`.
    ///
    /// An empty path returns `leaf` itself.
    #[must_use]
    pub fn from_path<S: AsRef<str>>(path: &[S], leaf: Self) -> Self {
        path.iter().rev().fold(leaf, |acc, segment| {
            let mut map = Mapping::new();
            map.insert(segment.as_ref().to_owned(), acc);
            Self::Mapping(map)
        })
    }

    /// Place `leaf` at `path`, creating intermediate mappings as needed.
    ///
    /// Follows [`Value::merge`] semantics, so a scalar standing where a
    /// mapping is required gets replaced.
    pub fn insert_path<S: AsRef<str>>(&mut self, path: &[S], leaf: Self) {
        self.merge(Self::from_path(path, leaf));
    }

    /// Find the node at dotted `key`.
    ///
    /// Mapping keys are expected in lowercase, as [`Value::normalise_keys`]
    /// leaves them, so segments match case-insensitively. When no key matches
    /// a segment, a key equal to the segment with its underscores removed is
    /// accepted, so `server_name` finds a document's `serverName`.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Self> {
        key.split('.')
            .try_fold(self, |node, segment| node.as_mapping()?.find_segment(segment))
    }

    /// Lowercase every mapping key, recursively.
    ///
    /// Keys that collide once lowercased are merged in key order.
    #[must_use]
    pub fn normalise_keys(self) -> Self {
        match self {
            Self::Mapping(map) => {
                let mut out = Mapping::new();
                for (key, value) in map {
                    let normalised = value.normalise_keys();
                    match out.get_mut(&key.to_lowercase()) {
                        Some(slot) => slot.merge(normalised),
                        None => {
                            out.insert(key.to_lowercase(), normalised);
                        }
                    }
                }
                Self::Mapping(out)
            }
            Self::Sequence(items) => {
                Self::Sequence(items.into_iter().map(Self::normalise_keys).collect())
            }
            other => other,
        }
    }
}

trait FindSegment {
    fn find_segment(&self, segment: &str) -> Option<&Value>;
}

impl FindSegment for Mapping {
    fn find_segment(&self, segment: &str) -> Option<&Value> {
        let wanted = segment.to_lowercase();
        self.get(&wanted).or_else(|| self.get(&wanted.replace('_', "")))
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Integer(i))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Scalar(Scalar::Integer(i64::from(i)))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Scalar(i64::try_from(u).map_or(Scalar::Unsigned(u), Scalar::Integer))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Scalar(Scalar::Float(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Boolean(b))
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Scalar(scalar) => scalar.serialize(serializer),
            Self::Sequence(items) => serializer.collect_seq(items),
            Self::Mapping(map) => serializer.collect_map(map),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Unsigned(u) => serializer.serialize_u64(*u),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a configuration value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = Mapping::new();
        while let Some((key, value)) = access.next_entry::<MapKey, Value>()? {
            map.insert(key.0, value);
        }
        Ok(Value::Mapping(map))
    }
}

/// Mapping key accepting any scalar spelling, since YAML and HCL allow
/// numeric and boolean keys.
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl Visitor<'_> for KeyVisitor {
            type Value = MapKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a scalar mapping key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
                Ok(MapKey(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<MapKey, E> {
                Ok(MapKey(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn seq(items: &[i64]) -> Value {
        Value::Sequence(items.iter().copied().map(Value::from).collect())
    }

    fn doc(entries: &[(&str, Value)]) -> Value {
        let mut acc = Value::mapping();
        for (key, value) in entries {
            let path: Vec<&str> = key.split('.').collect();
            acc.insert_path(&path, value.clone());
        }
        acc
    }

    #[test]
    fn merge_takes_union_of_mappings() {
        let mut acc = doc(&[("app.name", Value::from("a")), ("db.port", Value::from(1))]);
        acc.merge(doc(&[("app.description", Value::from("d")), ("db.port", Value::from(2))]));
        assert_eq!(acc.lookup("app.name"), Some(&Value::from("a")));
        assert_eq!(acc.lookup("app.description"), Some(&Value::from("d")));
        assert_eq!(acc.lookup("db.port"), Some(&Value::from(2)));
    }

    #[test]
    fn merge_replaces_sequences() {
        let mut acc = doc(&[("x", seq(&[1, 2, 3]))]);
        acc.merge(doc(&[("x", seq(&[4]))]));
        assert_eq!(acc.lookup("x"), Some(&seq(&[4])));
    }

    #[rstest]
    #[case::null_right(Value::from(1), Value::Null, Value::from(1))]
    #[case::null_left(Value::Null, Value::from(1), Value::from(1))]
    #[case::scalar_over_mapping(doc(&[("a", Value::from(1))]), Value::from("x"), Value::from("x"))]
    #[case::mapping_over_scalar(
        Value::from("x"),
        doc(&[("a", Value::from(1))]),
        doc(&[("a", Value::from(1))])
    )]
    #[case::sequence_over_scalar(Value::from(true), seq(&[1]), seq(&[1]))]
    fn merge_handles_mismatched_kinds(
        #[case] mut left: Value,
        #[case] right: Value,
        #[case] expected: Value,
    ) {
        left.merge(right);
        assert_eq!(left, expected);
    }

    #[test]
    fn lookup_is_case_insensitive_and_tolerates_snake_case() {
        let tree = doc(&[
            ("servername", Value::from("HelloWorld")),
            ("server.port", Value::from(80)),
        ]);
        assert_eq!(tree.lookup("ServerName"), Some(&Value::from("HelloWorld")));
        assert_eq!(tree.lookup("server_name"), Some(&Value::from("HelloWorld")));
        assert_eq!(tree.lookup("SERVER.PORT"), Some(&Value::from(80)));
        assert_eq!(tree.lookup("server.missing"), None);
        assert_eq!(tree.lookup("server.port.deeper"), None);
    }

    #[test]
    fn lookup_prefers_exact_matches() {
        let tree = doc(&[("max_age", Value::from("exact")), ("maxage", Value::from("folded"))]);
        assert_eq!(tree.lookup("max_age"), Some(&Value::from("exact")));
    }

    #[test]
    fn normalise_lowercases_nested_keys() {
        let mut inner = Mapping::new();
        inner.insert("ClientId".into(), Value::from("id"));
        let mut outer = Mapping::new();
        outer.insert("ThirdParty".into(), Value::Sequence(vec![Value::Mapping(inner)]));
        let normalised = Value::Mapping(outer).normalise_keys();
        let items = normalised.lookup("thirdparty");
        assert_eq!(
            items,
            Some(&Value::Sequence(vec![doc(&[("clientid", Value::from("id"))])]))
        );
    }

    #[test]
    fn deserializes_from_json() -> anyhow::Result<()> {
        let value: Value = serde_json::from_str(
            r#"{"a": [1, 2.5, "x", true, null], "b": {"c": 18446744073709551615}}"#,
        )?;
        let expected = Value::Sequence(vec![
            Value::from(1),
            Value::from(2.5),
            Value::from("x"),
            Value::from(true),
            Value::Null,
        ]);
        anyhow::ensure!(value.lookup("a") == Some(&expected), "{value:?}");
        anyhow::ensure!(
            value.lookup("b.c") == Some(&Value::Scalar(Scalar::Unsigned(u64::MAX))),
            "unsigned integers keep their full range"
        );
        Ok(())
    }

    fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ]
    }

    fn arb_tree() -> impl Strategy<Value = Value> {
        arb_scalar().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Sequence),
                prop::collection::btree_map("[a-c]", inner, 0..4).prop_map(Value::Mapping),
            ]
        })
    }

    fn scalar_paths(value: &Value, prefix: &str, out: &mut Vec<(String, Value)>) {
        match value {
            Value::Mapping(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    scalar_paths(child, &path, out);
                }
            }
            Value::Null => {}
            other if !prefix.is_empty() => out.push((prefix.to_owned(), other.clone())),
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn merging_twice_equals_merging_once(base in arb_tree(), layer in arb_tree()) {
            let mut once = base.clone();
            once.merge(layer.clone());
            let mut twice = once.clone();
            twice.merge(layer);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn later_documents_win(
            a in prop::collection::btree_map("[a-c]", arb_tree(), 0..4),
            b in prop::collection::btree_map("[a-c]", arb_tree(), 0..4),
        ) {
            let mut merged = Value::Mapping(a.clone());
            merged.merge(Value::Mapping(b.clone()));

            let mut from_b = Vec::new();
            scalar_paths(&Value::Mapping(b.clone()), "", &mut from_b);
            for (path, value) in &from_b {
                prop_assert_eq!(merged.lookup(path), Some(value));
            }

            if let Value::Mapping(out) = &merged {
                for (key, value) in &a {
                    if !b.contains_key(key) {
                        prop_assert_eq!(out.get(key), Some(value));
                    }
                }
            }
        }
    }
}

//! Frontmatter types and data structures.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_yaml::Value;

/// A single frontmatter value.
///
/// Frontmatter has no fixed schema, so values are kept as a small closed set of
/// variants rather than raw YAML. Maps keep their key order.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Borrow the value as a string slice if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }

    /// Convert back to a YAML value for write-back.
    pub fn to_yaml(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::Number((*i).into()),
            Self::Float(f) => Value::Number((*f).into()),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::Sequence(items.iter().map(Self::to_yaml).collect()),
            Self::Map(entries) => Value::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| (Value::String(k.clone()), v.to_yaml()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if n.is_u64() {
                    // Out of i64 range; keep the digits exactly.
                    Self::String(n.to_string())
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Map(
                map.into_iter().map(|(k, v)| (key_to_string(k), Self::from(v))).collect(),
            ),
            Value::Tagged(tagged) => {
                let tagged = *tagged;
                let inner = Self::from(tagged.value);
                Self::String(format!("{} {}", tagged.tag, inner))
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Render a YAML mapping key as a plain string.
fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => FieldValue::from(other).to_string(),
    }
}

/// The string representation used for predicate matching, grouping and
/// human-facing output.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            // JSON has no NaN/inf
            Self::Float(x) => serializer.serialize_str(&x.to_string()),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => serialize_entries(entries, serializer),
        }
    }
}

fn serialize_entries<S: Serializer>(
    entries: &[(String, FieldValue)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (k, v) in entries {
        map.serialize_entry(k, v)?;
    }
    map.end()
}

/// Parsed YAML frontmatter of a note, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: Vec<(String, FieldValue)>,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Set a field. An existing key keeps its position; a new key is appended.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Convert to an ordered YAML mapping for serialization.
    pub fn to_yaml_mapping(&self) -> serde_yaml::Mapping {
        self.fields.iter().map(|(k, v)| (Value::String(k.clone()), v.to_yaml())).collect()
    }
}

impl From<serde_yaml::Mapping> for Frontmatter {
    fn from(map: serde_yaml::Mapping) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (key_to_string(k), FieldValue::from(v)))
                .collect(),
        }
    }
}

impl FromIterator<(String, FieldValue)> for Frontmatter {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        let mut fm = Self::default();
        for (k, v) in iter {
            fm.insert(k, v);
        }
        fm
    }
}

impl Serialize for Frontmatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_entries(&self.fields, serializer)
    }
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Parsed frontmatter (if a delimited block is present).
    pub frontmatter: Option<Frontmatter>,
    /// The markdown body (everything after frontmatter).
    pub body: String,
}

impl ParsedDocument {
    /// Metadata of the document; an absent block reads as empty.
    pub fn metadata(&self) -> Frontmatter {
        self.frontmatter.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_string_representation_rules() {
        assert_eq!(FieldValue::String("active".into()).to_string(), "active");
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        assert_eq!(FieldValue::Integer(42).to_string(), "42");
        assert_eq!(FieldValue::Float(1.0).to_string(), "1.0");
        assert_eq!(FieldValue::Float(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::Null.to_string(), "null");
        let list = FieldValue::List(vec!["rust".into(), "cli".into()]);
        assert_eq!(list.to_string(), "[rust, cli]");
        let map = FieldValue::Map(vec![("a".into(), FieldValue::Integer(1))]);
        assert_eq!(map.to_string(), "{a: 1}");
    }

    #[test]
    fn insert_keeps_position_of_existing_key() {
        let mut fm = Frontmatter::new();
        fm.insert("title", "One".into());
        fm.insert("status", "draft".into());
        let old = fm.insert("title", "Two".into());

        assert_eq!(old, Some(FieldValue::String("One".into())));
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["title", "status"]);
        assert_eq!(fm.get("title").and_then(FieldValue::as_str), Some("Two"));
    }

    #[test]
    fn yaml_conversion_stringifies_tags_and_large_integers() {
        let value: Value = serde_yaml::from_str("!custom thing").unwrap();
        assert_eq!(FieldValue::from(value), FieldValue::String("!custom thing".into()));

        let value: Value = serde_yaml::from_str("18446744073709551615").unwrap();
        assert_eq!(
            FieldValue::from(value),
            FieldValue::String("18446744073709551615".into())
        );
    }

    #[test]
    fn serializes_to_natural_json() {
        let fm: Frontmatter = [
            ("title".to_string(), FieldValue::from("Hello")),
            ("count".to_string(), FieldValue::Integer(3)),
            ("tags".to_string(), FieldValue::List(vec!["a".into()])),
            ("done".to_string(), FieldValue::Bool(false)),
            ("empty".to_string(), FieldValue::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&fm).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Hello","count":3,"tags":["a"],"done":false,"empty":null}"#
        );
    }
}

//! Resolved document tree

use crate::domain::schema::Record;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::Number;
use std::fmt;

/// A value in a resolved document.
///
/// Produced by the resolver once every custom tag has been applied; it never
/// contains unresolved tags.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    Record(Record),
}

impl Node {
    /// View this node as a key-value item.
    ///
    /// Records are viewed through their field mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            Node::Record(record) => Some(record.fields()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Look up a key on a mapping or record
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }
}

/// String form used when a value is substituted into a template:
/// null is empty, sequences are joined with ", ".
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => Ok(()),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Number(n) => write!(f, "{}", n),
            Node::String(s) => f.write_str(s),
            Node::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Node::Mapping(mapping) => write!(f, "{}", mapping),
            Node::Record(record) => write!(f, "{}", record.fields()),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(Number::from(value))
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Node::Sequence(value)
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Node::Mapping(value)
    }
}

impl From<Record> for Node {
    fn from(value: Record) -> Self {
        Node::Record(value)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(mapping) => mapping.serialize(serializer),
            Node::Record(record) => record.fields().serialize(serializer),
        }
    }
}

/// String-keyed mapping that keeps document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Mapping {
            entries: Vec::new(),
        }
    }

    /// Insert a value, replacing (in place) any existing value for the key
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stringify_null_is_empty() {
        assert_eq!(Node::Null.to_string(), "");
    }

    #[test]
    fn test_stringify_sequence_joins_with_comma() {
        let node = Node::Sequence(vec!["Rust".into(), "Go".into(), Node::from(3i64)]);
        assert_eq!(node.to_string(), "Rust, Go, 3");
    }

    #[test]
    fn test_stringify_scalars() {
        assert_eq!(Node::from("text").to_string(), "text");
        assert_eq!(Node::from(true).to_string(), "true");
        assert_eq!(Node::Number(Number::from(2.5)).to_string(), "2.5");
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let mut mapping = Mapping::new();
        mapping.insert("b", "2".into());
        mapping.insert("a", "1".into());
        mapping.insert("b", "3".into());

        let keys: Vec<&str> = mapping.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(mapping.get("b"), Some(&Node::from("3")));
        assert_eq!(Node::Mapping(mapping).to_string(), "{b: 3, a: 1}");
    }

    #[test]
    fn test_mapping_remove() {
        let mut mapping: Mapping = [("title", Node::from("A"))].into_iter().collect();
        assert_eq!(mapping.remove("title"), Some(Node::from("A")));
        assert!(mapping.is_empty());
        assert_eq!(mapping.remove("title"), None);
    }
}

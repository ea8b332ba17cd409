//! Document tree produced by the reducer.
//!
//! A document is a [`Mapping`] whose values are either [`Scalar`]s or nested
//! mappings. Sequence items are stored as entries with synthetic keys (`-0`,
//! `-1`, ...) so their source order survives in the key order.

use ahash::AHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::Error;
use crate::location::Location;
use crate::options::DuplicateKeyPolicy;

/// Marker that introduces a sequence item, and the prefix of synthetic item keys.
pub const SEQUENCE_MARKER: &str = "-";

/// Synthetic key of the `counter`-th sequence item of one mapping level.
pub(crate) fn synthetic_key(counter: usize) -> String {
    format!("{SEQUENCE_MARKER}{counter}")
}

/// True if `key` was synthesized for a sequence item.
pub fn is_synthetic_key(key: &str) -> bool {
    key.strip_prefix(SEQUENCE_MARKER)
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Leaf value: the raw trimmed text after the colon or sequence marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scalar {
    pub value: String,
    pub location: Location,
}

/// One node of the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Scalar(Scalar),
    Mapping(Mapping),
}

impl Node {
    pub fn location(&self) -> Location {
        match self {
            Node::Scalar(scalar) => scalar.location,
            Node::Mapping(mapping) => mapping.location,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(scalar) => Some(&scalar.value),
            Node::Mapping(_) => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            Node::Scalar(_) => None,
        }
    }
}

/// Key/value pair of a [`Mapping`], with the location of the line that introduced the key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub location: Location,
    pub value: Node,
}

/// Ordered mapping with unique keys.
#[derive(Clone, Debug, Default)]
pub struct Mapping {
    entries: Vec<Entry>,
    index: AHashMap<String, usize>,
    location: Location,
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Mapping {}

impl Mapping {
    /// Empty mapping whose first line is at `location`.
    pub fn new(location: Location) -> Self {
        Self {
            entries: Vec::new(),
            index: AHashMap::new(),
            location,
        }
    }

    /// Insert an entry, resolving a repeated key according to `policy`.
    pub(crate) fn insert(
        &mut self,
        key: String,
        location: Location,
        value: Node,
        policy: DuplicateKeyPolicy,
    ) -> Result<(), Error> {
        if let Some(&at) = self.index.get(&key) {
            return match policy {
                DuplicateKeyPolicy::LastWins => {
                    self.entries[at].value = value;
                    Ok(())
                }
                DuplicateKeyPolicy::FirstWins => Ok(()),
                DuplicateKeyPolicy::Error => Err(Error::malformed(
                    format!("duplicate key `{key}`"),
                    location,
                )),
            };
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry {
            key,
            location,
            value,
        });
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|&at| &self.entries[at].value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Location of the first line of this mapping.
    pub fn location(&self) -> Location {
        self.location
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    /// Values in insertion order, which is source order.
    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().map(|entry| &entry.value)
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(scalar) => serializer.serialize_str(&scalar.value),
            Node::Mapping(mapping) => mapping.serialize(serializer),
        }
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key, &entry.value)?;
        }
        map.end()
    }
}

//! Field-equality filtering over listing snapshots.

use std::collections::BTreeMap;

use serde::Serialize;

/// A single decoded cell of a listing row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_string())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Number(value)
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Field::Flag(value)
    }
}

/// One row of a listing: field name to value
pub type Record = BTreeMap<String, Field>;

/// Rows of a listing in source order, each keyed by its natural identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSet<K = String> {
    rows: Vec<(K, Record)>,
}

impl<K> RecordSet<K> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn push(&mut self, key: K, record: Record) {
        self.rows.push((key, record));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Record)> {
        self.rows.iter().map(|(key, record)| (key, record))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|(key, _)| key)
    }

    pub fn get(&self, key: &K) -> Option<&Record>
    where
        K: PartialEq,
    {
        self.rows.iter().find(|(k, _)| k == key).map(|(_, record)| record)
    }

    /// Keep only the rows matching `predicate`, preserving order
    pub fn filter(self, predicate: &Predicate) -> Self {
        filter(self, predicate)
    }
}

impl<K> Default for RecordSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> FromIterator<(K, Record)> for RecordSet<K> {
    fn from_iter<I: IntoIterator<Item = (K, Record)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<K> IntoIterator for RecordSet<K> {
    type Item = (K, Record);
    type IntoIter = std::vec::IntoIter<(K, Record)>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Expected field values; fields not mentioned are unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    fields: BTreeMap<String, Field>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Field>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A record matches when it carries every constrained field with an equal value
    pub fn matches(&self, record: &Record) -> bool {
        self.fields
            .iter()
            .all(|(name, expected)| record.get(name) == Some(expected))
    }
}

/// Narrow `records` to those matching `predicate`
pub fn filter<K>(records: RecordSet<K>, predicate: &Predicate) -> RecordSet<K> {
    if predicate.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|(_, record)| predicate.matches(record))
        .collect()
}

use std::collections::HashMap;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

/// A record that can live in a [`Collection`].
pub trait Record: Clone {
    type Id: Clone + Eq + Hash + std::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

/// Ordered records with an id index.
///
/// Persisted as a plain JSON array in insertion order. Lookups by id are
/// constant time; removal shifts the tail and re-indexes it.
#[derive(Debug, Clone)]
pub struct Collection<R: Record> {
    records: Vec<R>,
    index: HashMap<R::Id, usize>,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored records. A repeated id keeps the first occurrence.
    pub fn from_records(records: Vec<R>) -> Self {
        let mut collection = Self::new();
        for record in records {
            if collection.contains(record.id()) {
                warn!(id = ?record.id(), "Dropping record with duplicate id");
                continue;
            }
            collection.push(record);
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &R::Id) -> Option<&R> {
        self.index.get(id).and_then(|&i| self.records.get(i))
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    /// Append a record. Returns false (and changes nothing) if the id is taken.
    pub fn push(&mut self, record: R) -> bool {
        if self.index.contains_key(record.id()) {
            return false;
        }
        self.index.insert(record.id().clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Replace the record with the same id in place, returning the old one.
    pub fn replace(&mut self, record: R) -> Option<R> {
        let slot = self.index.get(record.id()).copied()?;
        let current = self.records.get_mut(slot)?;
        Some(std::mem::replace(current, record))
    }

    /// Mutate the record with `id` in place. Returns false when absent.
    pub fn update<F>(&mut self, id: &R::Id, f: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        let Some(&slot) = self.index.get(id) else {
            return false;
        };
        match self.records.get_mut(slot) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &R::Id) -> Option<R> {
        let slot = self.index.remove(id)?;
        let removed = self.records.remove(slot);
        for (i, record) in self.records.iter().enumerate().skip(slot) {
            self.index.insert(record.id().clone(), i);
        }
        Some(removed)
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R: Record> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}

impl<'a, R: Record> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<R: Record + Serialize> Serialize for Collection<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.records)
    }
}

impl<'de, R: Record + DeserializeOwned> Deserialize<'de> for Collection<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<R>::deserialize(deserializer)?;
        Ok(Self::from_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u32,
        label: String,
    }

    impl Record for Row {
        type Id = u32;
        fn id(&self) -> &u32 {
            &self.id
        }
    }

    fn row(id: u32, label: &str) -> Row {
        Row { id, label: label.to_string() }
    }

    #[test]
    fn test_push_rejects_duplicate_ids() {
        let mut rows = Collection::new();
        assert!(rows.push(row(1, "a")));
        assert!(!rows.push(row(1, "b")));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.get(&1).unwrap().label, "a");
    }

    #[test]
    fn test_remove_keeps_order_and_index() {
        let mut rows: Collection<Row> = vec![row(1, "a"), row(2, "b"), row(3, "c")]
            .into_iter()
            .collect();
        assert_eq!(rows.remove(&2).unwrap().label, "b");
        assert_eq!(rows.get(&3).unwrap().label, "c");
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c"]);
        assert!(rows.remove(&2).is_none());
    }

    #[test]
    fn test_replace_and_update_ignore_unknown_ids() {
        let mut rows = Collection::from_records(vec![row(1, "a")]);
        assert!(rows.replace(row(9, "x")).is_none());
        assert!(!rows.update(&9, |r| r.label.push('!')));

        assert_eq!(rows.replace(row(1, "z")).unwrap().label, "a");
        assert!(rows.update(&1, |r| r.label.push('!')));
        assert_eq!(rows.get(&1).unwrap().label, "z!");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let rows = Collection::from_records(vec![row(2, "b"), row(1, "a")]);
        let json = serde_json::to_string(&rows).unwrap();
        assert_eq!(json, r#"[{"id":2,"label":"b"},{"id":1,"label":"a"}]"#);

        let back: Collection<Row> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_slice(), rows.as_slice());
    }
}

//! Caseless string-keyed maps.

use fdn_ir::{combine_unordered, HashCode, HashStream};
use rustc_hash::FxHashMap;

use crate::Value;

fn fold(key: &str) -> String {
    key.to_lowercase()
}

/// A map from strings to values.
///
/// Keys compare ignoring case and keep the spelling they were first
/// inserted with. Iteration follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct ArrayValue {
    entries: Vec<(Box<str>, Value)>,
    index: FxHashMap<String, usize>,
}

impl ArrayValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ArrayValue {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert or replace. Returns the previous value for the key.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        let folded = fold(key);
        if let Some(&slot) = self.index.get(&folded) {
            return Some(std::mem::replace(&mut self.entries[slot].1, value));
        }
        self.index.insert(folded, self.entries.len());
        self.entries.push((key.into(), value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index
            .get(&fold(key))
            .map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&fold(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let slot = self.index.remove(&fold(key))?;
        let (_, value) = self.entries.remove(slot);
        for position in self.index.values_mut() {
            if *position > slot {
                *position -= 1;
            }
        }
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, with their original key spelling.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (&**key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| &**key)
    }

    /// Same keys (ignoring case) mapped to equal values, in any order.
    pub fn equals(&self, other: &ArrayValue) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|theirs| value.equals(theirs)))
    }

    pub fn hash_code(&self) -> HashCode {
        self.entries.iter().fold(0, |acc, (key, value)| {
            let entry = HashStream::new()
                .bytes(fold(key).as_bytes())
                .hash(value.hash_code())
                .finish();
            combine_unordered(acc, entry)
        })
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for ArrayValue {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut array = ArrayValue::new();
        for (key, value) in iter {
            array.insert(key.as_ref(), value);
        }
        array
    }
}

#[cfg(test)]
mod tests;

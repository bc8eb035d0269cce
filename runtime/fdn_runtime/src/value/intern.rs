//! Content interning of values.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::Value;

/// Canonicalizes values so that equal content shares one allocation.
///
/// Strings, names, numbers, data, arrays, sets and lists are interned.
/// Records, foreign, custom and error values have per-instance identity
/// and pass through unchanged.
#[derive(Default)]
pub struct ValueTable {
    buckets: FxHashMap<u64, SmallVec<[Value; 1]>>,
    len: usize,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical value equal to `value`, registering it if new.
    pub fn intern(&mut self, value: Value) -> Value {
        if !value.kind().is_internable() {
            return value;
        }
        let bucket = self.buckets.entry(value.hash_code()).or_default();
        if let Some(existing) = bucket.iter().find(|existing| existing.equals(&value)) {
            return existing.clone();
        }
        bucket.push(value.clone());
        self.len += 1;
        value
    }

    /// The canonical value equal to `value`, without registering it.
    pub fn get(&self, value: &Value) -> Option<&Value> {
        self.buckets
            .get(&value.hash_code())?
            .iter()
            .find(|existing| existing.equals(value))
    }

    /// Number of distinct interned values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop entries nothing outside the table references.
    pub fn purge(&mut self) {
        let mut removed = 0;
        for bucket in self.buckets.values_mut() {
            let before = bucket.len();
            bucket.retain(|value| value.ref_count() > 1 || !value_is_boxed(value));
            removed += before - bucket.len();
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
        self.len -= removed;
    }
}

fn value_is_boxed(value: &Value) -> bool {
    !matches!(
        value,
        Value::Null | Value::Boolean(_) | Value::Number(_) | Value::Name(_)
    )
}

impl std::fmt::Debug for ValueTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueTable").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod tests;

//! Caseless name table.
//!
//! Spellings are interned exactly, so `lookup` returns what the caller
//! wrote. Every entry also records its *folded* representative: the name
//! of its lowercase spelling. Identity-by-name throughout the runtime
//! (named types, record fields, array keys) compares folded names.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

struct NameStorage {
    /// Exact spelling to name.
    map: FxHashMap<&'static str, Name>,
    /// Spellings, indexed by name.
    strings: Vec<&'static str>,
    /// Folded representative, indexed by name.
    folded: Vec<Name>,
}

impl NameStorage {
    fn with_empty() -> Self {
        let mut storage = Self {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
            folded: Vec::with_capacity(256),
        };
        storage.map.insert("", Name::EMPTY);
        storage.strings.push("");
        storage.folded.push(Name::EMPTY);
        storage
    }

    fn push(&mut self, spelling: &'static str, folded: Option<Name>) -> Name {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "a table never approaches u32::MAX names"
        )]
        let name = Name::from_raw(self.strings.len() as u32);
        self.strings.push(spelling);
        self.folded.push(folded.unwrap_or(name));
        self.map.insert(spelling, name);
        name
    }

    fn intern(&mut self, s: &str) -> Name {
        if let Some(&name) = self.map.get(s) {
            return name;
        }

        let lower = s.to_lowercase();
        let folded = if lower == s {
            None
        } else if let Some(&existing) = self.map.get(lower.as_str()) {
            Some(self.folded[existing.index()])
        } else {
            let leaked: &'static str = Box::leak(lower.into_boxed_str());
            Some(self.push(leaked, None))
        };

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        self.push(leaked, folded)
    }
}

/// Interner for identifiers with caseless comparison.
///
/// Strings are leaked and live for the rest of the process; tables are
/// expected to be long-lived (one per registry).
pub struct NameTable {
    storage: RwLock<NameStorage>,
}

impl NameTable {
    /// Create a table holding only the empty name.
    pub fn new() -> Self {
        NameTable {
            storage: RwLock::new(NameStorage::with_empty()),
        }
    }

    /// Intern a spelling, returning its name.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&name) = self.storage.read().map.get(s) {
            return name;
        }
        self.storage.write().intern(s)
    }

    /// Look up the spelling of a name.
    pub fn lookup(&self, name: Name) -> &'static str {
        self.storage.read().strings[name.index()]
    }

    /// The caseless representative of `name`.
    ///
    /// `fold(a) == fold(b)` iff the two spellings differ only in case.
    pub fn fold(&self, name: Name) -> Name {
        self.storage.read().folded[name.index()]
    }

    /// Compare two names ignoring case.
    pub fn caseless_eq(&self, a: Name, b: Name) -> bool {
        a == b || self.fold(a) == self.fold(b)
    }

    /// Find an already-interned name with the given spelling, ignoring case.
    ///
    /// Never interns; returns the folded representative.
    pub fn find_caseless(&self, s: &str) -> Option<Name> {
        let storage = self.storage.read();
        if let Some(&name) = storage.map.get(s) {
            return Some(storage.folded[name.index()]);
        }
        let lower = s.to_lowercase();
        storage
            .map
            .get(lower.as_str())
            .map(|&name| storage.folded[name.index()])
    }

    /// Number of interned spellings, including the empty name.
    pub fn len(&self) -> usize {
        self.storage.read().strings.len()
    }

    /// Check if the table holds only the empty name.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NameTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameTable")
            .field("len", &self.len())
            .finish()
    }
}

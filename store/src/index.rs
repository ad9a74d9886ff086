//! Indexes for marker lookups.

use std::collections::{BTreeSet, HashMap};

use mark_core::MarkerKey;

/// Kind index: kind -> Set<MarkerKey>
#[derive(Debug, Default)]
pub struct KindIndex {
    index: HashMap<String, BTreeSet<MarkerKey>>,
}

impl KindIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: &str, key: MarkerKey) {
        self.index.entry(kind.to_string()).or_default().insert(key);
    }

    pub fn remove(&mut self, kind: &str, key: &MarkerKey) {
        if let Some(set) = self.index.get_mut(kind) {
            set.remove(key);
            if set.is_empty() {
                self.index.remove(kind);
            }
        }
    }

    pub fn get<'a>(&'a self, kind: &str) -> impl Iterator<Item = &'a MarkerKey> + 'a {
        self.index.get(kind).into_iter().flat_map(|set| set.iter())
    }
}

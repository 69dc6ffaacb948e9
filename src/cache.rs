//! In-memory store of fetched icon markup.

use std::collections::HashMap;

/// Icon markup keyed by icon name.
///
/// Entries are written once and never evicted. Names are remembered in the
/// order they were first stored.
#[derive(Debug, Clone, Default)]
pub struct IconCache {
    entries: HashMap<String, String>,
    order: Vec<String>,
}

impl IconCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the markup stored for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Returns true if `name` has been stored.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Stores `markup` under `name` unless an entry already exists.
    ///
    /// Returns the markup now held for `name`, which is the earlier entry when
    /// one was present.
    pub fn insert(&mut self, name: &str, markup: String) -> &str {
        if !self.entries.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.entries.entry(name.to_string()).or_insert(markup)
    }

    /// Names of cached icons, in first-stored order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

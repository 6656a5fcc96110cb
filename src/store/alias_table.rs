//! Persisted alias/pattern table
//!
//! JSON shape, keyed by canonical key:
//!
//! ```json
//! {
//!   "verisure": { "aliases": ["verisure"], "patterns": ["verisur"] },
//!   "FOSTER FAST FOOD": { "aliases": ["foster"], "patterns": ["fosterfastfood"] }
//! }
//! ```
//!
//! Keys are compared in compact normalized form, so `"FOSTER FAST FOOD"`,
//! `"fosterfastfood"` and `"Foster Fast Food SA"` all address the same
//! entity.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entity_linking::normalize::compact;
use crate::entity_linking::CanonicalEntity;
use crate::error::StoreError;

/// Aliases and patterns of one canonical entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasEntry {
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Alias table keyed by compact canonical key
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, AliasEntry>,
}

impl AliasTable {
    /// Load from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::load_from_str(&content).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from a JSON string
    pub fn load_from_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, AliasEntry> = serde_json::from_str(json)?;
        let mut table = Self::default();
        for (key, entry) in raw {
            table.insert(&key, entry);
        }
        Ok(table)
    }

    /// Insert an entry, merging with any entry under the same canonical key
    pub fn insert(&mut self, key: &str, entry: AliasEntry) {
        let key = compact(key);
        if key.is_empty() {
            tracing::warn!("Ignoring alias entry with an empty canonical key");
            return;
        }
        let existing = self.entries.entry(key).or_default();
        existing.aliases.extend(entry.aliases);
        existing.patterns.extend(entry.patterns);
    }

    pub fn get(&self, key: &str) -> Option<&AliasEntry> {
        self.entries.get(&compact(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attach aliases and patterns to the entities whose canonical name
    /// matches an entry's key. Returns the keys that were used.
    pub fn apply(&self, entities: &mut [CanonicalEntity]) -> BTreeSet<String> {
        let mut by_key: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, entity) in entities.iter().enumerate() {
            by_key
                .entry(compact(&entity.canonical_name))
                .or_default()
                .push(index);
        }

        let mut used = BTreeSet::new();
        for (key, entry) in &self.entries {
            let Some(indexes) = by_key.get(key) else {
                continue;
            };
            for &index in indexes {
                let entity = &mut entities[index];
                for alias in &entry.aliases {
                    entity.add_alias(alias.as_str());
                }
                for pattern in &entry.patterns {
                    entity.add_pattern(pattern.as_str());
                }
            }
            used.insert(key.clone());
        }
        used
    }

    /// Keys not present in `used`
    pub fn orphans<'a>(&'a self, used: &'a BTreeSet<String>) -> impl Iterator<Item = &'a str> {
        self.entries
            .keys()
            .filter(move |key| !used.contains(*key))
            .map(|key| key.as_str())
    }
}

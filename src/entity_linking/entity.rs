//! Canonical supplier and employee records

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row id owned by the external entity store
pub type EntityId = i64;

/// Which reference set an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Supplier,
    Employee,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::Supplier, EntityKind::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Supplier => "supplier",
            EntityKind::Employee => "employee",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One real-world supplier or employee.
///
/// `aliases` are matched by normalized equality, `patterns` by compact
/// substring containment. Both may be empty, in which case only the
/// canonical name is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Display name (original casing), never empty
    pub canonical_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl CanonicalEntity {
    pub fn new(id: EntityId, kind: EntityKind, canonical_name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            canonical_name: canonical_name.into(),
            aliases: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            self.add_alias(alias);
        }
        self
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.add_pattern(pattern);
        }
        self
    }

    /// Add an alias unless an equal one (ignoring case) is already present
    pub fn add_alias(&mut self, alias: impl Into<String>) -> bool {
        push_unique(&mut self.aliases, alias.into())
    }

    /// Add a pattern unless an equal one (ignoring case) is already present
    pub fn add_pattern(&mut self, pattern: impl Into<String>) -> bool {
        push_unique(&mut self.patterns, pattern.into())
    }

    pub fn has_dictionary_entries(&self) -> bool {
        !self.aliases.is_empty() || !self.patterns.is_empty()
    }
}

fn push_unique(values: &mut Vec<String>, value: String) -> bool {
    let value = value.trim().to_string();
    if value.is_empty() {
        return false;
    }
    let lowered = value.to_lowercase();
    if values.iter().any(|v| v.to_lowercase() == lowered) {
        return false;
    }
    values.push(value);
    true
}

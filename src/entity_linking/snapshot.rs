//! Entity snapshot for in-memory resolution
//!
//! The `EntitySnapshot` is the immutable set of suppliers and employees the
//! resolver runs against. It is built by the entity store from roster rows
//! and the alias table, and carries a content hash so callers can tell when
//! a reload actually changed anything.

use serde::{Deserialize, Serialize};

use super::entity::{CanonicalEntity, EntityId, EntityKind};

/// Snapshot format version - increment when struct layout changes
pub const SNAPSHOT_VERSION: u32 = 1;

/// Immutable entity reference sets, one per kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Format version
    pub version: u32,

    /// Content-based hash for change detection
    pub hash: String,

    pub suppliers: Vec<CanonicalEntity>,

    pub employees: Vec<CanonicalEntity>,
}

impl EntitySnapshot {
    pub fn new(suppliers: Vec<CanonicalEntity>, employees: Vec<CanonicalEntity>) -> Self {
        let hash = content_hash(&suppliers, &employees);
        Self {
            version: SNAPSHOT_VERSION,
            hash,
            suppliers,
            employees,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Entities of one kind, in store order
    pub fn entities(&self, kind: EntityKind) -> &[CanonicalEntity] {
        match kind {
            EntityKind::Supplier => &self.suppliers,
            EntityKind::Employee => &self.employees,
        }
    }

    /// Get entity by kind and ID
    pub fn get(&self, kind: EntityKind, id: EntityId) -> Option<&CanonicalEntity> {
        self.entities(kind).iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.suppliers.len() + self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statistics for debugging
    pub fn stats(&self) -> SnapshotStats {
        let all = || self.suppliers.iter().chain(self.employees.iter());
        SnapshotStats {
            version: self.version,
            hash: self.hash.clone(),
            supplier_count: self.suppliers.len(),
            employee_count: self.employees.len(),
            alias_count: all().map(|e| e.aliases.len()).sum(),
            pattern_count: all().map(|e| e.patterns.len()).sum(),
            entities_without_dictionary: all().filter(|e| !e.has_dictionary_entries()).count(),
        }
    }
}

fn content_hash(suppliers: &[CanonicalEntity], employees: &[CanonicalEntity]) -> String {
    let mut hasher = blake3::Hasher::new();
    for entity in suppliers.iter().chain(employees.iter()) {
        hasher.update(entity.kind.as_str().as_bytes());
        hasher.update(&entity.id.to_le_bytes());
        hasher.update(entity.canonical_name.as_bytes());
        hasher.update(&[0]);
        for value in entity.aliases.iter().chain(entity.patterns.iter()) {
            hasher.update(value.as_bytes());
            hasher.update(&[0]);
        }
        // separates aliases from the next entity
        hasher.update(&[1]);
    }
    hasher.finalize().to_hex().to_string()
}

/// Snapshot statistics
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotStats {
    pub version: u32,
    pub hash: String,
    pub supplier_count: usize,
    pub employee_count: usize,
    pub alias_count: usize,
    pub pattern_count: usize,
    pub entities_without_dictionary: usize,
}

impl std::fmt::Display for SnapshotStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Entity Snapshot Statistics:")?;
        writeln!(f, "  Version: {}", self.version)?;
        writeln!(f, "  Hash: {}", self.hash.get(..16).unwrap_or(&self.hash))?;
        writeln!(f, "  Suppliers: {}", self.supplier_count)?;
        writeln!(f, "  Employees: {}", self.employee_count)?;
        writeln!(f, "  Aliases: {}", self.alias_count)?;
        writeln!(f, "  Patterns: {}", self.pattern_count)?;
        writeln!(
            f,
            "  Entities without aliases or patterns: {}",
            self.entities_without_dictionary
        )?;
        Ok(())
    }
}

//! Entity row sources
//!
//! The resolver never queries storage itself; an `EntitySource` hands the
//! store the raw supplier and employee rows on every (re)load.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::entity_linking::{EntityId, EntityKind};
use crate::error::StoreError;

/// A single row as held by the external store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRow {
    pub id: EntityId,
    pub name: String,
}

impl EntityRow {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Supplier and employee rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub suppliers: Vec<EntityRow>,
    #[serde(default)]
    pub employees: Vec<EntityRow>,
}

impl Roster {
    pub fn rows(&self, kind: EntityKind) -> &[EntityRow] {
        match kind {
            EntityKind::Supplier => &self.suppliers,
            EntityKind::Employee => &self.employees,
        }
    }

    pub fn rows_mut(&mut self, kind: EntityKind) -> &mut Vec<EntityRow> {
        match kind {
            EntityKind::Supplier => &mut self.suppliers,
            EntityKind::Employee => &mut self.employees,
        }
    }
}

/// Where entity rows come from
pub trait EntitySource: Send + Sync {
    /// Load suppliers and employees together, from one consistent read
    fn load_roster(&self) -> Result<Roster, StoreError>;

    /// Load all rows of one kind, in display order
    fn load_rows(&self, kind: EntityKind) -> Result<Vec<EntityRow>, StoreError> {
        let mut roster = self.load_roster()?;
        Ok(std::mem::take(roster.rows_mut(kind)))
    }

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Shared sources, so callers can keep a handle for `set_rows` and the like
impl<T: EntitySource + ?Sized> EntitySource for Arc<T> {
    fn load_roster(&self) -> Result<Roster, StoreError> {
        (**self).load_roster()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// JSON roster file, re-read on every load
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Roster, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl EntitySource for RosterFile {
    fn load_roster(&self) -> Result<Roster, StoreError> {
        self.read()
    }

    fn describe(&self) -> String {
        format!("roster file {}", self.path.display())
    }
}

/// In-memory rows, replaceable at runtime (embedding and tests)
#[derive(Debug, Default)]
pub struct InMemorySource {
    roster: RwLock<Roster>,
}

impl InMemorySource {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster: RwLock::new(roster),
        }
    }

    /// Replace the rows of one kind; takes effect on the next store reload
    pub fn set_rows(&self, kind: EntityKind, rows: Vec<EntityRow>) -> Result<(), StoreError> {
        let mut roster = self.roster.write().map_err(|_| StoreError::Poisoned)?;
        *roster.rows_mut(kind) = rows;
        Ok(())
    }
}

impl EntitySource for InMemorySource {
    fn load_roster(&self) -> Result<Roster, StoreError> {
        let roster = self.roster.read().map_err(|_| StoreError::Poisoned)?;
        Ok(roster.clone())
    }

    fn load_rows(&self, kind: EntityKind) -> Result<Vec<EntityRow>, StoreError> {
        let roster = self.roster.read().map_err(|_| StoreError::Poisoned)?;
        Ok(roster.rows(kind).to_vec())
    }

    fn describe(&self) -> String {
        "in-memory roster".to_string()
    }
}

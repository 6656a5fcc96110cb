//! Entity Store
//!
//! Owns the lifecycle of the entity reference sets: loads roster rows from
//! an [`EntitySource`], attaches the alias table, and publishes an immutable
//! [`EntitySnapshot`]. Constructed once at process start and refreshed only
//! through an explicit [`EntityStore::reload`].
//!
//! ```text
//! EntitySource ──┐
//!                ├─► build ──► Arc<EntitySnapshot> ──► Resolver (per call)
//! aliases.json ──┘
//! ```

pub mod alias_table;
pub mod source;

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub use alias_table::{AliasEntry, AliasTable};
pub use source::{EntityRow, EntitySource, InMemorySource, Roster, RosterFile};

use crate::config::ResolverSettings;
use crate::entity_linking::{CanonicalEntity, EntityKind, EntitySnapshot};
use crate::error::StoreError;

/// Holder of the current entity snapshot
pub struct EntityStore {
    source: Box<dyn EntitySource>,
    aliases_path: Option<PathBuf>,
    current: RwLock<Arc<EntitySnapshot>>,
}

impl EntityStore {
    /// Build the first snapshot; fails if the source or alias file is unusable
    pub fn open(
        source: impl EntitySource + 'static,
        aliases_path: Option<PathBuf>,
    ) -> Result<Self, StoreError> {
        let source: Box<dyn EntitySource> = Box::new(source);
        let snapshot = build_snapshot(source.as_ref(), aliases_path.as_deref())?;
        Ok(Self {
            source,
            aliases_path,
            current: RwLock::new(Arc::new(snapshot)),
        })
    }

    /// Store backed by the roster and alias files named in the settings
    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, StoreError> {
        Self::open(
            RosterFile::new(&settings.roster_path),
            settings.aliases_path.clone(),
        )
    }

    /// Current snapshot; stays valid for the caller across reloads
    pub fn snapshot(&self) -> Result<Arc<EntitySnapshot>, StoreError> {
        let current = self.current.read().map_err(|_| StoreError::Poisoned)?;
        Ok(Arc::clone(&current))
    }

    /// Rebuild from the source and alias file.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn reload(&self) -> Result<Arc<EntitySnapshot>, StoreError> {
        let snapshot = match build_snapshot(self.source.as_ref(), self.aliases_path.as_deref()) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Entity reload failed, keeping previous snapshot");
                return Err(e);
            }
        };

        let mut current = self.current.write().map_err(|_| StoreError::Poisoned)?;
        if current.hash == snapshot.hash {
            tracing::debug!("Entity reload produced an identical snapshot");
        }
        *current = Arc::clone(&snapshot);
        Ok(snapshot)
    }
}

fn build_snapshot(
    source: &dyn EntitySource,
    aliases_path: Option<&std::path::Path>,
) -> Result<EntitySnapshot, StoreError> {
    let aliases = match aliases_path {
        Some(path) => AliasTable::load_from_file(path)?,
        None => AliasTable::default(),
    };

    let mut roster = source.load_roster()?;
    let mut used = BTreeSet::new();
    let mut load = |kind: EntityKind| -> Result<Vec<CanonicalEntity>, StoreError> {
        let rows = std::mem::take(roster.rows_mut(kind));
        let mut entities = entities_from_rows(kind, rows)?;
        used.extend(aliases.apply(&mut entities));
        Ok(entities)
    };
    let suppliers = load(EntityKind::Supplier)?;
    let employees = load(EntityKind::Employee)?;

    for key in aliases.orphans(&used) {
        tracing::warn!(key = %key, "Alias entry has no matching entity");
    }

    let snapshot = EntitySnapshot::new(suppliers, employees);
    tracing::info!(
        source = %source.describe(),
        suppliers = snapshot.suppliers.len(),
        employees = snapshot.employees.len(),
        aliases = aliases.len(),
        hash = %snapshot.hash,
        "Entity snapshot built"
    );
    Ok(snapshot)
}

fn entities_from_rows(
    kind: EntityKind,
    rows: Vec<EntityRow>,
) -> Result<Vec<CanonicalEntity>, StoreError> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .map(|row| {
            if !seen.insert(row.id) {
                return Err(StoreError::DuplicateId {
                    kind: kind.to_string(),
                    id: row.id,
                });
            }
            if row.name.trim().is_empty() {
                return Err(StoreError::EmptyName { id: row.id });
            }
            Ok(CanonicalEntity::new(row.id, kind, row.name))
        })
        .collect()
}

//! Integration tests for the entity store lifecycle
//!
//! Tests verify:
//! 1. Store construction from settings files
//! 2. Explicit reload picks up roster and alias changes
//! 3. Failed reloads keep the previous snapshot
//! 4. Snapshots handed out earlier stay valid across reloads

use std::fs;
use std::path::Path;
use std::sync::Arc;

use entity_resolver::store::{EntityRow, Roster};
use entity_resolver::{
    resolve, EntityKind, EntityStore, InMemorySource, ResolverSettings, StoreError,
};

const ROSTER_V1: &str = r#"{
  "suppliers": [
    { "id": 1, "name": "VERISURE SA" },
    { "id": 2, "name": "KBC Bank SA" }
  ],
  "employees": [
    { "id": 10, "name": "Hassan Madidi" }
  ]
}"#;

const ROSTER_V2: &str = r#"{
  "suppliers": [
    { "id": 1, "name": "VERISURE SA" },
    { "id": 2, "name": "KBC Bank SA" },
    { "id": 3, "name": "Proximus SA" }
  ],
  "employees": [
    { "id": 10, "name": "Hassan Madidi" },
    { "id": 11, "name": "Soufiane Madidi" }
  ]
}"#;

const ALIASES: &str = r#"{
  "verisure": { "aliases": ["verisure"], "patterns": ["verisur"] }
}"#;

fn write_settings(dir: &Path) -> ResolverSettings {
    let roster = dir.join("roster.json");
    let aliases = dir.join("aliases.json");
    fs::write(&roster, ROSTER_V1).unwrap();
    fs::write(&aliases, ALIASES).unwrap();

    let yaml = format!(
        "roster_path: \"{}\"\naliases_path: \"{}\"\n",
        roster.display(),
        aliases.display()
    );
    let config = dir.join("resolver.yaml");
    fs::write(&config, yaml).unwrap();
    ResolverSettings::from_file(&config).unwrap()
}

#[test]
fn test_store_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_settings(dir.path());
    let store = EntityStore::from_settings(&settings).unwrap();

    let snapshot = store.snapshot().unwrap();
    let stats = snapshot.stats();
    assert_eq!(stats.supplier_count, 2);
    assert_eq!(stats.employee_count, 1);
    assert_eq!(stats.alias_count, 1);
    assert_eq!(stats.pattern_count, 1);

    let result = resolve("verisur", snapshot.entities(EntityKind::Supplier), EntityKind::Supplier)
        .unwrap();
    assert_eq!(result.matched_entity().unwrap().id, 1);
}

#[test]
fn test_reload_picks_up_changes() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_settings(dir.path());
    let store = EntityStore::from_settings(&settings).unwrap();
    let before = store.snapshot().unwrap();

    // Not visible until reload
    fs::write(&settings.roster_path, ROSTER_V2).unwrap();
    assert_eq!(store.snapshot().unwrap().hash, before.hash);

    let after = store.reload().unwrap();
    assert_ne!(after.hash, before.hash);
    assert_eq!(after.suppliers.len(), 3);
    assert!(Arc::ptr_eq(&after, &store.snapshot().unwrap()));

    // Earlier snapshot is untouched
    assert_eq!(before.suppliers.len(), 2);

    let employees = after.entities(EntityKind::Employee);
    let result = resolve("sufjan", employees, EntityKind::Employee).unwrap();
    assert_eq!(result.matched_entity().unwrap().id, 11);
}

#[test]
fn test_reload_without_changes_keeps_hash() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_settings(dir.path());
    let store = EntityStore::from_settings(&settings).unwrap();

    let before = store.snapshot().unwrap();
    let after = store.reload().unwrap();
    assert_eq!(before.hash, after.hash);
}

#[test]
fn test_failed_reload_keeps_previous_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_settings(dir.path());
    let store = EntityStore::from_settings(&settings).unwrap();
    let before = store.snapshot().unwrap();

    fs::write(&settings.roster_path, "{ not json").unwrap();
    let err = store.reload().unwrap_err();
    assert!(matches!(err, StoreError::Parse { .. }));

    assert!(Arc::ptr_eq(&before, &store.snapshot().unwrap()));
}

#[test]
fn test_alias_file_changes_apply_on_reload() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write_settings(dir.path());
    let store = EntityStore::from_settings(&settings).unwrap();

    let snapshot = store.snapshot().unwrap();
    let result = resolve("kbc", snapshot.entities(EntityKind::Supplier), EntityKind::Supplier)
        .unwrap();
    assert!(result.matched.map_or(true, |m| !m.rule.is_dictionary()));

    let aliases_path = settings.aliases_path.as_ref().unwrap();
    fs::write(
        aliases_path,
        r#"{ "KBC Bank": { "aliases": ["kbc"] }, "verisure": { "aliases": ["verisure"] } }"#,
    )
    .unwrap();

    let snapshot = store.reload().unwrap();
    let result = resolve("kbc", snapshot.entities(EntityKind::Supplier), EntityKind::Supplier)
        .unwrap();
    let winner = result.matched.unwrap();
    assert_eq!(winner.entity.id, 2);
    assert!(winner.rule.is_dictionary());

    // Pattern was dropped from the table
    assert!(snapshot.suppliers[0].patterns.is_empty());
}

#[test]
fn test_in_memory_source_reload() {
    let source = Arc::new(InMemorySource::new(Roster {
        suppliers: vec![EntityRow::new(1, "VERISURE SA")],
        employees: Vec::new(),
    }));
    let store = EntityStore::open(Arc::clone(&source), None).unwrap();
    assert_eq!(store.snapshot().unwrap().len(), 1);

    source
        .set_rows(
            EntityKind::Employee,
            vec![EntityRow::new(1, "Jamhoun Mokhlis")],
        )
        .unwrap();
    let snapshot = store.reload().unwrap();
    assert_eq!(snapshot.employees.len(), 1);

    let result = resolve(
        "Mokhlis Jamhoun",
        snapshot.entities(EntityKind::Employee),
        EntityKind::Employee,
    )
    .unwrap();
    assert_eq!(result.distance(), Some(1));
}

#[test]
fn test_invalid_roster_rejected_on_open() {
    let source = InMemorySource::new(Roster {
        suppliers: vec![EntityRow::new(1, "VERISURE SA"), EntityRow::new(1, "KBC")],
        employees: Vec::new(),
    });
    let err = EntityStore::open(source, None).err().unwrap();
    assert!(matches!(err, StoreError::DuplicateId { id: 1, .. }));
}

//! Integration tests for entity resolution
//!
//! Tests verify:
//! 1. Resolution against the bundled roster and alias table
//! 2. Dictionary fast path vs. fuzzy scoring
//! 3. Shared-surname ambiguity surfaces through alternates
//! 4. Mention extraction over a loaded snapshot

use std::path::PathBuf;
use std::sync::Arc;

use entity_resolver::entity_linking::{EntitySnapshot, MentionExtractor};
use entity_resolver::{
    resolve, CanonicalEntity, EntityKind, EntityStore, MatchRule, Resolver, ResolverSettings,
    RosterFile,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(file)
}

fn bundled_snapshot() -> Arc<EntitySnapshot> {
    let store = EntityStore::open(
        RosterFile::new(data_path("roster.json")),
        Some(data_path("aliases.json")),
    )
    .unwrap_or_else(|e| panic!("bundled data should load: {e}"));
    store.snapshot().unwrap()
}

// ============================================================================
// SUPPLIERS
// ============================================================================

#[test]
fn test_pattern_resolves_typo() {
    let snapshot = bundled_snapshot();
    let result = resolve("verisur", snapshot.entities(EntityKind::Supplier), EntityKind::Supplier)
        .unwrap();

    let winner = result.matched.unwrap();
    assert_eq!(winner.entity.canonical_name, "VERISURE SA");
    assert_eq!(winner.distance, 0);
    assert_eq!(winner.rule, MatchRule::Pattern);
    assert!(result.alternates.is_empty());
}

#[test]
fn test_alias_from_table() {
    let snapshot = bundled_snapshot();
    let suppliers = snapshot.entities(EntityKind::Supplier);

    let result = resolve("Foster", suppliers, EntityKind::Supplier).unwrap();
    assert_eq!(
        result.matched_entity().unwrap().canonical_name,
        "FOSTER FAST FOOD SA"
    );
    assert_eq!(result.matched.unwrap().rule, MatchRule::Alias);

    let result = resolve("K.B.C.", suppliers, EntityKind::Supplier).unwrap();
    assert_eq!(result.matched_entity().unwrap().id, 2);
}

#[test]
fn test_unknown_supplier_is_not_matched() {
    let snapshot = bundled_snapshot();
    let result = resolve("xyz123", snapshot.entities(EntityKind::Supplier), EntityKind::Supplier)
        .unwrap();

    assert!(!result.is_match());
    assert!(result.alternates.is_empty());
    assert_eq!(result.threshold, 3);
    assert_eq!(result.canonical_name_or("xyz123"), "xyz123");
}

#[test]
fn test_legal_suffix_and_accents_ignored() {
    let snapshot = bundled_snapshot();
    let result = resolve(
        "Électrabel n.v.",
        snapshot.entities(EntityKind::Supplier),
        EntityKind::Supplier,
    )
    .unwrap();

    let winner = result.matched.unwrap();
    assert_eq!(winner.entity.canonical_name, "Electrabel NV");
    assert_eq!(winner.rule, MatchRule::Exact);
}

// ============================================================================
// EMPLOYEES
// ============================================================================

#[test]
fn test_first_name_typo() {
    let snapshot = bundled_snapshot();
    let result = resolve("sufjan", snapshot.entities(EntityKind::Employee), EntityKind::Employee)
        .unwrap();

    assert_eq!(result.threshold, 4);
    let winner = result.matched.unwrap();
    assert_eq!(winner.entity.canonical_name, "Soufiane Jamhoun");
    assert_eq!(winner.distance, 3);
    assert_eq!(winner.rule, MatchRule::TokenDistance);

    // both "hassan" names are 4 edits away
    let alternates: Vec<_> = result.alternates.iter().map(|a| a.entity.id).collect();
    assert_eq!(alternates, vec![2, 4]);
    assert!(!result.is_ambiguous());
}

#[test]
fn test_reversed_name() {
    let snapshot = bundled_snapshot();
    let result = resolve(
        "Mokhlis Jamhoun",
        snapshot.entities(EntityKind::Employee),
        EntityKind::Employee,
    )
    .unwrap();

    let winner = result.matched.unwrap();
    assert_eq!(winner.entity.canonical_name, "Jamhoun Mokhlis");
    assert_eq!(winner.distance, 1);
    assert_eq!(winner.rule, MatchRule::TokenReversal);
}

#[test]
fn test_shared_surname_lists_family() {
    let snapshot = bundled_snapshot();
    let employees = snapshot.entities(EntityKind::Employee);
    let result = resolve("jamhoun", employees, EntityKind::Employee).unwrap();

    assert!(result.is_ambiguous());
    assert_eq!(result.matched_entity().unwrap().canonical_name, "Soufiane Jamhoun");

    let family: Vec<_> = result
        .candidates()
        .map(|c| c.entity.canonical_name.as_str())
        .collect();
    assert_eq!(family, vec!["Soufiane Jamhoun", "Jamhoun Mokhlis"]);
}

#[test]
fn test_suggest_matches_candidates() {
    let snapshot = bundled_snapshot();
    let employees = snapshot.entities(EntityKind::Employee);
    let resolver = Resolver::for_kind(EntityKind::Employee);

    let suggestions = resolver.suggest("jamhoun", employees, 1).unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].entity.id, 1);
}

// ============================================================================
// SETTINGS
// ============================================================================

#[test]
fn test_bundled_settings_load() {
    let settings = ResolverSettings::from_file(
        &PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/resolver.yaml"),
    )
    .unwrap();

    assert_eq!(settings.roster_path, PathBuf::from("data/roster.json"));
    assert_eq!(settings.threshold(EntityKind::Employee).floor, 4);

    let resolver = settings.resolver(EntityKind::Supplier).unwrap();
    assert_eq!(resolver.config().max_alternates, 5);
}

// ============================================================================
// MENTIONS
// ============================================================================

#[test]
fn test_mentions_in_message() {
    let snapshot = bundled_snapshot();
    let text = "how much did we pay verisure in march";
    let mentions = MentionExtractor::default().extract(text, snapshot.entities(EntityKind::Supplier));

    assert_eq!(mentions.len(), 1);
    let mention = &mentions[0];
    assert_eq!(&text[mention.start..mention.end], "verisure");
    assert_eq!(mention.candidate_ids[0], 1);
    assert_eq!(mention.distance, 0);
}

#[test]
fn test_resolution_is_pure() {
    let entities = vec![
        CanonicalEntity::new(1, EntityKind::Employee, "Madidi Hassan"),
        CanonicalEntity::new(2, EntityKind::Employee, "Madidi Soufiane"),
        CanonicalEntity::new(3, EntityKind::Employee, "Madidi Jawad"),
    ];

    let first = resolve("Madidi", &entities, EntityKind::Employee).unwrap();
    let second = resolve("Madidi", &entities, EntityKind::Employee).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.matched_entity().unwrap().id, 1);
    assert_eq!(first.candidates().count(), 3);
}

//! Alias/pattern dictionary lookup
//!
//! The fast path tried before any edit distance is computed:
//! 1. exact equality between the normalized query and a normalized alias
//! 2. containment, in either direction, between the compact query and a
//!    compact pattern
//!
//! Each pass walks entities in input order and the first hit wins, so the
//! outcome is deterministic for a given entity ordering.

use serde::Serialize;

use super::entity::CanonicalEntity;
use super::prepared::{PreparedEntity, PreparedQuery, MIN_FRAGMENT_LEN};
use super::scorer::MatchRule;

/// Entity found by the dictionary, with the rule that found it
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DictionaryHit<'a> {
    pub entity: &'a CanonicalEntity,
    /// Position in the input slice
    pub index: usize,
    pub rule: MatchRule,
}

/// Look up a query by alias, then by pattern.
///
/// The query is expected to be normalized; it is normalized again anyway,
/// which is harmless since normalization is idempotent.
pub fn lookup_by_alias_or_pattern<'a>(
    normalized_query: &str,
    entities: &'a [CanonicalEntity],
) -> Option<&'a CanonicalEntity> {
    lookup_hit(normalized_query, entities).map(|hit| hit.entity)
}

/// Same as [`lookup_by_alias_or_pattern`], reporting index and rule
pub fn lookup_hit<'a>(
    normalized_query: &str,
    entities: &'a [CanonicalEntity],
) -> Option<DictionaryHit<'a>> {
    let query = PreparedQuery::new(normalized_query);
    if query.is_empty() {
        return None;
    }
    let prepared = PreparedEntity::prepare_all(entities);
    lookup_prepared(&query, &prepared)
}

pub(crate) fn lookup_prepared<'a>(
    query: &PreparedQuery,
    entities: &[PreparedEntity<'a>],
) -> Option<DictionaryHit<'a>> {
    if query.is_empty() {
        return None;
    }

    let found = entities
        .iter()
        .position(|e| alias_hit(query, e))
        .map(|index| (index, MatchRule::Alias))
        .or_else(|| {
            entities
                .iter()
                .position(|e| pattern_hit(query, e))
                .map(|index| (index, MatchRule::Pattern))
        });

    found.map(|(index, rule)| DictionaryHit {
        entity: entities[index].entity,
        index,
        rule,
    })
}

pub(crate) fn alias_hit(query: &PreparedQuery, entity: &PreparedEntity<'_>) -> bool {
    entity.aliases.iter().any(|alias| *alias == query.norm)
}

pub(crate) fn pattern_hit(query: &PreparedQuery, entity: &PreparedEntity<'_>) -> bool {
    let query_len = query.compact.chars().count();
    entity.patterns.iter().any(|pattern| {
        *pattern == query.compact
            || (pattern.chars().count() >= MIN_FRAGMENT_LEN && query.compact.contains(pattern))
            || (query_len >= MIN_FRAGMENT_LEN && pattern.contains(&query.compact))
    })
}

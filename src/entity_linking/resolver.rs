//! Resolver - picks the best candidate or reports "no confident match"
//!
//! ## Flow
//!
//! 1. Normalize the query; empty → no match
//! 2. Alias/pattern dictionary → authoritative hit, distance 0
//! 3. Score every entity, apply the length-adaptive threshold
//! 4. Lowest score wins (ties: earliest input position), next best become
//!    `alternates` for "did you mean" prompts

use serde::{Deserialize, Serialize};

use super::dictionary::lookup_prepared;
use super::entity::{CanonicalEntity, EntityKind};
use super::prepared::{PreparedEntity, PreparedQuery};
use super::scorer::{score_prepared, MatchRule};
use crate::error::{InvalidInput, ResolveError};

/// Maximum number of alternates returned by default
pub const DEFAULT_MAX_ALTERNATES: usize = 5;

/// Acceptance threshold: `max(floor, ⌊len(query) × ratio⌋)`.
///
/// Longer queries tolerate more absolute edit distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    pub floor: usize,
    pub ratio: f64,
}

impl ThresholdPolicy {
    /// Supplier lookups: `max(3, ⌊len × 0.3⌋)`
    pub const fn supplier() -> Self {
        Self {
            floor: 3,
            ratio: 0.3,
        }
    }

    /// Employee "suggest similar" lookups: `max(4, ⌊len × 0.4⌋)`
    pub const fn employee() -> Self {
        Self {
            floor: 4,
            ratio: 0.4,
        }
    }

    pub const fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Supplier => Self::supplier(),
            EntityKind::Employee => Self::employee(),
        }
    }

    /// Maximum accepted distance for a normalized query of `query_len` chars
    pub fn threshold_for(&self, query_len: usize) -> usize {
        // epsilon keeps 10 × 0.3 from landing on 2.999…
        let scaled = (query_len as f64 * self.ratio + 1e-9).floor() as usize;
        self.floor.max(scaled)
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !self.ratio.is_finite() || !(0.0..=1.0).contains(&self.ratio) {
            return Err(InvalidInput::Threshold {
                reason: format!("ratio must be within [0, 1], got {}", self.ratio),
            });
        }
        Ok(())
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::supplier()
    }
}

/// Resolver tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub threshold: ThresholdPolicy,
    /// Maximum number of alternates next to the winner
    pub max_alternates: usize,
    /// Extra distance allowed for alternates beyond the acceptance threshold
    pub alternate_slack: usize,
}

impl ResolverConfig {
    pub const fn for_kind(kind: EntityKind) -> Self {
        Self {
            threshold: ThresholdPolicy::for_kind(kind),
            max_alternates: DEFAULT_MAX_ALTERNATES,
            alternate_slack: 0,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::for_kind(EntityKind::Supplier)
    }
}

/// A candidate together with its score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredEntity<'a> {
    pub entity: &'a CanonicalEntity,
    /// Position in the input slice
    pub index: usize,
    pub distance: usize,
    pub rule: MatchRule,
}

/// Outcome of one resolution call.
///
/// "No match" is an absent `matched`; ambiguity is a non-empty
/// `alternates` list, possibly with alternates as close as the winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    /// Normalized query
    pub query: String,
    /// Acceptance threshold applied to this query
    pub threshold: usize,
    pub matched: Option<ScoredEntity<'a>>,
    pub alternates: Vec<ScoredEntity<'a>>,
}

impl<'a> MatchResult<'a> {
    fn no_match(query: String, threshold: usize) -> Self {
        Self {
            query,
            threshold,
            matched: None,
            alternates: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.matched.is_some()
    }

    pub fn matched_entity(&self) -> Option<&'a CanonicalEntity> {
        self.matched.map(|m| m.entity)
    }

    /// Distance of the winner (0 for alias/pattern hits)
    pub fn distance(&self) -> Option<usize> {
        self.matched.map(|m| m.distance)
    }

    /// True when at least one alternate scored as well as the winner
    pub fn is_ambiguous(&self) -> bool {
        match &self.matched {
            Some(winner) => self
                .alternates
                .iter()
                .any(|alt| alt.distance == winner.distance),
            None => false,
        }
    }

    /// Winner first, then alternates
    pub fn candidates(&self) -> impl Iterator<Item = &ScoredEntity<'a>> {
        self.matched.iter().chain(self.alternates.iter())
    }

    /// Canonical name of the winner, or the caller's raw text when unmatched
    pub fn canonical_name_or<'s>(&'s self, raw: &'s str) -> &'s str {
        self.matched
            .as_ref()
            .map(|m| m.entity.canonical_name.as_str())
            .unwrap_or(raw)
    }
}

/// Entity resolver. Stateless apart from its configuration, so one
/// instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: ResolverConfig,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Result<Self, ResolveError> {
        config.threshold.validate()?;
        Ok(Self { config })
    }

    /// Resolver with the default policy for `kind`
    pub fn for_kind(kind: EntityKind) -> Self {
        Self {
            config: ResolverConfig::for_kind(kind),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a free-text name against `entities`.
    ///
    /// Fails only on malformed input (an entity without a canonical name).
    pub fn resolve<'a>(
        &self,
        raw: &str,
        entities: &'a [CanonicalEntity],
    ) -> Result<MatchResult<'a>, ResolveError> {
        validate_entities(entities)?;

        let query = PreparedQuery::new(raw);
        let threshold = self.config.threshold.threshold_for(query.len);
        if query.is_empty() {
            tracing::debug!(raw = %raw, "Query normalizes to nothing, skipping resolution");
            return Ok(MatchResult::no_match(query.norm, threshold));
        }

        let prepared = PreparedEntity::prepare_all(entities);

        if let Some(hit) = lookup_prepared(&query, &prepared) {
            tracing::debug!(
                query = %query.norm,
                entity_id = hit.entity.id,
                rule = ?hit.rule,
                "Resolved by dictionary"
            );
            return Ok(MatchResult {
                query: query.norm,
                threshold,
                matched: Some(ScoredEntity {
                    entity: hit.entity,
                    index: hit.index,
                    distance: 0,
                    rule: hit.rule,
                }),
                alternates: Vec::new(),
            });
        }

        let mut scored: Vec<ScoredEntity<'a>> = prepared
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let score = score_prepared(&query, candidate)?;
                Some(ScoredEntity {
                    entity: candidate.entity,
                    index,
                    distance: score.distance,
                    rule: score.rule,
                })
            })
            .collect();
        scored.sort_by_key(|s| (s.distance, s.index));

        let alternate_limit = threshold.saturating_add(self.config.alternate_slack);
        let mut ranked = scored
            .into_iter()
            .filter(|s| s.distance <= alternate_limit);

        let winner = match ranked.next() {
            Some(first) if first.distance <= threshold => first,
            _ => {
                tracing::debug!(query = %query.norm, threshold, "No candidate within threshold");
                return Ok(MatchResult::no_match(query.norm, threshold));
            }
        };
        let alternates: Vec<_> = ranked.take(self.config.max_alternates).collect();

        tracing::debug!(
            query = %query.norm,
            entity_id = winner.entity.id,
            distance = winner.distance,
            rule = ?winner.rule,
            alternates = alternates.len(),
            "Resolved by score"
        );

        Ok(MatchResult {
            query: query.norm,
            threshold,
            matched: Some(winner),
            alternates,
        })
    }

    /// Resolve raw bytes, rejecting anything that is not UTF-8 text
    pub fn resolve_bytes<'a>(
        &self,
        raw: &[u8],
        entities: &'a [CanonicalEntity],
    ) -> Result<MatchResult<'a>, ResolveError> {
        let raw = std::str::from_utf8(raw)?;
        self.resolve(raw, entities)
    }

    /// Ranked "did you mean" list: winner first, then alternates, at most
    /// `limit` entries
    pub fn suggest<'a>(
        &self,
        raw: &str,
        entities: &'a [CanonicalEntity],
        limit: usize,
    ) -> Result<Vec<ScoredEntity<'a>>, ResolveError> {
        let result = self.resolve(raw, entities)?;
        Ok(result.candidates().take(limit).copied().collect())
    }
}

/// Resolve with the default policy of `kind`
pub fn resolve<'a>(
    raw: &str,
    entities: &'a [CanonicalEntity],
    kind: EntityKind,
) -> Result<MatchResult<'a>, ResolveError> {
    Resolver::for_kind(kind).resolve(raw, entities)
}

fn validate_entities(entities: &[CanonicalEntity]) -> Result<(), InvalidInput> {
    match entities
        .iter()
        .enumerate()
        .find(|(_, e)| e.canonical_name.trim().is_empty())
    {
        Some((index, entity)) => Err(InvalidInput::EmptyCanonicalName {
            index,
            id: entity.id,
        }),
        None => Ok(()),
    }
}

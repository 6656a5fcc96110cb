//! Mention extraction from utterances
//!
//! Finds supplier/employee mentions inside a longer message ("how much did
//! we pay verisur in march") by scanning n-grams against the entity list.
//! Scoring is stricter than [`Resolver`](super::Resolver): substring and
//! pattern containment are not used, since every longer n-gram around a
//! name would otherwise match too.

use serde::Serialize;
use smallvec::SmallVec;

use super::dictionary::alias_hit;
use super::distance::levenshtein_distance;
use super::entity::{CanonicalEntity, EntityId};
use super::normalize::reverse_tokens;
use super::prepared::{PreparedEntity, PreparedQuery, MIN_FRAGMENT_LEN};
use super::resolver::ThresholdPolicy;
use super::scorer::{TOKEN_MATCH_SCORE, TOKEN_REVERSAL_SCORE};

/// A candidate mention span in the original utterance
#[derive(Debug, Clone, Serialize)]
pub struct MentionSpan {
    /// Start byte position in original text
    pub start: usize,
    /// End byte position in original text (exclusive)
    pub end: usize,
    /// Original text of the mention
    pub text: String,
    /// Normalized form used for matching
    pub normalized: String,
    /// Candidate entity IDs, best first
    pub candidate_ids: SmallVec<[EntityId; 8]>,
    /// Distance of the best candidate
    pub distance: usize,
    /// Confidence in `[0, 1]` derived from the distance
    pub score: f32,
}

/// Configuration for mention extraction
#[derive(Debug, Clone)]
pub(crate) struct MentionExtractorConfig {
    /// Maximum n-gram size to consider
    pub max_ngram: usize,
    /// Normalized spans shorter than this are skipped
    pub min_span_len: usize,
    /// Distance policy for fuzzy span matches
    pub threshold: ThresholdPolicy,
}

impl Default for MentionExtractorConfig {
    fn default() -> Self {
        Self {
            max_ngram: 4,
            min_span_len: MIN_FRAGMENT_LEN,
            threshold: ThresholdPolicy {
                floor: 1,
                ratio: 0.15,
            },
        }
    }
}

/// Extracts entity mention spans from utterances
#[derive(Default)]
pub struct MentionExtractor {
    config: MentionExtractorConfig,
}

impl MentionExtractor {
    /// Extract non-overlapping mention spans, in text order
    pub fn extract(&self, utterance: &str, entities: &[CanonicalEntity]) -> Vec<MentionSpan> {
        let words = tokenize_with_positions(utterance);
        if words.is_empty() || entities.is_empty() {
            return vec![];
        }

        let prepared = PreparedEntity::prepare_all(entities);
        let mut candidates: Vec<MentionSpan> = Vec::new();

        for start_idx in 0..words.len() {
            for ngram_len in 1..=self.config.max_ngram.min(words.len() - start_idx) {
                let char_start = words[start_idx].0;
                let char_end = words[start_idx + ngram_len - 1].1;
                let text = &utterance[char_start..char_end];

                let query = PreparedQuery::new(text);
                if query.len < self.config.min_span_len {
                    continue;
                }

                if let Some((candidate_ids, distance)) = self.score_span(&query, &prepared) {
                    let score = 1.0 - distance as f32 / query.len as f32;
                    candidates.push(MentionSpan {
                        start: char_start,
                        end: char_end,
                        text: text.to_string(),
                        normalized: query.norm,
                        candidate_ids,
                        distance,
                        score,
                    });
                }
            }
        }

        select_non_overlapping(candidates)
    }

    /// Best distance of a span and the entities reaching it
    fn score_span(
        &self,
        query: &PreparedQuery,
        entities: &[PreparedEntity<'_>],
    ) -> Option<(SmallVec<[EntityId; 8]>, usize)> {
        let threshold = self.config.threshold.threshold_for(query.len);

        let mut scored: Vec<(usize, EntityId)> = entities
            .iter()
            .filter_map(|e| {
                let distance = span_distance(query, e)?;
                (distance <= threshold).then_some((distance, e.entity.id))
            })
            .collect();
        if scored.is_empty() {
            return None;
        }

        // stable: equal distances keep input order
        scored.sort_by_key(|(distance, _)| *distance);
        let best = scored[0].0;
        let ids = scored.iter().take(8).map(|(_, id)| *id).collect();
        Some((ids, best))
    }
}

fn span_distance(query: &PreparedQuery, entity: &PreparedEntity<'_>) -> Option<usize> {
    if alias_hit(query, entity) || entity.patterns.iter().any(|p| *p == query.compact) {
        return Some(0);
    }
    if entity.name.is_empty() {
        return None;
    }

    let mut best = levenshtein_distance(&query.norm, &entity.name);
    if best == 0 {
        return Some(0);
    }

    if entity.tokens.len() == 2
        && reverse_tokens(&query.norm).as_deref() == Some(entity.name.as_str())
    {
        best = best.min(TOKEN_REVERSAL_SCORE);
    }
    if let Some(token) = query.single_token() {
        if entity.tokens.len() > 1 && entity.tokens.iter().any(|t| t == token) {
            best = best.min(TOKEN_MATCH_SCORE);
        }
    }
    Some(best)
}

/// Tokenize with byte positions: Vec<(start, end)>
fn tokenize_with_positions(s: &str) -> Vec<(usize, usize)> {
    let mut result = Vec::new();
    let mut word_start = None;

    for (i, c) in s.char_indices() {
        if c.is_alphanumeric() {
            if word_start.is_none() {
                word_start = Some(i);
            }
        } else if let Some(start) = word_start.take() {
            result.push((start, i));
        }
    }

    // Handle trailing word
    if let Some(start) = word_start {
        result.push((start, s.len()));
    }

    result
}

/// Greedy non-overlapping selection by score, preferring longer spans
fn select_non_overlapping(mut candidates: Vec<MentionSpan>) -> Vec<MentionSpan> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
            .then_with(|| a.start.cmp(&b.start))
    });

    let mut selected: Vec<MentionSpan> = Vec::new();

    for candidate in candidates {
        let overlaps = selected
            .iter()
            .any(|s| !(candidate.end <= s.start || candidate.start >= s.end));

        if !overlaps {
            selected.push(candidate);
        }
    }

    // Sort by position for output
    selected.sort_by_key(|s| s.start);
    selected
}

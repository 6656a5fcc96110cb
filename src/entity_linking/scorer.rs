//! Candidate scoring
//!
//! Scores are distances: lower is better and 0 is an exact hit. Rules are
//! tried in precedence order and the lowest distance wins; on equal
//! distance the earlier rule is reported, so a whole-name match outranks a
//! per-token one at the same distance.
//!
//! | rule            | distance                                  |
//! |-----------------|-------------------------------------------|
//! | alias / pattern | 0                                         |
//! | exact name      | 0                                         |
//! | edit distance   | `d(query, name)`                          |
//! | token reversal  | 1 if swapped tokens are exact, else `d`   |
//! | token match     | 1 (single-token query equals a name token)|
//! | substring       | 2 (single-token query inside the name)    |
//! | token distance  | best `d(query, token)`                    |

use serde::Serialize;

use super::dictionary::{alias_hit, pattern_hit};
use super::distance::levenshtein_distance;
use super::entity::CanonicalEntity;
use super::normalize::reverse_tokens;
use super::prepared::{PreparedEntity, PreparedQuery, MIN_FRAGMENT_LEN};

/// Score for a two-token name that matches exactly once tokens are swapped
pub const TOKEN_REVERSAL_SCORE: usize = 1;

/// Score for a single-token query equal to one token of the name
pub const TOKEN_MATCH_SCORE: usize = 1;

/// Score for a single-token query contained in the name
pub const SUBSTRING_SCORE: usize = 2;

/// Which rule produced a candidate's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Alias,
    Pattern,
    Exact,
    EditDistance,
    TokenReversal,
    TokenMatch,
    Substring,
    TokenDistance,
}

impl MatchRule {
    /// Dictionary hits are authoritative and bypass the threshold
    pub fn is_dictionary(&self) -> bool {
        matches!(self, MatchRule::Alias | MatchRule::Pattern)
    }
}

/// Distance of one candidate and the rule that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateScore {
    pub distance: usize,
    pub rule: MatchRule,
}

impl CandidateScore {
    fn offer(&mut self, distance: usize, rule: MatchRule) {
        if distance < self.distance {
            self.distance = distance;
            self.rule = rule;
        }
    }
}

/// Score a query against one entity.
///
/// Returns `None` when nothing can be compared: an empty query, or an
/// entity whose name normalizes to nothing and has no dictionary hit.
pub fn score(normalized_query: &str, entity: &CanonicalEntity) -> Option<CandidateScore> {
    let query = PreparedQuery::new(normalized_query);
    score_prepared(&query, &PreparedEntity::new(entity))
}

pub(crate) fn score_prepared(
    query: &PreparedQuery,
    entity: &PreparedEntity<'_>,
) -> Option<CandidateScore> {
    if query.is_empty() {
        return None;
    }

    if alias_hit(query, entity) {
        return Some(CandidateScore {
            distance: 0,
            rule: MatchRule::Alias,
        });
    }
    if pattern_hit(query, entity) {
        return Some(CandidateScore {
            distance: 0,
            rule: MatchRule::Pattern,
        });
    }

    // A name made only of suffixes/punctuation would sit within the
    // threshold of every short query
    if entity.name.is_empty() {
        return None;
    }

    let direct = levenshtein_distance(&query.norm, &entity.name);
    if direct == 0 {
        return Some(CandidateScore {
            distance: 0,
            rule: MatchRule::Exact,
        });
    }

    let mut best = CandidateScore {
        distance: direct,
        rule: MatchRule::EditDistance,
    };

    if entity.tokens.len() == 2 {
        if let Some(reversed) = reverse_tokens(&query.norm) {
            let swapped = levenshtein_distance(&reversed, &entity.name);
            let effective = if swapped == 0 {
                TOKEN_REVERSAL_SCORE
            } else {
                swapped
            };
            best.offer(effective, MatchRule::TokenReversal);
        }
    }

    if let Some(token) = query.single_token() {
        if entity.tokens.iter().any(|t| t == token) {
            best.offer(TOKEN_MATCH_SCORE, MatchRule::TokenMatch);
        } else {
            if query.len >= MIN_FRAGMENT_LEN && entity.name.contains(token) {
                best.offer(SUBSTRING_SCORE, MatchRule::Substring);
            }

            // no token is equal here, so the closest one is at least 1 away
            if let Some(closest) = entity
                .tokens
                .iter()
                .map(|t| levenshtein_distance(token, t))
                .min()
            {
                best.offer(closest, MatchRule::TokenDistance);
            }
        }
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_linking::entity::EntityKind;

    fn employee(name: &str) -> CanonicalEntity {
        CanonicalEntity::new(1, EntityKind::Employee, name)
    }

    #[test]
    fn test_dictionary_hits_score_zero() {
        let entity = CanonicalEntity::new(1, EntityKind::Supplier, "VERISURE SA")
            .with_aliases(["verisure"])
            .with_patterns(["verisur"]);
        assert_eq!(
            score("verisure", &entity),
            Some(CandidateScore {
                distance: 0,
                rule: MatchRule::Alias
            })
        );
        assert_eq!(score("verisur", &entity).unwrap().rule, MatchRule::Pattern);
    }

    #[test]
    fn test_exact_name() {
        let score = score("foster fast food", &employee("FOSTER FAST FOOD SA")).unwrap();
        assert_eq!(score.distance, 0);
        assert_eq!(score.rule, MatchRule::Exact);
    }

    #[test]
    fn test_plain_edit_distance() {
        let score = score("verisur", &employee("Verisure")).unwrap();
        assert_eq!(score.distance, 1);
        assert_eq!(score.rule, MatchRule::EditDistance);
    }

    #[test]
    fn test_token_reversal_exact() {
        let score = score("mokhlis jamhoun", &employee("Jamhoun Mokhlis")).unwrap();
        assert_eq!(score.distance, TOKEN_REVERSAL_SCORE);
        assert_eq!(score.rule, MatchRule::TokenReversal);
    }

    #[test]
    fn test_token_reversal_with_typo() {
        let score = score("mokhlis jamhon", &employee("Jamhoun Mokhlis")).unwrap();
        assert_eq!(score.distance, 1);
        assert_eq!(score.rule, MatchRule::TokenReversal);
    }

    #[test]
    fn test_single_token_match() {
        let score = score("madidi", &employee("Madidi Hassan")).unwrap();
        assert_eq!(score.distance, TOKEN_MATCH_SCORE);
        assert_eq!(score.rule, MatchRule::TokenMatch);
    }

    #[test]
    fn test_single_token_substring() {
        let score = score("fastfood", &employee("Foster Fastfoodery")).unwrap();
        assert_eq!(score.distance, SUBSTRING_SCORE);
        assert_eq!(score.rule, MatchRule::Substring);
    }

    #[test]
    fn test_single_token_distance() {
        let score = score("sufjan", &employee("Soufiane Madidi")).unwrap();
        assert_eq!(score.distance, 3);
        assert_eq!(score.rule, MatchRule::TokenDistance);
    }

    #[test]
    fn test_equal_token_is_not_scored_below_token_match() {
        let score = score("hassan", &employee("Mohamed Hassan")).unwrap();
        assert_eq!(score.distance, TOKEN_MATCH_SCORE);
        assert_eq!(score.rule, MatchRule::TokenMatch);
    }

    #[test]
    fn test_whole_name_wins_ties_with_token_distance() {
        // single-token name: both rules give 1
        let score = score("verisur", &employee("Verisure")).unwrap();
        assert_eq!(score.distance, 1);
        assert_eq!(score.rule, MatchRule::EditDistance);
    }

    #[test]
    fn test_unscorable() {
        assert_eq!(score("", &employee("Hassan Madidi")), None);
        assert_eq!(score("abc", &employee("S.A.")), None);
    }
}

//! Per-call normalized views of the query and candidate entities

use super::entity::CanonicalEntity;
use super::normalize::{compact, normalize_name};

/// Shortest fragment allowed to take part in substring containment
pub(crate) const MIN_FRAGMENT_LEN: usize = 3;

/// Normalized query, computed once per resolution call
#[derive(Debug, Clone)]
pub(crate) struct PreparedQuery {
    pub norm: String,
    pub tokens: Vec<String>,
    pub compact: String,
    /// Char length of `norm`
    pub len: usize,
}

impl PreparedQuery {
    pub fn new(raw: &str) -> Self {
        let norm = normalize_name(raw);
        let tokens = norm.split_whitespace().map(|t| t.to_string()).collect();
        let compact = norm.chars().filter(|c| *c != ' ').collect();
        let len = norm.chars().count();
        Self {
            norm,
            tokens,
            compact,
            len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.norm.is_empty()
    }

    /// The query's only token, when it has exactly one
    pub fn single_token(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [token] => Some(token.as_str()),
            _ => None,
        }
    }
}

/// Normalized view of one candidate entity
#[derive(Debug, Clone)]
pub(crate) struct PreparedEntity<'a> {
    pub entity: &'a CanonicalEntity,
    pub name: String,
    pub tokens: Vec<String>,
    /// Normalized aliases (empty ones dropped)
    pub aliases: Vec<String>,
    /// Compact patterns (empty ones dropped)
    pub patterns: Vec<String>,
}

impl<'a> PreparedEntity<'a> {
    pub fn new(entity: &'a CanonicalEntity) -> Self {
        let name = normalize_name(&entity.canonical_name);
        let tokens = name.split_whitespace().map(|t| t.to_string()).collect();
        let aliases = entity
            .aliases
            .iter()
            .map(|a| normalize_name(a))
            .filter(|a| !a.is_empty())
            .collect();
        let patterns = entity
            .patterns
            .iter()
            .map(|p| compact(p))
            .filter(|p| !p.is_empty())
            .collect();

        Self {
            entity,
            name,
            tokens,
            aliases,
            patterns,
        }
    }

    pub fn prepare_all(entities: &'a [CanonicalEntity]) -> Vec<PreparedEntity<'a>> {
        entities.iter().map(PreparedEntity::new).collect()
    }
}

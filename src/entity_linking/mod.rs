//! Entity linking: fuzzy resolution of supplier and employee names
//!
//! ## Architecture
//!
//! ```text
//! "verisur" ──► normalize ──► dictionary (aliases, patterns)
//!                                 │ miss
//!                                 ▼
//!                             scorer (per entity)
//!                                 │
//!                                 ▼
//!                             resolver ──► MatchResult { matched, alternates }
//! ```
//!
//! Everything here is pure and synchronous; the entity list is an explicit
//! argument of every call.

pub mod dictionary;
pub mod distance;
pub mod entity;
pub mod mention;
pub mod normalize;
mod prepared;
pub mod resolver;
pub mod scorer;
pub mod snapshot;

pub use dictionary::{lookup_by_alias_or_pattern, DictionaryHit};
pub use distance::levenshtein_distance;
pub use entity::{CanonicalEntity, EntityId, EntityKind};
pub use mention::{MentionExtractor, MentionSpan};
pub use normalize::normalize_name;
pub use resolver::{
    resolve, MatchResult, Resolver, ResolverConfig, ScoredEntity, ThresholdPolicy,
    DEFAULT_MAX_ALTERNATES,
};
pub use scorer::{score, CandidateScore, MatchRule};
pub use snapshot::{EntitySnapshot, SnapshotStats};

//! Entity Resolver - fuzzy supplier and employee name resolution
//!
//! Turns free-text names typed by users ("verisur", "sufjan",
//! "Mokhlis Jamhoun") into the canonical supplier or employee records held
//! by the bookkeeping store.
//!
//! ## Architecture
//!
//! ```text
//! caller ──► Resolver.resolve(query, entities)
//!               │
//!               ├─► normalize (query + candidates)
//!               ├─► alias / pattern dictionary (fast path)
//!               ├─► candidate scorer (edit distance, token reversal, partial names)
//!               └─► MatchResult { matched, alternates }
//! ```
//!
//! The engine is pure: entities are passed in on every call. Loading them
//! (and the alias file) is the job of [`store::EntityStore`].
//!
//! ## Quick Start
//!
//! ```
//! use entity_resolver::entity_linking::{CanonicalEntity, EntityKind, Resolver};
//!
//! let suppliers = vec![CanonicalEntity::new(1, EntityKind::Supplier, "VERISURE SA")
//!     .with_aliases(["verisure"])
//!     .with_patterns(["verisur"])];
//!
//! let resolver = Resolver::for_kind(EntityKind::Supplier);
//! let result = resolver.resolve("verisur", &suppliers).unwrap();
//! assert_eq!(result.matched_entity().unwrap().canonical_name, "VERISURE SA");
//! assert_eq!(result.distance(), Some(0));
//! ```

pub mod config;
pub mod entity_linking;
pub mod error;
pub mod store;

pub use config::ResolverSettings;
pub use entity_linking::{
    resolve, CanonicalEntity, EntityId, EntityKind, MatchResult, MatchRule, Resolver,
    ResolverConfig, ScoredEntity, ThresholdPolicy,
};
pub use error::{ConfigError, InvalidInput, ResolveError, StoreError};
pub use store::{EntityStore, InMemorySource, RosterFile};

//! Text normalization for entity matching
//!
//! Normalizes supplier and employee names before any comparison:
//! - Unicode NFKD decomposition with combining marks dropped (é → e)
//! - Lowercase conversion
//! - Periods and apostrophes deleted (`S.A.` → `sa`), other punctuation
//!   treated as a separator
//! - Whitespace collapsing
//! - Legal suffix removal (whole tokens only)

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Legal-entity suffixes dropped when they appear as a whole token
const LEGAL_SUFFIXES: &[&str] = &[
    "sa", "nv", "srl", "bvba", "sprl", "llc", "ltd", "inc", "bv", "sarl", "sas", "scrl", "asbl",
    "vzw", "gmbh", "plc", "corp",
];

/// Normalize a name for matching.
///
/// Never fails: empty or all-punctuation input yields an empty string,
/// which callers treat as "no match possible".
///
/// # Examples
///
/// ```
/// use entity_resolver::entity_linking::normalize::normalize_name;
///
/// assert_eq!(normalize_name("FOSTER FAST FOOD SA"), "foster fast food");
/// assert_eq!(normalize_name("Société Générale S.A."), "societe generale");
/// assert_eq!(normalize_name("Jean-Pierre  O'Brien"), "jean pierre obrien");
/// ```
pub fn normalize_name(s: &str) -> String {
    let lowered = s.to_lowercase();

    let mut stripped = String::with_capacity(lowered.len());
    for c in lowered.nfkd().filter(|c| !is_combining_mark(*c)) {
        for c in c.to_lowercase() {
            if c.is_alphanumeric() {
                stripped.push(c);
            } else if !is_deleted_punctuation(c) {
                stripped.push(' ');
            }
        }
    }

    stripped
        .split_whitespace()
        .filter(|t| !is_legal_suffix(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Punctuation removed outright rather than turned into a separator
fn is_deleted_punctuation(c: char) -> bool {
    matches!(c, '.' | '\'' | '\u{2019}' | '`')
}

/// Check if a token is a legal-entity suffix
fn is_legal_suffix(token: &str) -> bool {
    LEGAL_SUFFIXES.contains(&token)
}

/// Tokenize a name into normalized tokens
pub fn tokenize(s: &str) -> Vec<String> {
    normalize_name(s)
        .split_whitespace()
        .map(|t| t.to_string())
        .collect()
}

/// Normalized form with all spaces removed.
///
/// Used for pattern containment ("fosterfastfood") and as the canonical key
/// of alias table entries.
pub fn compact(s: &str) -> String {
    normalize_name(s).chars().filter(|c| *c != ' ').collect()
}

/// Swap the two tokens of an already normalized two-token name.
///
/// Returns `None` for any other token count.
pub fn reverse_tokens(normalized: &str) -> Option<String> {
    let mut tokens = normalized.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(first), Some(second), None) => Some(format!("{second} {first}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_legal_suffixes() {
        assert_eq!(normalize_name("VERISURE SA"), "verisure");
        assert_eq!(normalize_name("KBC Bank SA"), "kbc bank");
        assert_eq!(normalize_name("Colruyt N.V."), "colruyt");
        assert_eq!(normalize_name("SA Proximus"), "proximus");
        assert_eq!(normalize_name("Acme, Inc."), "acme");
        assert_eq!(normalize_name("Deliveroo Belgium SPRL"), "deliveroo belgium");
    }

    #[test]
    fn test_suffix_only_matches_whole_tokens() {
        // "sa" inside a word must survive
        assert_eq!(normalize_name("Samsonite"), "samsonite");
        assert_eq!(normalize_name("Incasso Partners"), "incasso partners");
        assert_eq!(normalize_name("Hassan Madidi"), "hassan madidi");
    }

    #[test]
    fn test_diacritics_removed() {
        assert_eq!(normalize_name("Société Générale"), "societe generale");
        assert_eq!(normalize_name("Müller Brötchen"), "muller brotchen");
        assert_eq!(normalize_name("Ｆｏｓｔｅｒ"), "foster");
    }

    #[test]
    fn test_punctuation_handling() {
        assert_eq!(normalize_name("Jean-Pierre"), "jean pierre");
        assert_eq!(normalize_name("Fast/Food & Co"), "fast food co");
        assert_eq!(normalize_name("\"Foster\""), "foster");
        assert_eq!(normalize_name("O'Neill"), "oneill");
    }

    #[test]
    fn test_whitespace_collapse() {
        assert_eq!(normalize_name("  Foster   Fast\tFood  "), "foster fast food");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("  ...,;-- "), "");
        assert_eq!(normalize_name("S.A."), "");
    }

    #[test]
    fn test_tokenize_and_compact() {
        assert_eq!(tokenize("Foster Fast Food SA"), vec!["foster", "fast", "food"]);
        assert_eq!(compact("Foster Fast Food SA"), "fosterfastfood");
    }

    #[test]
    fn test_reverse_tokens() {
        assert_eq!(
            reverse_tokens("mokhlis jamhoun").as_deref(),
            Some("jamhoun mokhlis")
        );
        assert_eq!(reverse_tokens("madidi"), None);
        assert_eq!(reverse_tokens("foster fast food"), None);
    }
}

//! Edit distance between normalized names

/// Unweighted Levenshtein distance counted in Unicode scalar values.
///
/// Symmetric, zero for identical strings, and `levenshtein_distance("", b)`
/// is the char length of `b`.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Similarity in `[0, 1]` derived from the edit distance (1.0 = identical)
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

//! Token-set similarity
//!
//! Set-based fuzzy score between a model-supplied snippet and a block of
//! document text. Exact substring matching is useless here: the model
//! paraphrases whitespace and word order but rarely wording, so both sides
//! are reduced to sorted token sets and compared through their intersection.

use std::collections::BTreeSet;

/// Score two strings in the 0-100 range.
///
/// Identical token sets (including reordered words) score 100, as does one
/// token set containing the other. The score is the best normalized indel
/// similarity among the intersection string and the two
/// intersection-plus-remainder strings.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let common: Vec<&str> = tokens_a
        .intersection(&tokens_b)
        .map(String::as_str)
        .collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).map(String::as_str).collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).map(String::as_str).collect();

    let base = common.join(" ");
    let combined_a = join_groups(&common, &only_a);
    let combined_b = join_groups(&common, &only_b);

    let score = ratio(&base, &combined_a)
        .max(ratio(&base, &combined_b))
        .max(ratio(&combined_a, &combined_b));
    score * 100.0
}

/// Lowercased, whitespace-split, deduplicated tokens in sorted order.
fn tokenize(value: &str) -> BTreeSet<String> {
    value
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn join_groups(common: &[&str], rest: &[&str]) -> String {
    let mut parts = Vec::with_capacity(common.len() + rest.len());
    parts.extend_from_slice(common);
    parts.extend_from_slice(rest);
    parts.join(" ")
}

fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b)
}

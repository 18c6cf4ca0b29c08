//! Coordinate resolver
//!
//! Depth-first walk of a grounded extraction result. Context fields follow
//! the augmentor's naming convention: a `*_context` key grounds its stripped
//! sibling, `_context_snippet` grounds the enclosing object. Everything else
//! recurses as data.
//!
//! Unmatched and sub-threshold snippets are dropped, not reported: the model
//! occasionally fabricates or paraphrases context beyond fuzzy recovery, and
//! a partial overlay beats a failed request. Callers must not assume one
//! match per extracted field.

use serde_json::Value;

use crate::pdf::TextBlock;
use crate::schema::{CONTEXT_SNIPPET_KEY, CONTEXT_SUFFIX};

use super::similarity::token_set_ratio;
use super::types::FieldMatch;

/// Resolve every context snippet in `extracted` against the token map.
///
/// Output order is the traversal order of the result tree, so identical
/// inputs always produce the identical match list.
pub fn map_extraction_to_coordinates(
    extracted: &Value,
    token_map: &[TextBlock],
    min_score: f64,
) -> Vec<FieldMatch> {
    let mut matches = Vec::new();
    walk_context_fields(extracted, "", token_map, &mut matches, min_score);
    matches
}

fn walk_context_fields(
    value: &Value,
    path: &str,
    token_map: &[TextBlock],
    matches: &mut Vec<FieldMatch>,
    min_score: f64,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = join_key(path, key);

                if key.ends_with(CONTEXT_SUFFIX) {
                    // Context for the sibling named by the stripped path;
                    // never recursed into as data.
                    let base_path = &child_path[..child_path.len() - CONTEXT_SUFFIX.len()];
                    match_context_value(base_path, child, token_map, matches, min_score);
                    continue;
                }

                if key == CONTEXT_SNIPPET_KEY {
                    let base_path = if path.is_empty() {
                        CONTEXT_SNIPPET_KEY
                    } else {
                        path
                    };
                    match_context_value(base_path, child, token_map, matches, min_score);
                    continue;
                }

                walk_context_fields(child, &child_path, token_map, matches, min_score);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{index}]");
                walk_context_fields(item, &item_path, token_map, matches, min_score);
            }
        }
        _ => {}
    }
}

fn match_context_value(
    base_path: &str,
    context_value: &Value,
    token_map: &[TextBlock],
    matches: &mut Vec<FieldMatch>,
    min_score: f64,
) {
    match context_value {
        Value::String(snippet) => {
            if let Some((block, score)) = best_block_for_snippet(snippet, token_map, min_score) {
                matches.push(to_field_match(base_path.to_string(), snippet, block, score));
            }
        }
        Value::Array(snippets) => {
            for (index, entry) in snippets.iter().enumerate() {
                let Value::String(snippet) = entry else {
                    continue;
                };
                if let Some((block, score)) = best_block_for_snippet(snippet, token_map, min_score)
                {
                    matches.push(to_field_match(
                        format!("{base_path}[{index}]"),
                        snippet,
                        block,
                        score,
                    ));
                }
            }
        }
        _ => {}
    }
}

/// Best-scoring block for a snippet, or None when nothing clears the
/// threshold. Ties break to the first block in token-map order.
fn best_block_for_snippet<'a>(
    snippet: &str,
    token_map: &'a [TextBlock],
    min_score: f64,
) -> Option<(&'a TextBlock, f64)> {
    let cleaned = snippet.trim();
    if cleaned.is_empty() || token_map.is_empty() {
        return None;
    }

    let mut best_index = 0;
    let mut best_score = f64::MIN;
    for (index, block) in token_map.iter().enumerate() {
        let score = token_set_ratio(cleaned, &block.text);
        if score > best_score {
            best_score = score;
            best_index = index;
        }
    }

    if best_score < min_score {
        return None;
    }
    Some((&token_map[best_index], best_score))
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn to_field_match(path: String, snippet: &str, block: &TextBlock, score: f64) -> FieldMatch {
    FieldMatch {
        path,
        snippet: snippet.to_string(),
        matched_text: block.text.clone(),
        score,
        page: block.page,
        x0: block.x0,
        y0: block.y0,
        x1: block.x1,
        y1: block.y1,
        block_index: block.block_index,
    }
}

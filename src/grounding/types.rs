//! Grounding result types

use serde::{Deserialize, Serialize};

/// One resolved grounding: an extracted field's path mapped to the text
/// block that best supports its context snippet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    /// Dotted/indexed path of the grounded field (`items[0].amount`)
    pub path: String,
    /// The snippet the model claimed, as returned
    pub snippet: String,
    /// Text of the winning block
    pub matched_text: String,
    /// Similarity score, 0-100; always >= the configured threshold
    pub score: f64,
    /// Page number (1-indexed) of the winning block
    pub page: u32,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// Winning block's position within its page
    pub block_index: u32,
}

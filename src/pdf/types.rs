//! PDF index data types
//!
//! Types produced by document indexing. Coordinates are MuPDF page points,
//! the same space the legacy UI overlay math expects.

use serde::{Deserialize, Serialize};

/// One contiguous span of text at a known location on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Page number (1-indexed)
    pub page: u32,
    /// Left edge in page points
    pub x0: f32,
    /// Top edge in page points
    pub y0: f32,
    /// Right edge in page points
    pub x1: f32,
    /// Bottom edge in page points
    pub y1: f32,
    /// Trimmed block text, never empty
    pub text: String,
    /// Position within the page's block sequence (not globally unique)
    pub block_index: u32,
}

/// Ordered text blocks spanning all pages of one document, page-major.
pub type TokenMap = Vec<TextBlock>;

/// A rendered page for UI display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    /// Page number (1-indexed)
    pub page: u32,
    /// Pixel width of the rendered image
    pub width: u32,
    /// Pixel height of the rendered image
    pub height: u32,
    /// PNG bytes, base64-encoded
    pub image_base64: String,
}

/// Result of indexing one document.
#[derive(Debug, Clone)]
pub struct PdfIndex {
    pub page_count: u32,
    pub page_images: Vec<PageImage>,
    pub token_map: TokenMap,
}

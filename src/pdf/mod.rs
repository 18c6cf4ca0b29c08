//! PDF indexing module
//!
//! Turns an uploaded PDF into the two products the extraction pipeline needs:
//! rendered page images for UI overlays, and the token map of page-positioned
//! text blocks that coordinate resolution later matches snippets against.

mod indexer;
mod types;

pub use indexer::{index_pdf, IndexError};
pub use types::{PageImage, PdfIndex, TextBlock, TokenMap};

//! Coordinate grounding module
//!
//! Recovers spatial provenance for a grounded extraction result: walks the
//! value tree the model returned, pulls out every context snippet, and
//! fuzzy-matches it against the document's token map to produce per-field
//! page and bounding-box records.

mod resolver;
mod similarity;
mod types;

pub use resolver::map_extraction_to_coordinates;
pub use similarity::token_set_ratio;
pub use types::FieldMatch;

//! Extraction schema module
//!
//! Takes the caller's arbitrary extraction schema and rewrites it into a
//! grounded schema: every leaf value the model extracts must arrive with a
//! verbatim source snippet proving where it came from. The naming convention
//! established here (`*_context` siblings, `_context_snippet` members) is the
//! contract the coordinate resolver walks against.

mod grounded;
mod node;

pub use grounded::{
    augment_schema, GroundedField, GroundedNode, GroundedObject, CONTEXT_SNIPPET_KEY,
    CONTEXT_SUFFIX, ROOT_MODEL_NAME,
};
pub use node::{FieldType, ScalarType};

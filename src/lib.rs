//! Provenance Server Library
//!
//! Grounded structured extraction from PDFs: upload a document, extract
//! fields matching an arbitrary caller-supplied schema, and get back the
//! page and bounding box where every value was found.
//!
//! # Modules
//!
//! - `schema`: grounded-schema augmentation (the extraction contract)
//! - `grounding`: snippet-to-coordinate resolution against the token map
//! - `pdf`: MuPDF-based indexing (page images + token map)
//! - `extraction`: OpenAI-compatible structured completion provider
//! - `store`: in-memory LRU document registry
//! - `routes`: HTTP surface; the server binary is in main.rs

pub mod config;
pub mod error;
pub mod extraction;
pub mod grounding;
pub mod pdf;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;

//! Route modules for Provenance Server

pub mod documents;
pub mod extract;

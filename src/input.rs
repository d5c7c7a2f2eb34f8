//! Catalog file input: `.ts` document parsing and catalog file discovery.

pub mod discovery;
pub mod document;

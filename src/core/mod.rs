//! Core data structures and file handling.

pub mod indexer;
pub mod loader;
pub mod table;

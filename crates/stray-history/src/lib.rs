//! Contribution history for orphaned paths.
//!
//! Extracts commit history once via git2, then answers per-path author
//! queries in memory: a rename-following query for files and a prefix query
//! for directories.

pub mod authors;
pub mod log;

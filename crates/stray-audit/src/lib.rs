//! Ownership-manifest audit: selector classification and orphan scanning.
//!
//! Translates CODEOWNERS-style path selectors into concrete ownership sets,
//! then walks the source tree once, pruning owned and excluded subtrees and
//! reporting files and directories nobody owns.

pub mod manifest;
pub mod scanner;
pub mod selectors;

//! Selector classification into concrete ownership sets.
//!
//! All wildcard resolution happens here, once, against the current filesystem
//! snapshot. The walk then only performs O(1) canonical-path lookups, and an
//! owned subtree is represented by a single directory entry instead of an
//! enumeration of its contents.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use stray_core::StrayError;

/// Concrete ownership decisions derived from a manifest snapshot.
///
/// Holds fully-owned directories and individually-owned files, all as
/// canonical paths. Immutable once built.
///
/// # Examples
///
/// ```
/// use stray_audit::selectors::classify;
/// use std::path::Path;
///
/// let set = classify(&[], Path::new("/")).unwrap();
/// assert_eq!(set.dir_count(), 0);
/// assert_eq!(set.file_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipSet {
    dirs: HashSet<PathBuf>,
    files: HashSet<PathBuf>,
}

impl OwnershipSet {
    /// Whether `dir` is a fully-owned directory.
    ///
    /// `dir` must already be canonical; no pattern re-evaluation happens here.
    pub fn owns_dir(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    /// Whether `file` is an individually-owned file.
    pub fn owns_file(&self, file: &Path) -> bool {
        self.files.contains(file)
    }

    /// Number of fully-owned directories.
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Number of individually-owned files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Classify manifest selectors into an [`OwnershipSet`].
///
/// Selectors are resolved relative to `base_dir`. Three tiers:
///
/// 1. No wildcard: an existing file goes into the file set; anything else is
///    treated as a directory (ownership intent applies even before the
///    directory exists).
/// 2. A single trailing `/*`: the prefix directory is fully owned.
/// 3. Anything else with wildcards: a trailing `/*` still reduces the glob
///    matches of its prefix to fully-owned directories; otherwise the whole
///    pattern is expanded and each match is classified by what it is on disk.
///
/// A selector matching nothing contributes nothing.
///
/// # Errors
///
/// Returns [`StrayError::Pattern`] if a selector is not a valid glob pattern.
///
/// # Examples
///
/// ```no_run
/// use stray_audit::selectors::classify;
/// use std::path::Path;
///
/// let selectors = vec!["drivers/*".to_string(), "lib/core.c".to_string()];
/// let set = classify(&selectors, Path::new("/repo")).unwrap();
/// assert!(set.owns_dir(Path::new("/repo/drivers")));
/// ```
pub fn classify(selectors: &[String], base_dir: &Path) -> Result<OwnershipSet, StrayError> {
    let mut dirs = HashSet::new();
    let mut files = HashSet::new();

    for raw in selectors {
        // Leading '/' anchors to the base directory in CODEOWNERS syntax.
        let selector = raw.trim_start_matches('/');
        let wildcards = selector.matches('*').count();

        if wildcards == 0 {
            let path = base_dir.join(selector);
            if path.is_file() {
                files.insert(canonical_or_clean(&path));
            } else {
                dirs.insert(canonical_or_clean(&path));
            }
        } else if let Some(prefix) = selector.strip_suffix("/*") {
            if wildcards == 1 {
                dirs.insert(canonical_or_clean(&base_dir.join(prefix)));
            } else {
                // Reducible prefix with its own wildcards: every matched
                // subdirectory becomes fully owned.
                for m in expand(base_dir, prefix)? {
                    dirs.insert(canonical_or_clean(&m));
                }
            }
        } else {
            for m in expand(base_dir, selector)? {
                if m.is_file() {
                    files.insert(canonical_or_clean(&m));
                } else {
                    dirs.insert(canonical_or_clean(&m));
                }
            }
        }
    }

    Ok(OwnershipSet { dirs, files })
}

/// Expand `pattern` beneath `base_dir` via filesystem glob matching.
///
/// Unreadable entries are skipped; a pattern matching nothing yields an empty
/// list, not an error.
fn expand(base_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, StrayError> {
    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&base_dir.to_string_lossy()),
        pattern
    );
    let paths = glob::glob(&full)
        .map_err(|e| StrayError::Pattern(format!("invalid selector '{pattern}': {e}")))?;
    Ok(paths.filter_map(|p| p.ok()).collect())
}

/// Canonicalize `path`, falling back to lexical normalization when the path
/// does not exist (the ownership intent still applies to it).
fn canonical_or_clean(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

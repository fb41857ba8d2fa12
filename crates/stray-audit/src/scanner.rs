//! Orphan scanning: a lazy, prune-capable walk over the source tree.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use stray_core::StrayError;

use crate::selectors::OwnershipSet;

/// An unowned item found during the walk.
///
/// `Directory` means every file directly inside the directory is unowned
/// (per-file noise coalesced into one report; its subdirectories are still
/// visited on their own). `File` is a single unowned file in a directory that
/// also contains owned files.
///
/// # Examples
///
/// ```
/// use stray_audit::scanner::OrphanItem;
/// use std::path::PathBuf;
///
/// let item = OrphanItem::File(PathBuf::from("docs/readme.md"));
/// assert_eq!(item.marker(), '-');
/// assert_eq!(OrphanItem::Directory(PathBuf::from("tools")).marker(), 'd');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum OrphanItem {
    /// A directory whose immediate files are all unowned.
    Directory(PathBuf),
    /// A single unowned file.
    File(PathBuf),
}

impl OrphanItem {
    /// The item's path.
    pub fn path(&self) -> &Path {
        match self {
            OrphanItem::Directory(p) | OrphanItem::File(p) => p,
        }
    }

    /// One-character type marker used in text output (`d` / `-`).
    pub fn marker(&self) -> char {
        match self {
            OrphanItem::Directory(_) => 'd',
            OrphanItem::File(_) => '-',
        }
    }
}

/// Lazy iterator over orphaned items beneath a root directory.
///
/// Single forward pass, not restartable. Created by [`scan`].
pub struct Orphans<'a> {
    stack: Vec<PathBuf>,
    pending: VecDeque<OrphanItem>,
    ownership: &'a OwnershipSet,
    excluded: &'a HashSet<String>,
}

/// Walk `root` top-down and report unowned files and directories.
///
/// Per visited directory, in order: an excluded basename prunes the subtree
/// with a diagnostic on stderr; a fully-owned directory prunes silently;
/// otherwise the directory's immediate files are checked against the file
/// set, with a wholly-unowned directory coalesced into a single
/// [`OrphanItem::Directory`]. Pruned subtrees are never read, so nothing
/// beneath an owned or excluded directory can be reported.
///
/// Traversal order follows the filesystem's enumeration order; each orphan
/// appears exactly once.
///
/// # Errors
///
/// Returns [`StrayError::Io`] if `root` cannot be canonicalized. Directory
/// read failures during the walk surface as `Err` items.
///
/// # Examples
///
/// ```no_run
/// use std::collections::HashSet;
/// use std::path::Path;
/// use stray_audit::{scanner::scan, selectors::classify};
///
/// let ownership = classify(&["src/*".into()], Path::new("/repo")).unwrap();
/// let excluded: HashSet<String> = [".git".to_string()].into();
/// for item in scan(Path::new("/repo"), &ownership, &excluded).unwrap() {
///     let item = item.unwrap();
///     println!("{} {}", item.marker(), item.path().display());
/// }
/// ```
pub fn scan<'a>(
    root: &Path,
    ownership: &'a OwnershipSet,
    excluded: &'a HashSet<String>,
) -> Result<Orphans<'a>, StrayError> {
    let root = fs::canonicalize(root)?;
    Ok(Orphans {
        stack: vec![root],
        pending: VecDeque::new(),
        ownership,
        excluded,
    })
}

impl Iterator for Orphans<'_> {
    type Item = Result<OrphanItem, StrayError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(Ok(item));
            }

            let dir = self.stack.pop()?;

            if let Some(name) = dir.file_name().and_then(|n| n.to_str()) {
                if self.excluded.contains(name) {
                    eprintln!("{} is excluded, skipping.", dir.display());
                    continue;
                }
            }
            if self.ownership.owns_dir(&dir) {
                continue;
            }

            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => return Some(Err(err.into())),
            };

            let mut files = Vec::new();
            for entry in entries {
                let entry = match entry {
                    Ok(e) => e,
                    Err(err) => return Some(Err(err.into())),
                };
                let file_type = match entry.file_type() {
                    Ok(ft) => ft,
                    Err(err) => return Some(Err(err.into())),
                };
                if file_type.is_dir() {
                    // Visited in a later iteration of the same walk.
                    self.stack.push(entry.path());
                    continue;
                }
                // A symlink to a directory is neither descended nor counted
                // among the directory's files.
                if file_type.is_symlink()
                    && fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false)
                {
                    continue;
                }
                files.push(entry.path());
            }

            if files.is_empty() {
                continue;
            }

            // Symlinked files are matched through their targets, same as the
            // ownership set stores them.
            let orphaned: Vec<PathBuf> = files
                .iter()
                .filter(|f| {
                    let canonical = fs::canonicalize(f).unwrap_or_else(|_| f.to_path_buf());
                    !self.ownership.owns_file(&canonical)
                })
                .cloned()
                .collect();

            if orphaned.is_empty() {
                continue;
            }
            if orphaned.len() == files.len() {
                return Some(Ok(OrphanItem::Directory(dir)));
            }
            self.pending.extend(orphaned.into_iter().map(OrphanItem::File));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selectors::classify;
    use std::fs;

    fn collect(
        root: &Path,
        selectors: &[&str],
        excluded: &[&str],
    ) -> Vec<OrphanItem> {
        let selectors: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
        let ownership = classify(&selectors, root).unwrap();
        let excluded: HashSet<String> = excluded.iter().map(|s| s.to_string()).collect();
        scan(root, &ownership, &excluded)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn make_tree() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();

        fs::create_dir_all(base.join("src")).unwrap();
        fs::write(base.join("src/a.c"), "int a;").unwrap();
        fs::write(base.join("src/b.c"), "int b;").unwrap();
        fs::create_dir_all(base.join("docs")).unwrap();
        fs::write(base.join("docs/readme.md"), "# docs").unwrap();

        (dir, base)
    }

    #[test]
    fn owned_subtree_is_pruned_and_orphan_file_reported() {
        let (_dir, base) = make_tree();
        // Root holds no files, docs/readme.md is the only orphan file, and
        // docs has only that one file, so it coalesces.
        let items = collect(&base, &["src/*"], &[]);
        assert_eq!(items, vec![OrphanItem::Directory(base.join("docs"))]);
    }

    #[test]
    fn partially_owned_directory_reports_individual_files() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("lib")).unwrap();
        fs::write(base.join("lib/core.c"), "int core;").unwrap();
        fs::write(base.join("lib/extra.c"), "int extra;").unwrap();

        let items = collect(&base, &["lib/core.c"], &[]);
        assert_eq!(items, vec![OrphanItem::File(base.join("lib/extra.c"))]);
    }

    #[test]
    fn wholly_unowned_directory_coalesces_to_one_item() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("tools")).unwrap();
        fs::write(base.join("tools/x.py"), "x").unwrap();
        fs::write(base.join("tools/y.py"), "y").unwrap();

        let items = collect(&base, &[], &[]);
        assert_eq!(items, vec![OrphanItem::Directory(base.join("tools"))]);
    }

    #[test]
    fn excluded_directory_is_never_descended() {
        let (_dir, base) = make_tree();
        fs::create_dir_all(base.join(".git")).unwrap();
        fs::write(base.join(".git/config"), "[core]").unwrap();

        let items = collect(&base, &["src/*", "docs/*"], &[".git"]);
        assert!(
            items.iter().all(|i| !i.path().starts_with(base.join(".git"))),
            "nothing under .git may be reported: {items:?}"
        );
        assert!(items.is_empty());
    }

    #[test]
    fn nothing_under_owned_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("owned/nested/deep")).unwrap();
        fs::write(base.join("owned/nested/deep/file.c"), "x").unwrap();

        let items = collect(&base, &["owned/*"], &[]);
        assert!(items.is_empty(), "owned subtree leaked: {items:?}");
    }

    #[test]
    fn fully_covered_directory_emits_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("lib")).unwrap();
        fs::write(base.join("lib/core.c"), "int core;").unwrap();

        let items = collect(&base, &["lib/core.c"], &[]);
        assert!(items.is_empty());
    }

    #[test]
    fn each_orphan_appears_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("a")).unwrap();
        fs::create_dir_all(base.join("b")).unwrap();
        fs::write(base.join("a/one.c"), "1").unwrap();
        fs::write(base.join("a/two.c"), "2").unwrap();
        fs::write(base.join("b/keep.c"), "3").unwrap();
        fs::write(base.join("b/lost.c"), "4").unwrap();

        let mut items = collect(&base, &["b/keep.c"], &[]);
        items.sort_by(|x, y| x.path().cmp(y.path()));
        assert_eq!(
            items,
            vec![
                OrphanItem::Directory(base.join("a")),
                OrphanItem::File(base.join("b/lost.c")),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_not_reported_as_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().canonicalize().unwrap();
        fs::create_dir_all(base.join("target")).unwrap();
        fs::write(base.join("target/inner.c"), "x").unwrap();
        fs::create_dir_all(base.join("pack")).unwrap();
        fs::write(base.join("pack/x.py"), "x").unwrap();
        std::os::unix::fs::symlink(base.join("target"), base.join("pack/link")).unwrap();

        // pack's only real file is owned; the dir symlink must not flip the
        // directory into reporting a File orphan for the link.
        let items = collect(&base, &["pack/x.py", "target/*"], &[]);
        assert!(items.is_empty(), "symlinked dir reported: {items:?}");
    }

    #[test]
    fn scan_of_missing_root_fails() {
        let excluded = HashSet::new();
        let ownership = OwnershipSet::default();
        let result = scan(Path::new("/no/such/root"), &ownership, &excluded);
        assert!(result.is_err());
    }
}

//! Git history extraction via git2.

use std::path::Path;

use git2::{Delta, DiffOptions, Repository, Sort};

use stray_core::StrayError;

/// Raw commit data extracted from git history.
///
/// # Examples
///
/// ```
/// use stray_history::log::CommitInfo;
///
/// let info = CommitInfo {
///     hash: "abc123".into(),
///     author: "alice".into(),
///     email: "alice@example.com".into(),
///     timestamp: 1700000000,
///     files_changed: vec![],
/// };
/// assert_eq!(info.author, "alice");
/// ```
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Short commit hash.
    pub hash: String,
    /// Author name.
    pub author: String,
    /// Author email.
    pub email: String,
    /// Unix timestamp of the commit.
    pub timestamp: i64,
    /// Files touched by this commit.
    pub files_changed: Vec<FileChange>,
}

/// A single file change within a commit.
#[derive(Debug, Clone)]
pub struct FileChange {
    /// File path relative to the repository root.
    pub path: String,
    /// Type of change.
    pub status: ChangeStatus,
}

/// Status of a file change within a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeStatus {
    /// New file.
    Added,
    /// Existing file modified.
    Modified,
    /// File removed.
    Deleted,
    /// File renamed from another path.
    Renamed {
        /// Original path before rename.
        from: String,
    },
}

/// Options for history collection.
///
/// # Examples
///
/// ```
/// use stray_history::log::LogOptions;
///
/// let opts = LogOptions::default();
/// assert!(opts.since_days.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Only include commits from the last N days; `None` walks full history.
    pub since_days: Option<u64>,
}

/// Collect commit history from the repository at `repo_path`.
///
/// Returns commits in reverse chronological order (newest first), each with
/// its touched files and rename information. Merge commits are diffed against
/// their first parent.
///
/// # Errors
///
/// Returns [`StrayError::Git`] if the repository cannot be opened or walked.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use stray_history::log::{collect_history, LogOptions};
///
/// let commits = collect_history(Path::new("."), &LogOptions::default()).unwrap();
/// for c in &commits {
///     println!("{} {}", c.hash, c.author);
/// }
/// ```
pub fn collect_history(
    repo_path: &Path,
    options: &LogOptions,
) -> Result<Vec<CommitInfo>, StrayError> {
    let repo = Repository::discover(repo_path)
        .map_err(|e| StrayError::Git(format!("failed to open repository: {e}")))?;

    let mut revwalk = repo
        .revwalk()
        .map_err(|e| StrayError::Git(format!("failed to create revwalk: {e}")))?;
    revwalk.set_sorting(Sort::TIME).ok();
    revwalk
        .push_head()
        .map_err(|e| StrayError::Git(format!("failed to push HEAD: {e}")))?;

    let cutoff = options.since_days.map(compute_cutoff);
    let mut commits = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(|e| StrayError::Git(format!("revwalk error: {e}")))?;
        let commit = repo
            .find_commit(oid)
            .map_err(|e| StrayError::Git(format!("failed to find commit: {e}")))?;

        let timestamp = commit.time().seconds();
        if let Some(cutoff) = cutoff {
            if timestamp < cutoff {
                break;
            }
        }

        let files_changed = extract_file_changes(&repo, &commit)?;

        let author = commit.author();
        let hash = oid.to_string();
        commits.push(CommitInfo {
            hash: hash[..hash.len().min(8)].to_string(),
            author: author.name().unwrap_or("unknown").to_string(),
            email: author.email().unwrap_or("unknown").to_string(),
            timestamp,
            files_changed,
        });
    }

    Ok(commits)
}

fn compute_cutoff(since_days: u64) -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    now - (since_days as i64 * 86400)
}

fn extract_file_changes(
    repo: &Repository,
    commit: &git2::Commit,
) -> Result<Vec<FileChange>, StrayError> {
    let commit_tree = commit
        .tree()
        .map_err(|e| StrayError::Git(format!("failed to get commit tree: {e}")))?;

    let parent_tree = if commit.parent_count() > 0 {
        let parent = commit
            .parent(0)
            .map_err(|e| StrayError::Git(format!("failed to get parent: {e}")))?;
        Some(
            parent
                .tree()
                .map_err(|e| StrayError::Git(format!("failed to get parent tree: {e}")))?,
        )
    } else {
        None
    };

    let mut diff_opts = DiffOptions::new();
    let mut diff = repo
        .diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&commit_tree),
            Some(&mut diff_opts),
        )
        .map_err(|e| StrayError::Git(format!("failed to compute diff: {e}")))?;

    // Rename detection makes the file query behave like `git log --follow`.
    let mut find_opts = git2::DiffFindOptions::new();
    find_opts.renames(true);
    diff.find_similar(Some(&mut find_opts))
        .map_err(|e| StrayError::Git(format!("failed to find renames: {e}")))?;

    let mut changes = Vec::new();
    for delta in diff.deltas() {
        let new_path = delta
            .new_file()
            .path()
            .unwrap_or(Path::new(""))
            .to_string_lossy()
            .to_string();

        match delta.status() {
            Delta::Deleted => {
                let old_path = delta
                    .old_file()
                    .path()
                    .unwrap_or(Path::new(""))
                    .to_string_lossy()
                    .to_string();
                if !old_path.is_empty() {
                    changes.push(FileChange {
                        path: old_path,
                        status: ChangeStatus::Deleted,
                    });
                }
            }
            _ if new_path.is_empty() => {}
            Delta::Added => changes.push(FileChange {
                path: new_path,
                status: ChangeStatus::Added,
            }),
            Delta::Renamed => {
                let old_path = delta
                    .old_file()
                    .path()
                    .unwrap_or(Path::new(""))
                    .to_string_lossy()
                    .to_string();
                changes.push(FileChange {
                    path: new_path,
                    status: ChangeStatus::Renamed { from: old_path },
                });
            }
            _ => changes.push(FileChange {
                path: new_path,
                status: ChangeStatus::Modified,
            }),
        }
    }

    Ok(changes)
}

//! Per-path contributor attribution over a collected commit log.
//!
//! Given the commit history of a repository, these functions answer
//! "who has touched this path, and how often?". File attribution
//! follows renames backwards through history so that commits made
//! under an old name still count toward the current path.

use serde::Serialize;

use crate::log::{ChangeStatus, CommitInfo};

/// A contributor and the number of commits they made touching a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorCount {
    /// Author identity in `Name <email>` form.
    pub author: String,
    /// Number of matching commits.
    pub commits: u32,
}

/// Counts commits per author that touched the given file.
///
/// Commits are expected newest first, as produced by
/// [`collect_history`](crate::log::collect_history). When a commit
/// renamed the file, attribution continues under the old name for all
/// older commits. Counting stops once the commit that added the file
/// is reached.
///
/// The result is sorted by commit count descending, ties broken by
/// author name ascending.
pub fn file_contributors(commits: &[CommitInfo], path: &str) -> Vec<AuthorCount> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    let mut current = path.to_string();

    for commit in commits {
        let mut touched = false;
        let mut next = None;
        let mut added = false;

        for change in &commit.files_changed {
            if change.path != current {
                continue;
            }
            touched = true;
            match &change.status {
                ChangeStatus::Renamed { from } => next = Some(from.clone()),
                ChangeStatus::Added => added = true,
                _ => {}
            }
        }

        if touched {
            bump(&mut counts, &commit.author, &commit.email);
        }
        if let Some(older) = next {
            current = older;
        }
        if added {
            break;
        }
    }

    sorted(counts)
}

/// Counts commits per author that touched anything under the given
/// directory. A `dir` of `""` or `"."` matches every commit that
/// changed at least one file.
///
/// Sorted like [`file_contributors`].
pub fn dir_contributors(commits: &[CommitInfo], dir: &str) -> Vec<AuthorCount> {
    let prefix = match dir.trim_end_matches('/') {
        "" | "." => String::new(),
        trimmed => format!("{}/", trimmed),
    };

    let mut counts: Vec<(String, u32)> = Vec::new();
    for commit in commits {
        let touched = commit
            .files_changed
            .iter()
            .any(|c| prefix.is_empty() || c.path.starts_with(&prefix));
        if touched && !commit.files_changed.is_empty() {
            bump(&mut counts, &commit.author, &commit.email);
        }
    }

    sorted(counts)
}

fn bump(counts: &mut Vec<(String, u32)>, name: &str, email: &str) {
    let identity = format!("{} <{}>", name, email);
    match counts.iter_mut().find(|(a, _)| *a == identity) {
        Some((_, n)) => *n += 1,
        None => counts.push((identity, 1)),
    }
}

fn sorted(counts: Vec<(String, u32)>) -> Vec<AuthorCount> {
    let mut out: Vec<AuthorCount> = counts
        .into_iter()
        .map(|(author, commits)| AuthorCount { author, commits })
        .collect();
    out.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.author.cmp(&b.author)));
    out
}

//! CODEOWNERS manifest parsing.
//!
//! A manifest line is `<selector> <@owner>...`. Comment lines and lines
//! without at least one owner token are skipped silently; they carry no
//! ownership intent.

/// A single parsed manifest line.
///
/// # Examples
///
/// ```
/// use stray_audit::manifest::ManifestEntry;
///
/// let entry = ManifestEntry {
///     selector: "drivers/*".into(),
///     owners: vec!["@alice".into()],
/// };
/// assert_eq!(entry.owners.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path selector, possibly containing `*` wildcards.
    pub selector: String,
    /// Owner handles, each starting with `@`.
    pub owners: Vec<String>,
}

/// Parse manifest content into ordered entries.
///
/// Lines are kept in file order. A line qualifies when its first
/// whitespace-separated token is a path (not starting with `#` or `@`) and at
/// least one later token starts with `@`.
///
/// # Examples
///
/// ```
/// use stray_audit::manifest::parse_manifest;
///
/// let entries = parse_manifest("# comment\nsrc/* @alice @bob\nno-owner-here\n");
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].selector, "src/*");
/// assert_eq!(entries[0].owners, vec!["@alice", "@bob"]);
/// ```
pub fn parse_manifest(content: &str) -> Vec<ManifestEntry> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let mut tokens = line.split_whitespace();
        let Some(selector) = tokens.next() else {
            continue;
        };
        if selector.starts_with('#') || selector.starts_with('@') {
            continue;
        }

        let owners: Vec<String> = tokens
            .take_while(|t| !t.starts_with('#'))
            .filter(|t| t.starts_with('@'))
            .map(str::to_string)
            .collect();
        if owners.is_empty() {
            // No owner delimiter: not a manifest entry.
            continue;
        }

        entries.push(ManifestEntry {
            selector: selector.to_string(),
            owners,
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_entries_in_order() {
        let entries = parse_manifest("lib/core.c @bob\nsrc/* @alice\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].selector, "lib/core.c");
        assert_eq!(entries[0].owners, vec!["@bob"]);
        assert_eq!(entries[1].selector, "src/*");
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let entries = parse_manifest("# header\n\n   \ndocs/ @carol\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].selector, "docs/");
    }

    #[test]
    fn skips_lines_without_owner_delimiter() {
        let entries = parse_manifest("orphan/path\nanother one\nowned @dave\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].selector, "owned");
    }

    #[test]
    fn multiple_owners_are_collected() {
        let entries = parse_manifest("kernel/* @a @b @c\n");
        assert_eq!(entries[0].owners, vec!["@a", "@b", "@c"]);
    }

    #[test]
    fn trailing_comment_does_not_add_owners() {
        let entries = parse_manifest("src/* @alice # also @bob someday\n");
        assert_eq!(entries[0].owners, vec!["@alice"]);
    }
}

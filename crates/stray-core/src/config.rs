use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StrayError;

/// Top-level configuration loaded from `.stray.toml`.
///
/// Resolution is layered: CLI flags > env vars > config file > defaults.
///
/// # Examples
///
/// ```
/// use stray_core::StrayConfig;
///
/// let config = StrayConfig::default();
/// assert_eq!(config.audit.manifest, "CODEOWNERS");
/// assert_eq!(config.history.max_authors, 3);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrayConfig {
    /// Manifest and traversal settings.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Contribution-history settings.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl StrayConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StrayError::Io`] if the file cannot be read, or
    /// [`StrayError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stray_core::StrayConfig;
    /// use std::path::Path;
    ///
    /// let config = StrayConfig::from_file(Path::new(".stray.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, StrayError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`StrayError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use stray_core::StrayConfig;
    ///
    /// let toml = r#"
    /// [history]
    /// max_authors = 5
    /// "#;
    /// let config = StrayConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.history.max_authors, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, StrayError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Manifest location and traversal blacklist.
///
/// # Examples
///
/// ```
/// use stray_core::AuditConfig;
///
/// let config = AuditConfig::default();
/// assert!(config.excluded_dirs.contains(&".git".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Manifest file name, relative to the base directory (default: `CODEOWNERS`).
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Directory basenames never descended into during the walk.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
}

fn default_manifest() -> String {
    "CODEOWNERS".into()
}

fn default_excluded_dirs() -> Vec<String> {
    vec![".git".into(), "outdir".into(), "sanity-out".into()]
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

/// Contribution-history display settings.
///
/// # Examples
///
/// ```
/// use stray_core::HistoryConfig;
///
/// let config = HistoryConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.max_authors, 3);
/// assert!(config.since_days.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Attach commit history to each reported orphan (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Most frequent authors shown per orphan (default: 3).
    #[serde(default = "default_max_authors")]
    pub max_authors: usize,
    /// Only consider commits from the last N days (default: full history).
    #[serde(default)]
    pub since_days: Option<u64>,
}

fn default_enabled() -> bool {
    true
}

fn default_max_authors() -> usize {
    3
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_authors: default_max_authors(),
            since_days: None,
        }
    }
}

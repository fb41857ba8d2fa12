/// Errors that can occur across the stray crates.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to miette diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use stray_core::StrayError;
///
/// let err = StrayError::Config("base directory is unset".into());
/// assert!(err.to_string().contains("base directory is unset"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StrayError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git operation failure.
    #[error("git error: {0}")]
    Git(String),

    /// Malformed selector glob pattern.
    #[error("pattern error: {0}")]
    Pattern(String),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StrayError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn config_error_displays_message() {
        let err = StrayError::Config("bad value".into());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn toml_error_converts() {
        let parse_err = toml::from_str::<toml::Value>("not = = toml").unwrap_err();
        let err: StrayError = parse_err.into();
        assert!(err.to_string().starts_with("TOML parse error"));
    }
}

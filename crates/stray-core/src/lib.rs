//! Core types, configuration, and error handling for stray.
//!
//! This crate provides the shared foundation used by the other stray crates:
//! - [`StrayError`] — unified error type using `thiserror`
//! - [`StrayConfig`] — configuration loaded from `.stray.toml`
//! - [`OutputFormat`] — output format selection shared with the CLI

mod config;
mod error;
mod types;

pub use config::{AuditConfig, HistoryConfig, StrayConfig};
pub use error::StrayError;
pub use types::OutputFormat;

/// A convenience `Result` type for stray operations.
pub type Result<T> = std::result::Result<T, StrayError>;

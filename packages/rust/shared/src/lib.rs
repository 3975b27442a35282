//! Shared types, error model, and configuration for answerfill.
//!
//! This crate is the foundation depended on by all other answerfill crates.
//! It provides:
//! - [`AnswerFillError`] and [`ExtractionError`], the error model
//! - Domain types ([`SourceKind`], [`SourceSpec`], [`SourceEntry`], [`AnswerMap`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CapabilitiesConfig, DefaultsConfig, ExtractionConfig, HtmlProfile,
    MarkdownConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{AnswerFillError, ErrorKind, ExtractionError, Result};
pub use types::{
    AnswerMap, DEFAULT_HEADER_BANNER, DEFAULT_PLACEHOLDER, ExtractionResult, SourceEntry,
    SourceKind, SourceList, SourceSpec,
};

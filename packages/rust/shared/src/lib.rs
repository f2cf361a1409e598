//! Shared types, error model, configuration, and secrets for Pagesmith.
//!
//! This crate is the foundation depended on by all other Pagesmith crates.
//! It provides:
//! - [`PagesmithError`], the unified error type
//! - Domain types ([`GeneratedPage`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)
//! - Secret resolution ([`Secrets`], [`resolve_secrets`])

pub mod config;
pub mod error;
pub mod secrets;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GeminiConfig, SiteConfig, TelegramConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{PagesmithError, Result};
pub use secrets::{
    SecretEncoding, Secrets, TelegramSecrets, decode, encode, resolve_secrets,
    resolve_secrets_with,
};
pub use types::{GeneratedPage, PAGE_EXTENSION, RunId};

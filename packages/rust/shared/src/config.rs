//! Application configuration for Pagesmith.
//!
//! User config lives at `~/.pagesmith/pagesmith.toml`.
//! A `--config` flag overrides the location; missing files fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PagesmithError, Result};
use crate::secrets::SecretEncoding;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pagesmith.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagesmith";

// ---------------------------------------------------------------------------
// Config structs (matching pagesmith.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Published site layout and branding.
    #[serde(default)]
    pub site: SiteConfig,

    /// Generative API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Chat notification settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Brand name used as page author and footer signature.
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Name advertised in the structured-data block.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Public root URL of the site, with trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Directory holding the published pages, index, and sitemap.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Index document file name, relative to `output_dir`.
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Completed-topics record, relative to the working directory.
    #[serde(default = "default_completed_topics_file")]
    pub completed_topics_file: PathBuf,

    /// Sitemap file name, relative to `output_dir`.
    #[serde(default = "default_sitemap_file")]
    pub sitemap_file: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            app_name: default_app_name(),
            base_url: default_base_url(),
            output_dir: default_output_dir(),
            index_file: default_index_file(),
            completed_topics_file: default_completed_topics_file(),
            sitemap_file: default_sitemap_file(),
        }
    }
}

impl SiteConfig {
    /// Parse `base_url`, requiring an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            PagesmithError::config(format!("invalid site.base_url '{}': {e}", self.base_url))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PagesmithError::config(format!(
                "site.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Public URL of a published file.
    pub fn page_url(&self, filename: &str) -> Result<Url> {
        self.base_url()?
            .join(filename)
            .map_err(|e| PagesmithError::config(format!("cannot build URL for {filename}: {e}")))
    }

    /// Absolute-or-relative path of the index document.
    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(&self.index_file)
    }

    /// Path of the sitemap document.
    pub fn sitemap_path(&self) -> PathBuf {
        self.output_dir.join(&self.sitemap_file)
    }
}

fn default_brand() -> String {
    "Cipher Nichu".into()
}
fn default_app_name() -> String {
    "Fun Tools by Nichu".into()
}
fn default_base_url() -> String {
    "https://fun.nichu.dev/".into()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_index_file() -> String {
    "index.html".into()
}
fn default_completed_topics_file() -> PathBuf {
    PathBuf::from("completedTopics.json")
}
fn default_sitemap_file() -> String {
    "sitemap.xml".into()
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API root, without the `/models/...` suffix.
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// Model used for both topic and page generation.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// How the API key value is stored in the environment.
    #[serde(default)]
    pub api_key_encoding: SecretEncoding,

    /// Per-request timeout.
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_gemini_api_base(),
            model: default_gemini_model(),
            api_key_env: default_api_key_env(),
            api_key_encoding: SecretEncoding::default(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}
fn default_gemini_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_gemini_timeout() -> u64 {
    60
}

/// `[telegram]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Whether to send a notification after publishing.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bot API root.
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,

    /// Name of the env var holding the bot token.
    #[serde(default = "default_bot_token_env")]
    pub bot_token_env: String,

    /// Name of the env var holding the target chat id.
    #[serde(default = "default_chat_id_env")]
    pub chat_id_env: String,

    /// How both values are stored in the environment.
    #[serde(default)]
    pub encoding: SecretEncoding,

    /// Per-request timeout.
    #[serde(default = "default_telegram_timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: default_telegram_api_base(),
            bot_token_env: default_bot_token_env(),
            chat_id_env: default_chat_id_env(),
            encoding: SecretEncoding::default(),
            timeout_secs: default_telegram_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_telegram_api_base() -> String {
    "https://api.telegram.org".into()
}
fn default_bot_token_env() -> String {
    "TELEGRAM_BOT_TOKEN".into()
}
fn default_chat_id_env() -> String {
    "TELEGRAM_CHAT_ID".into()
}
fn default_telegram_timeout() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pagesmith/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PagesmithError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pagesmith/pagesmith.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PagesmithError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        PagesmithError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    config.site.base_url()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PagesmithError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| PagesmithError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PagesmithError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("completedTopics.json"));
        assert!(toml_str.contains("api_key_encoding = \"base64\""));
    }

    #[test]
    fn config_roundtrip() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.gemini.model, "gemini-2.0-flash");
        assert_eq!(parsed.site.index_file, "index.html");
        assert!(parsed.telegram.enabled);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[site]
output_dir = "/srv/www"

[telegram]
enabled = false
encoding = "plain"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.site.output_dir, PathBuf::from("/srv/www"));
        assert_eq!(config.site.brand, "Cipher Nichu");
        assert!(!config.telegram.enabled);
        assert_eq!(config.telegram.encoding, SecretEncoding::Plain);
        assert_eq!(config.gemini.api_key_encoding, SecretEncoding::Base64);
    }

    #[test]
    fn page_url_joins_base() {
        let site = SiteConfig::default();
        let url = site.page_url("why-is-the-sky-blue.html").unwrap();
        assert_eq!(url.as_str(), "https://fun.nichu.dev/why-is-the-sky-blue.html");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let site = SiteConfig {
            base_url: "ftp://fun.nichu.dev/".into(),
            ..SiteConfig::default()
        };
        assert!(site.base_url().is_err());
    }

    #[test]
    fn paths_are_relative_to_output_dir() {
        let site = SiteConfig {
            output_dir: PathBuf::from("/srv/www"),
            ..SiteConfig::default()
        };
        assert_eq!(site.index_path(), PathBuf::from("/srv/www/index.html"));
        assert_eq!(site.sitemap_path(), PathBuf::from("/srv/www/sitemap.xml"));
    }
}

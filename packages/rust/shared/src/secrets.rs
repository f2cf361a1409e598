//! Provider credentials resolved from the process environment.
//!
//! Values may be stored base64-encoded. The encoding only keeps tokens from
//! being pasted in the clear; it is not a security boundary.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{PagesmithError, Result};

/// How a secret value is stored in its environment variable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretEncoding {
    /// Used verbatim.
    Plain,
    /// Standard-alphabet base64 of the raw value.
    #[default]
    Base64,
}

/// Encode raw bytes in standard base64.
pub fn encode(raw: impl AsRef<[u8]>) -> String {
    STANDARD.encode(raw)
}

/// Decode a standard base64 string back to its raw bytes.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| PagesmithError::config(format!("invalid base64: {e}")))
}

/// Bot credentials for the chat notifier.
#[derive(Clone)]
pub struct TelegramSecrets {
    pub bot_token: String,
    pub chat_id: String,
}

/// Every credential needed for one run. Constant for the process lifetime.
#[derive(Clone)]
pub struct Secrets {
    pub gemini_api_key: String,
    /// `None` when notifications are disabled.
    pub telegram: Option<TelegramSecrets>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("gemini_api_key", &"<redacted>")
            .field("telegram", &self.telegram.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolve all secrets from the process environment.
pub fn resolve_secrets(config: &AppConfig) -> Result<Secrets> {
    resolve_secrets_with(config, |name| std::env::var(name).ok())
}

/// Resolve all secrets through an arbitrary variable lookup.
pub fn resolve_secrets_with<F>(config: &AppConfig, lookup: F) -> Result<Secrets>
where
    F: Fn(&str) -> Option<String>,
{
    let gemini_api_key = resolve_secret(
        &lookup,
        &config.gemini.api_key_env,
        config.gemini.api_key_encoding,
    )?;

    let telegram = if config.telegram.enabled {
        let tg = &config.telegram;
        Some(TelegramSecrets {
            bot_token: resolve_secret(&lookup, &tg.bot_token_env, tg.encoding)?,
            chat_id: resolve_secret(&lookup, &tg.chat_id_env, tg.encoding)?,
        })
    } else {
        tracing::debug!("telegram disabled, skipping bot credentials");
        None
    };

    Ok(Secrets {
        gemini_api_key,
        telegram,
    })
}

fn resolve_secret<F>(lookup: &F, var_name: &str, encoding: SecretEncoding) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match lookup(var_name) {
        Some(val) if !val.trim().is_empty() => val,
        _ => {
            return Err(PagesmithError::config(format!(
                "{var_name} is not set. Export it or add it to .env"
            )));
        }
    };

    match encoding {
        SecretEncoding::Plain => Ok(raw.trim().to_string()),
        SecretEncoding::Base64 => {
            let bytes = decode(&raw)
                .map_err(|e| PagesmithError::config(format!("{var_name}: {e}")))?;
            String::from_utf8(bytes)
                .map_err(|_| PagesmithError::config(format!("{var_name}: decoded value is not UTF-8")))
        }
    }
}

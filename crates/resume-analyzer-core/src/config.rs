//! Resolved runtime configuration.
//!
//! Values come from the TOML cascade in [`config_file`](crate::config_file),
//! then environment variables override them. Resolution fails fast when the
//! Google API key is missing so a misconfigured server never starts.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::config_file::ConfigFile;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_OCR_LANG: &str = "eng";
pub const DEFAULT_OCR_DPI: u32 = 200;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY is not set (environment, .env, or [api_keys] google_api_key)")]
    MissingApiKey,
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the hosted model client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// `None` means the outbound call may wait indefinitely.
    pub timeout: Option<Duration>,
}

impl ModelConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Settings for the OCR fallback stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub ocr_lang: String,
    pub ocr_dpi: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ocr_lang: DEFAULT_OCR_LANG.to_string(),
            ocr_dpi: DEFAULT_OCR_DPI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body cap in bytes. `None` accepts uploads of any size.
    pub max_upload_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub model: ModelConfig,
    pub extractor: ExtractorConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Resolve against the process environment.
    pub fn from_env(file: ConfigFile) -> Result<Self, ConfigError> {
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Resolve `file` with `env` lookups taking precedence.
    pub fn resolve(
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let keys = file.api_keys.unwrap_or_default();
        let model = file.model.unwrap_or_default();
        let ocr = file.ocr.unwrap_or_default();
        let server = file.server.unwrap_or_default();

        let api_key = env("GOOGLE_API_KEY")
            .or(keys.google_api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let timeout_secs = match env("MODEL_TIMEOUT_SECS") {
            Some(v) => Some(parse("MODEL_TIMEOUT_SECS", &v)?),
            None => model.timeout_secs,
        };
        let ocr_dpi = match env("OCR_DPI") {
            Some(v) => parse("OCR_DPI", &v)?,
            None => ocr.dpi.unwrap_or(DEFAULT_OCR_DPI),
        };
        let port = match env("PORT") {
            Some(v) => parse("PORT", &v)?,
            None => server.port.unwrap_or(DEFAULT_PORT),
        };
        let max_upload_mb: Option<u64> = match env("MAX_UPLOAD_MB") {
            Some(v) => Some(parse("MAX_UPLOAD_MB", &v)?),
            None => server.max_upload_mb,
        };

        Ok(Config {
            model: ModelConfig {
                api_key,
                model: env("GEMINI_MODEL")
                    .or(model.name)
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: env("GEMINI_BASE_URL")
                    .or(model.base_url)
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
            },
            extractor: ExtractorConfig {
                ocr_lang: env("OCR_LANG")
                    .or(ocr.lang)
                    .unwrap_or_else(|| DEFAULT_OCR_LANG.to_string()),
                ocr_dpi,
            },
            server: ServerConfig {
                host: env("HOST")
                    .or(server.host)
                    .unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
                max_upload_bytes: max_upload_mb
                    .filter(|mb| *mb > 0)
                    .map(|mb| (mb as usize).saturating_mul(1024 * 1024)),
            },
        })
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file::{ApiKeysConfig, ModelSection, ServerSection};
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_fails_at_startup() {
        let err = Config::resolve(ConfigFile::default(), env_of(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);

        let err = Config::resolve(ConfigFile::default(), env_of(&[("GOOGLE_API_KEY", "  ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingApiKey);
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config =
            Config::resolve(ConfigFile::default(), env_of(&[("GOOGLE_API_KEY", "k")])).unwrap();
        assert_eq!(config.model, ModelConfig::new("k"));
        assert_eq!(config.extractor, ExtractorConfig::default());
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn env_overrides_file() {
        let file = ConfigFile {
            api_keys: Some(ApiKeysConfig {
                google_api_key: Some("file-key".into()),
            }),
            model: Some(ModelSection {
                name: Some("gemini-1.5-flash".into()),
                base_url: None,
                timeout_secs: Some(30),
            }),
            server: Some(ServerSection {
                host: None,
                port: Some(9000),
                max_upload_mb: Some(10),
            }),
            ..ConfigFile::default()
        };
        let config = Config::resolve(
            file,
            env_of(&[("GEMINI_MODEL", "gemini-2.5-pro"), ("PORT", "8080")]),
        )
        .unwrap();

        assert_eq!(config.model.api_key, "file-key");
        assert_eq!(config.model.model, "gemini-2.5-pro");
        assert_eq!(config.model.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.max_upload_bytes, Some(10 * 1024 * 1024));
    }

    #[test]
    fn unparsable_number_is_reported() {
        let err = Config::resolve(
            ConfigFile::default(),
            env_of(&[("GOOGLE_API_KEY", "k"), ("OCR_DPI", "high")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "OCR_DPI", .. }));
    }
}

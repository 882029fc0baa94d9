use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api_keys: Option<ApiKeysConfig>,
    pub model: Option<ModelSection>,
    pub ocr: Option<OcrSection>,
    pub server: Option<ServerSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiKeysConfig {
    pub google_api_key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSection {
    pub lang: Option<String>,
    pub dpi: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_mb: Option<u64>,
}

/// Platform config directory path: `<config_dir>/resume-analyzer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("resume-analyzer").join("config.toml"))
}

/// Load config by cascading CWD `.resume-analyzer.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".resume-analyzer.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_keys = base.api_keys.unwrap_or_default();
    let over_keys = overlay.api_keys.unwrap_or_default();
    let base_model = base.model.unwrap_or_default();
    let over_model = overlay.model.unwrap_or_default();
    let base_ocr = base.ocr.unwrap_or_default();
    let over_ocr = overlay.ocr.unwrap_or_default();
    let base_server = base.server.unwrap_or_default();
    let over_server = overlay.server.unwrap_or_default();

    ConfigFile {
        api_keys: Some(ApiKeysConfig {
            google_api_key: over_keys.google_api_key.or(base_keys.google_api_key),
        }),
        model: Some(ModelSection {
            name: over_model.name.or(base_model.name),
            base_url: over_model.base_url.or(base_model.base_url),
            timeout_secs: over_model.timeout_secs.or(base_model.timeout_secs),
        }),
        ocr: Some(OcrSection {
            lang: over_ocr.lang.or(base_ocr.lang),
            dpi: over_ocr.dpi.or(base_ocr.dpi),
        }),
        server: Some(ServerSection {
            host: over_server.host.or(base_server.host),
            port: over_server.port.or(base_server.port),
            max_upload_mb: over_server.max_upload_mb.or(base_server.max_upload_mb),
        }),
    }
}

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::GrizzlyError;

/// Top-level Grizzly configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grizzly: GrizzlyConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// General assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrizzlyConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GrizzlyConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// HTTP API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer token for API authentication. Empty = no auth (for local-only use).
    #[serde(default)]
    pub api_key: String,
    /// Largest accepted upload, in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: String::new(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

/// External AI services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
    #[serde(default)]
    pub google_vision: GoogleVisionConfig,
}

/// Hugging Face inference (OpenAI-compatible router).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_hf_model")]
    pub model: String,
    #[serde(default = "default_hf_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_hf_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_hf_model(),
            base_url: default_hf_base_url(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_hf_timeout_secs(),
        }
    }
}

/// Google Cloud Vision REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleVisionConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_vision_base_url")]
    pub base_url: String,
    #[serde(default = "default_vision_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleVisionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_vision_base_url(),
            timeout_secs: default_vision_timeout_secs(),
        }
    }
}

/// How log files roll over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rolling {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
    Json,
}

/// Logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Write to stdout instead of a rolling file.
    #[serde(default = "default_true")]
    pub stdout: bool,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_file_name")]
    pub file_name: String,
    #[serde(default)]
    pub rolling: Rolling,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            directory: default_log_directory(),
            file_name: default_log_file_name(),
            rolling: Rolling::default(),
            format: LogFormat::default(),
        }
    }
}

// --- Default value functions ---

fn default_name() -> String {
    "Grizzly".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_max_upload_mb() -> usize {
    10
}
fn default_hf_model() -> String {
    "microsoft/Phi-4-multimodal-instruct".to_string()
}
fn default_hf_base_url() -> String {
    "https://router.huggingface.co/v1".to_string()
}
fn default_max_new_tokens() -> u32 {
    1024
}
fn default_temperature() -> f32 {
    0.2
}
fn default_hf_timeout_secs() -> u64 {
    60
}
fn default_vision_base_url() -> String {
    "https://vision.googleapis.com/v1".to_string()
}
fn default_vision_timeout_secs() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_log_directory() -> String {
    "logs".to_string()
}
fn default_log_file_name() -> String {
    "grizzly.log".to_string()
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// A missing file is not an error: defaults are used.
pub fn load(path: &str) -> Result<Config, GrizzlyError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GrizzlyError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str::<Config>(&content)
            .map_err(|e| GrizzlyError::Config(format!("failed to parse config: {}", e)))?
    } else {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Fill empty secrets from the environment. `lookup` is `std::env::var` in production.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let targets: [(&str, &mut String); 3] = [
        (
            "HUGGINGFACE_API_KEY",
            &mut config.provider.huggingface.api_key,
        ),
        (
            "GOOGLE_VISION_API_KEY",
            &mut config.provider.google_vision.api_key,
        ),
        ("GRIZZLY_API_KEY", &mut config.server.api_key),
    ];
    for (key, slot) in targets {
        if !slot.is_empty() {
            continue;
        }
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("using {key} from environment");
            *slot = value;
        }
    }
}

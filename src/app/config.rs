use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONTEXT_CACHE_TTL_SECS, CONTEXT_MAX_CHARS, DEFAULT_API_KEY_ENV, DEFAULT_BIND_ADDR,
    DEFAULT_CHART_OF_ACCOUNTS_PATH, DEFAULT_PRIMARY_CONTEXT_PATH, DEFAULT_TEMPERATURE,
    DEFAULT_TRANSCRIPTS_PATH, HTTP_REQUEST_TIMEOUT_SECS, TRANSCRIPT_BLOCK_MAX_CHARS,
};
use crate::utils::DreError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Hosted model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Reference context settings
    #[serde(default)]
    pub context: ContextConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Hosted completion endpoint settings.
///
/// `api_base_url`, `default_model` and the credential have no built-in
/// values: they must be supplied by a config file or the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API, e.g. `https://api.groq.com/openai/v1`
    pub api_base_url: Option<String>,
    /// Known-good model used as fallback when the primary model is rejected
    pub default_model: Option<String>,
    /// Primary model; falls back to `default_model` when unset
    pub model: Option<String>,
    /// Inline API key (prefer `api_key_env`)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Environment variable containing the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            default_model: None,
            model: None,
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    pub fn base_url(&self) -> Result<&str, DreError> {
        non_blank(self.api_base_url.as_deref())
            .ok_or_else(|| DreError::ConfigError("llm.api_base_url is not set".to_string()))
    }

    pub fn default_model(&self) -> Result<&str, DreError> {
        non_blank(self.default_model.as_deref())
            .ok_or_else(|| DreError::ConfigError("llm.default_model is not set".to_string()))
    }

    /// Model tried first for every request
    pub fn primary_model(&self) -> Result<&str, DreError> {
        match non_blank(self.model.as_deref()) {
            Some(model) => Ok(model),
            None => self.default_model(),
        }
    }

    /// Resolve the API credential: inline value first, then the named env variable
    pub fn resolve_api_key(&self) -> Option<String> {
        non_blank(self.api_key.as_deref())
            .map(str::to_string)
            .or_else(|| std::env::var(&self.api_key_env).ok().filter(|k| !k.trim().is_empty()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reference context configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Primary reference document
    pub primary_path: PathBuf,
    /// Chart-of-accounts outline, used when the primary document is unavailable
    pub chart_of_accounts_path: PathBuf,
    /// Course transcript corpus, used when the primary document is unavailable
    pub transcripts_path: PathBuf,
    /// Character ceiling for the context sent to the model
    pub max_chars: usize,
    /// Cap for each transcript block kept by compaction
    pub transcript_block_chars: usize,
    /// Cache time-to-live in seconds
    pub cache_ttl_secs: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            primary_path: PathBuf::from(DEFAULT_PRIMARY_CONTEXT_PATH),
            chart_of_accounts_path: PathBuf::from(DEFAULT_CHART_OF_ACCOUNTS_PATH),
            transcripts_path: PathBuf::from(DEFAULT_TRANSCRIPTS_PATH),
            max_chars: CONTEXT_MAX_CHARS,
            transcript_block_chars: TRANSCRIPT_BLOCK_MAX_CHARS,
            cache_ttl_secs: CONTEXT_CACHE_TTL_SECS,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. `0.0.0.0:3000`
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".dre/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        figment = figment.merge(Toml::file(path));
    }

    // DRE_LLM__API_BASE_URL -> llm.api_base_url
    figment = figment.merge(Env::prefixed("DRE_").split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "dre-analyzer") {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join("dre-analyzer"))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(path)
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<Option<PathBuf>> {
    let config_file = get_config_dir()?.join("config.toml");
    if config_file.exists() {
        return Ok(None);
    }

    let mut config = Config::default();
    // Placeholders the operator is expected to edit
    config.llm.api_base_url = Some("https://api.groq.com/openai/v1".to_string());
    config.llm.default_model = Some("llama-3.3-70b-versatile".to_string());

    save_config(&config, Some(config_file)).map(Some)
}

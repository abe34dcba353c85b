//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.aiko/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AikoConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub assistant_name: Option<String>,
    pub greeting: Option<String>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "google/gemini-flash-1.5";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ASSISTANT_NAME: &str = "Aiko";
pub const DEFAULT_GREETING: &str =
    "Hi! I'm Aiko. I'm now powered by OpenRouter! How can I help you today? 💋";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = crate::inference::providers::openrouter::DEFAULT_BASE_URL;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    pub request_timeout: Duration,
    pub assistant_name: String,
    pub greeting: String,
    pub system_prompt: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            system_prompt: None,
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
        }
    }
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.aiko/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".aiko").join("config.toml"))
}

/// Load config from `~/.aiko/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AikoConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AikoConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AikoConfig::default());
        }
    };
    load_config_from(&path)
}

/// Same as [`load_config`] for an explicit path.
pub fn load_config_from(path: &Path) -> Result<AikoConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AikoConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AikoConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", redacted(&config));
    Ok(config)
}

/// Debug view of the config that never prints the API key.
fn redacted(config: &AikoConfig) -> String {
    format!(
        "general={:?}, openrouter.base_url={:?}, openrouter.api_key={}",
        config.general,
        config.openrouter.base_url,
        if config.openrouter.api_key.is_some() { "<set>" } else { "<unset>" }
    )
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Aiko Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# model = "google/gemini-flash-1.5"   # Or set AIKO_MODEL, or pass --model
# request_timeout_secs = 30           # Or pass --timeout
# assistant_name = "Aiko"
# greeting = "Hi! I'm Aiko. How can I help you today?"
# system_prompt = "You are Aiko, a friendly and playful assistant."

# [openrouter]
# api_key = "sk-or-..."               # Or set OPENROUTER_API_KEY env var
# base_url = "https://openrouter.ai/api/v1"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AikoConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &AikoConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .clone()
        .or_else(|| env("AIKO_MODEL"))
        .or_else(|| config.general.model.clone())
        .unwrap_or(defaults.model_name);

    // Timeout: CLI → config → default. Zero would fail every request.
    let timeout_secs = cli
        .timeout_secs
        .or(config.general.request_timeout_secs)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    // OpenRouter API key: env → config
    let openrouter_api_key = env("OPENROUTER_API_KEY")
        .or_else(|| config.openrouter.api_key.clone())
        .filter(|key| !key.trim().is_empty());

    // OpenRouter base URL: env → config → default
    let openrouter_base_url = env("OPENROUTER_BASE_URL")
        .or_else(|| config.openrouter.base_url.clone())
        .unwrap_or(defaults.openrouter_base_url);

    ResolvedConfig {
        model_name,
        request_timeout: Duration::from_secs(timeout_secs),
        assistant_name: config
            .general
            .assistant_name
            .clone()
            .unwrap_or(defaults.assistant_name),
        greeting: config.general.greeting.clone().unwrap_or(defaults.greeting),
        system_prompt: config
            .general
            .system_prompt
            .clone()
            .filter(|prompt| !prompt.trim().is_empty()),
        openrouter_api_key,
        openrouter_base_url,
    }
}

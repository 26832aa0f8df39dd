//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.quantum-chat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Provider;
use crate::core::conversation::DEFAULT_SYSTEM_PROMPT;
use crate::inference::providers::{DEFAULT_LMSTUDIO_BASE_URL, DEFAULT_OLLAMA_BASE_URL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub lmstudio: LmStudioConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OllamaConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LmStudioConfig {
    pub base_url: Option<String>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "deepseek-r1:1.5b";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub model_name: String,
    pub temperature: f32,
    pub system_prompt: String,
    pub ollama_base_url: String,
    pub lmstudio_base_url: String,
    pub export_dir: PathBuf,
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

/// Returns the path to `~/.quantum-chat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    let dir = dirs::home_dir()?.join(".quantum-chat");
    Some(dir.join("config.toml"))
}

/// Load config from `~/.quantum-chat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfig::default());
        }
    };

    if !path.exists() {
        info!(
            "No config file found, generating default at {}",
            path.display()
        );
        generate_default_config(&path);
        return Ok(ChatConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<ChatConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Quantum Chat Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_provider = "ollama"        # "ollama" or "lm-studio"
# default_model = "deepseek-r1:1.5b"
# temperature = 0.7                  # 0.0 - 1.0
# system_prompt = "You are a helpful AI assistant."
# export_dir = "."                   # where chat_history.pdf is written

# [ollama]
# base_url = "http://localhost:11434"  # Or set OLLAMA_BASE_URL env var

# [lmstudio]
# base_url = "http://localhost:1234/v1"  # Or set LM_STUDIO_BASE_URL env var
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

fn parse_provider(name: &str) -> Option<Provider> {
    match Provider::from_str(name, true) {
        Ok(p) => Some(p),
        Err(_) => {
            warn!("Unknown provider '{}', falling back to default", name);
            None
        }
    }
}

fn clamp_temperature(value: f32) -> f32 {
    if value.is_nan() {
        warn!("Temperature is NaN, using default");
        return DEFAULT_TEMPERATURE;
    }
    value.clamp(0.0, 1.0)
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .or_else(|| {
            std::env::var("QUANTUM_CHAT_PROVIDER")
                .ok()
                .and_then(|s| parse_provider(&s))
        })
        .or_else(|| {
            config
                .general
                .default_provider
                .as_deref()
                .and_then(parse_provider)
        })
        .unwrap_or_default();

    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .clone()
        .or_else(|| std::env::var("QUANTUM_CHAT_MODEL").ok())
        .or_else(|| config.general.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let temperature = clamp_temperature(
        cli.temperature
            .or(config.general.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
    );

    let system_prompt = config
        .general
        .system_prompt
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
        .to_string();

    // Base URLs: env → config → default
    let ollama_base_url = std::env::var("OLLAMA_BASE_URL")
        .ok()
        .or_else(|| config.ollama.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string());

    let lmstudio_base_url = std::env::var("LM_STUDIO_BASE_URL")
        .ok()
        .or_else(|| config.lmstudio.base_url.clone())
        .unwrap_or_else(|| DEFAULT_LMSTUDIO_BASE_URL.to_string());

    ResolvedConfig {
        provider,
        model_name,
        temperature,
        system_prompt,
        ollama_base_url,
        lmstudio_base_url,
        export_dir: config
            .general
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

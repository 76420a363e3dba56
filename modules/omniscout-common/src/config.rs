use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Secrets and endpoint overrides loaded from environment variables.
/// Model and export settings live in the TOML [`FileConfig`].
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_base_url: Option<String>,
}

impl Config {
    /// Load from the environment (and `.env`, if present).
    ///
    /// `GEMINI_API_KEY` wins over the legacy `API_KEY`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| anyhow!("GEMINI_API_KEY (or API_KEY) environment variable is required"))?;

        let config = Self {
            gemini_api_key,
            gemini_base_url: std::env::var("GEMINI_BASE_URL").ok().filter(|v| !v.is_empty()),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  GEMINI_API_KEY: {}", preview(&self.gemini_api_key));
        tracing::info!(
            "  GEMINI_BASE_URL: {}",
            self.gemini_base_url.as_deref().unwrap_or("<default>")
        );
    }
}

fn preview(val: &str) -> String {
    if val.is_empty() {
        return "<empty>".to_string();
    }
    let prefix: String = val.chars().take(5).collect();
    format!("{}...({} chars)", prefix, val.len())
}

/// Sampling parameters sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
        }
    }
}

/// TOML-backed configuration loaded from disk. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub name: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let sampling = SamplingParams::default();
        Self {
            name: DEFAULT_MODEL.to_string(),
            temperature: sampling.temperature,
            top_k: sampling.top_k,
            top_p: sampling.top_p,
        }
    }
}

impl ModelConfig {
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Directory export files are written to. Defaults to the working directory.
    pub dir: Option<PathBuf>,
}

impl FileConfig {
    /// Load and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: FileConfig = toml::from_str(content)?;
        if config.model.name.trim().is_empty() {
            return Err(anyhow!("model.name must not be empty"));
        }
        Ok(config)
    }
}

//! API configuration - YAML file with environment overrides

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_NAME, DEFAULT_API_BASE, DEFAULT_IMAGE_BASE, DEFAULT_LANGUAGE};

/// On-disk shape of `~/.marquee/config.yaml`. Every field is optional so
/// a file may carry only the token.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub api_token: Option<String>,
    pub image_base: Option<String>,
    pub language: Option<String>,
}

/// Resolved configuration used by the request builder and image loader
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub base_url: Url,
    pub api_key: String,
    pub api_token: String,
    pub image_base_url: Url,
    pub language: String,
}

impl ApiConfig {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self> {
        ApiConfig::resolve(
            ConfigFile {
                api_base: Some(base_url.to_string()),
                api_token: Some(api_token.to_string()),
                ..ConfigFile::default()
            },
            |_| None,
        )
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join("config.yaml")
    }

    /// Load the config file (if present) and apply `TMDB_*` environment overrides
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path(), |key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            ConfigFile::default()
        };
        Self::resolve(file, env)
    }

    fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pick = |var: &str, from_file: Option<String>| {
            env(var).filter(|v| !v.trim().is_empty()).or(from_file)
        };

        let base = pick("TMDB_API_BASE", file.api_base).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_key = pick("TMDB_API_KEY", file.api_key).unwrap_or_default();
        let api_token = pick("TMDB_API_TOKEN", file.api_token).unwrap_or_default();
        let image_base = pick("TMDB_IMAGE_BASE", file.image_base)
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string());
        let language = file.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        if api_key.is_empty() && api_token.is_empty() {
            bail!(
                "no API credentials: set TMDB_API_TOKEN or TMDB_API_KEY, or add api_token to {}",
                Self::default_path().display()
            );
        }

        let base_url = parse_absolute(&base).context("invalid API base URL")?;
        let image_base_url = parse_absolute(&image_base).context("invalid image base URL")?;

        Ok(ApiConfig {
            base_url,
            api_key,
            api_token,
            image_base_url,
            language,
        })
    }

    /// Host and port for connectivity probes
    pub fn probe_address(&self) -> Option<(String, u16)> {
        let host = self.base_url.host_str()?.to_string();
        let port = self.base_url.port_or_known_default()?;
        Some((host, port))
    }
}

fn parse_absolute(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(anyhow!("{} is not an absolute http(s) URL", raw));
    }
    Ok(url)
}

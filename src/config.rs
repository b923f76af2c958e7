use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DosewiseConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub shell: ShellConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognition engine executable, looked up on `PATH` when not absolute.
    pub command: String,
    /// Tesseract language pack passed via `-l`.
    pub language: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ShellConfig {
    /// Base URL of the catalog API the shell loads from.
    pub api_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_dosewise_dir()
            .join("catalog.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".into(),
            language: "chi_sim".into(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:3001".into(),
        }
    }
}

/// Returns `~/.dosewise/`, or `./.dosewise/` when no home directory is known.
pub fn default_dosewise_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dosewise")
}

/// Returns the default config file path: `~/.dosewise/config.toml`
pub fn default_config_path() -> PathBuf {
    default_dosewise_dir().join("config.toml")
}

impl DosewiseConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            DosewiseConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (DOSEWISE_HOST, DOSEWISE_PORT,
    /// DOSEWISE_LOG_LEVEL, DOSEWISE_DB, DOSEWISE_OCR_COMMAND, DOSEWISE_API_URL).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DOSEWISE_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("DOSEWISE_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("DOSEWISE_PORT is not a valid port: {val}"))?;
        }
        if let Ok(val) = std::env::var("DOSEWISE_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("DOSEWISE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("DOSEWISE_OCR_COMMAND") {
            self.ocr.command = val;
        }
        if let Ok(val) = std::env::var("DOSEWISE_API_URL") {
            self.shell.api_url = val;
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// `host:port` the API server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

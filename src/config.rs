//! Runtime configuration.
//!
//! Values are resolved from four tiers, lowest priority first:
//! 1. **Defaults** - compiled in
//! 2. **File** - optional YAML file passed with `--config`
//! 3. **Environment** - `HOST`, `PORT`, `CONFIGS_DIR`, `WEB_DIR`, `DEBUG`
//! 4. **CLI** - flags on the command line

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONFIGS_DIR: &str = "./configs";
pub const DEFAULT_WEB_DIR: &str = "./web";

/// Effective application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address to bind the HTTP server to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding one kubeconfig per file.
    #[serde(default = "default_configs_dir")]
    pub configs_dir: PathBuf,

    /// Directory checked for an `index.html` overriding the built-in page.
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,

    /// Enable debug logging.
    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            configs_dir: default_configs_dir(),
            web_dir: default_web_dir(),
            debug: false,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_configs_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIGS_DIR)
}

fn default_web_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WEB_DIR)
}

impl AppConfig {
    /// Load configuration from a YAML file. Missing keys take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` to read variables. Empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = get("HOST") {
            self.host = host;
        }

        if let Some(port) = get("PORT") {
            self.port = match port.parse() {
                Ok(port) => port,
                Err(_) => bail!("Invalid PORT value: {}", port),
            };
        }

        if let Some(dir) = get("CONFIGS_DIR") {
            self.configs_dir = PathBuf::from(dir);
        }

        if let Some(dir) = get("WEB_DIR") {
            self.web_dir = PathBuf::from(dir);
        }

        if let Some(debug) = get("DEBUG").and_then(|v| parse_bool(&v)) {
            self.debug = debug;
        }

        Ok(())
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Boolean parsing matching the spellings accepted by common env conventions.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub primary_path: String,
    pub fallback_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Environment variable that overrides the primary dataset path
pub const DATASET_ENV_VAR: &str = "DASHBOARD_DATASET";

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[dataset]
primary_path = "dashboard/merged_dataset.csv"
fallback_path = "merged_dataset.csv"

[server]
host = "0.0.0.0"
port = 3000
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable
/// 2. Falls back to embedded default config
///
/// `DASHBOARD_DATASET` replaces the primary dataset path in either case.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = match find_config_file() {
        Some(config_path) => {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            parse_config(&contents)?
        }
        None => {
            tracing::info!("Using default embedded configuration");
            parse_config(DEFAULT_CONFIG)?
        }
    };

    if let Ok(primary) = std::env::var(DATASET_ENV_VAR) {
        tracing::info!("{} overrides primary dataset path: {}", DATASET_ENV_VAR, primary);
        config.dataset.primary_path = primary;
    }

    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

fn find_config_file() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    let config_path = exe_path.parent()?.join("config.toml");
    if config_path.exists() {
        Some(config_path)
    } else {
        tracing::warn!("config.toml not found at: {}", config_path.display());
        None
    }
}

impl DatasetConfig {
    /// Dataset paths; relative paths stay relative to the working directory
    pub fn paths(&self) -> (PathBuf, PathBuf) {
        (
            Path::new(&self.primary_path).to_path_buf(),
            Path::new(&self.fallback_path).to_path_buf(),
        )
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

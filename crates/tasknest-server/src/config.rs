use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::cli::ServerCli;

pub const BIND_ENV: &str = "TASKNEST_BIND";
pub const DATA_FILE_ENV: &str = "TASKNEST_DATA_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub data_file: Option<PathBuf>,
    /// Empty means any origin may call the API.
    pub cors_origins: Vec<String>,
    #[serde(skip)]
    pub loaded_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            data_file: None,
            cors_origins: Vec::new(),
            loaded_file: None,
        }
    }
}

impl ServerConfig {
    /// Loads the config file. An explicit path must exist; the default path
    /// is optional.
    #[tracing::instrument(skip(path_override))]
    pub fn load(path_override: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path_override {
            Some(path) => (Some(expand_tilde(path)), true),
            None => (default_config_path(), false),
        };

        let Some(path) = path else {
            warn!("no config directory available; using defaults");
            return Ok(Self::default());
        };

        if !path.exists() {
            if required {
                return Err(anyhow!("config file {} does not exist", path.display()));
            }
            warn!(config = %path.display(), "no config file found; using defaults");
            return Ok(Self::default());
        }

        info!(config = %path.display(), "loading config file");
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        cfg.loaded_file = Some(path);
        Ok(cfg)
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let mut cfg: Self = toml::from_str(text)?;
        cfg.data_file = cfg.data_file.map(|path| expand_tilde(&path));
        Ok(cfg)
    }

    pub fn apply_env<I>(&mut self, vars: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                BIND_ENV => {
                    self.bind = value
                        .trim()
                        .parse()
                        .with_context(|| format!("invalid {BIND_ENV}: {value}"))?;
                    debug!(bind = %self.bind, "bind address from environment");
                }
                DATA_FILE_ENV if !value.trim().is_empty() => {
                    self.data_file = Some(expand_tilde(Path::new(value.trim())));
                    debug!(data_file = %value, "data file from environment");
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &ServerCli) {
        if let Some(bind) = cli.bind {
            self.bind = bind;
        }
        if let Some(path) = cli.data_file.as_deref() {
            self.data_file = Some(expand_tilde(path));
        }
        if !cli.cors_origins.is_empty() {
            self.cors_origins = cli.cors_origins.clone();
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tasknest").join("server.toml"))
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

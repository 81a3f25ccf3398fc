use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};

/// Environment variable consulted when no key is configured in the file.
pub const KEY_ENV_VAR: &str = "WARDEN_KEY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3001";
const DATA_FILE_NAME: &str = "users.json.enc";

/// Service configuration loaded from `~/.config/warden/config.toml`
/// (platform-specific). Every field is optional; defaults apply.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// Override for the encrypted user file path.
    pub data_file: Option<PathBuf>,
    /// Base64-encoded 256-bit store key. When absent, the key is taken
    /// from `WARDEN_KEY`, and failing that the OS keyring.
    pub key: Option<String>,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        self.bind_addr
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
    }

    /// Resolve the encrypted file path: explicit override, else
    /// `./users.json.enc` in the working directory.
    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME))
    }

    /// The configured store key, if any (config file first, then env).
    pub fn key(&self) -> Option<String> {
        self.key
            .clone()
            .or_else(|| std::env::var(KEY_ENV_VAR).ok())
            .filter(|k| !k.is_empty())
    }
}

/// Load config from the default path; if missing, return defaults.
pub fn load() -> Result<Config> {
    let path = default_path()?;
    load_from_path(path)
}

/// Load config from a given path; if missing or empty, return defaults.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let cfg: Config = toml::from_str(&contents)?;
    Ok(cfg)
}

/// Resolve the default config path (platform aware).
pub fn default_path() -> Result<PathBuf> {
    let base = config_dir().ok_or_else(|| color_eyre::eyre::eyre!("no config dir available"))?;
    Ok(base.join("warden").join("config.toml"))
}

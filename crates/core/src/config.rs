use crate::connection::{DEFAULT_PORT, DEFAULT_TRAVERSAL_SOURCE};
use crate::error::{self, GremlabError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const GREMLAB_DIR_NAME: &str = ".gremlab";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_HOST: &str = "localhost";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GremlabConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_traversal_source")]
    pub traversal_source: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            traversal_source: default_traversal_source(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// `~/.gremlab`, falling back to the working directory when no home is known.
pub fn gremlab_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(GREMLAB_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    gremlab_dir().join(CONFIG_FILE_NAME)
}

impl GremlabConfig {
    /// Reads a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let parsed: GremlabConfig = toml::from_str(&raw).map_err(error::config_parse)?;
        let config = parsed.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self).map_err(error::config_serialize)?;
        fs::write(path, raw)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.connection.host.is_empty() {
            return Err(GremlabError::Config("connection.host must not be empty".into()));
        }
        if self.connection.port == 0 {
            return Err(GremlabError::Config("connection.port must be positive".into()));
        }
        if self.connection.traversal_source.is_empty() {
            return Err(GremlabError::Config(
                "connection.traversal_source must not be empty".into(),
            ));
        }
        Ok(())
    }

    fn normalize(mut self) -> Self {
        self.connection.host = self.connection.host.trim().to_string();
        self.connection.traversal_source = self.connection.traversal_source.trim().to_string();
        self
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_traversal_source() -> String {
    DEFAULT_TRAVERSAL_SOURCE.to_string()
}

fn default_output_dir() -> PathBuf {
    gremlab_dir().join("charts")
}

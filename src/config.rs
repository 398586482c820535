use std::path::{Path, PathBuf};

use crate::logger::Config as LoggerConfig;
use garde::Validate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[garde(allow_unvalidated)]
pub struct Config {
    #[garde(dive)]
    pub logger: Option<LoggerConfig>,
    #[serde(default)]
    #[garde(dive)]
    pub hosts: HostsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[garde(allow_unvalidated)]
pub struct HostsConfig {
    /// Location of the hosts file, the platform default when absent.
    #[garde(length(min = 1))]
    pub path: Option<String>,
    /// Write a copy of the file before every modification.
    #[serde(default = "HostsConfig::default_backup")]
    pub backup: bool,
    #[serde(default = "HostsConfig::default_backup_ext")]
    #[garde(length(min = 1), pattern(r"^[A-Za-z0-9_-]+$"))]
    pub backup_ext: String,
}

impl HostsConfig {
    fn default_backup() -> bool {
        true
    }

    fn default_backup_ext() -> String {
        String::from("bak")
    }

    pub fn path(&self) -> PathBuf {
        match &self.path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(crate::hosts::default_path()),
        }
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            path: None,
            backup: Self::default_backup(),
            backup_ext: Self::default_backup_ext(),
        }
    }
}

pub fn read_from_toml(pt: impl AsRef<Path>) -> anyhow::Result<Config> {
    let b = std::fs::read(pt.as_ref())?;
    let s = String::from_utf8(b)?;
    let c: Config = toml::from_str(&s)?;
    c.validate()
        .map_err(|e| crate::Error::InvalidConfig(e.to_string().into()))?;
    Ok(c)
}

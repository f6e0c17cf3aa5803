use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::models::FtpHostConfiguration;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HostsConfig {
    #[serde(default)]
    pub hosts: Vec<FtpHostConfiguration>,
}

/// Named host configurations owned by the caller.
#[derive(Debug, Default, Clone)]
pub struct HostRegistry {
    hosts: Vec<FtpHostConfiguration>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from loaded hosts. Later duplicates of a name are
    /// skipped.
    pub fn from_hosts(hosts: Vec<FtpHostConfiguration>) -> Self {
        let mut seen_names = HashSet::new();
        let mut unique_hosts = Vec::new();
        for host in hosts {
            if seen_names.contains(&host.name) {
                tracing::warn!("Duplicate host name found: {}", host.name);
            } else {
                seen_names.insert(host.name.clone());
                unique_hosts.push(host);
            }
        }
        Self {
            hosts: unique_hosts,
        }
    }

    pub fn get(&self, name: &str) -> crate::Result<&FtpHostConfiguration> {
        self.hosts
            .iter()
            .find(|h| h.name == name)
            .ok_or_else(|| Error::UnknownHost(name.to_string()))
    }

    pub fn add(&mut self, host: FtpHostConfiguration) -> crate::Result<()> {
        host.validate()?;
        if self.hosts.iter().any(|h| h.name == host.name) {
            return Err(Error::validation(
                "name",
                format!("a host named '{}' already exists", host.name),
            ));
        }
        self.hosts.push(host);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<FtpHostConfiguration> {
        let idx = self.hosts.iter().position(|h| h.name == name)?;
        Some(self.hosts.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FtpHostConfiguration> {
        self.hosts.iter()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    hosts_file: PathBuf,
}

impl ConfigManager {
    /// Use `<config dir>/ftp-publish/hosts.toml`.
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("ftp-publish");

        Ok(Self::with_hosts_file(config_dir.join("hosts.toml")))
    }

    pub fn with_hosts_file(hosts_file: impl Into<PathBuf>) -> Self {
        Self {
            hosts_file: hosts_file.into(),
        }
    }

    pub fn load_hosts(&self) -> Result<HostRegistry> {
        // If hosts file doesn't exist, start with no hosts
        if !self.hosts_file.exists() {
            tracing::debug!("Hosts file {:?} not found", self.hosts_file);
            return Ok(HostRegistry::new());
        }

        let content =
            fs::read_to_string(&self.hosts_file).context("Failed to read hosts file")?;

        let config: HostsConfig =
            toml::from_str(&content).context("Failed to parse hosts file")?;

        let registry = HostRegistry::from_hosts(config.hosts);
        tracing::info!(
            "Loaded {} hosts from {:?}",
            registry.len(),
            self.hosts_file
        );
        Ok(registry)
    }

    pub fn save_hosts(&self, registry: &HostRegistry) -> Result<()> {
        if let Some(dir) = self.hosts_file.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).context("Failed to create config directory")?;
            }
        }

        let config = HostsConfig {
            hosts: registry.hosts.clone(),
        };
        let toml = toml::to_string_pretty(&config).context("Failed to serialize hosts")?;
        fs::write(&self.hosts_file, toml).context("Failed to write hosts file")?;
        Ok(())
    }

    pub fn get_hosts_path(&self) -> &Path {
        &self.hosts_file
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::secret::Secret;
use crate::validation;

pub const DEFAULT_PORT: u16 = 21;
/// Milliseconds.
pub const DEFAULT_TIMEOUT: u64 = 300_000;

/// A named FTP server that build artifacts can be published to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FtpHostConfiguration {
    pub name: String,
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Secret,
    /// Directory to enter after login. Blank means "wherever the server
    /// puts us".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_root_dir: Option<String>,
    /// Control and data timeout in milliseconds, 0 disables it.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub use_active_data: bool,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

impl FtpHostConfiguration {
    pub fn new(
        name: impl Into<String>,
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: password.into(),
            remote_root_dir: None,
            timeout: DEFAULT_TIMEOUT,
            use_active_data: false,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_remote_root_dir(mut self, dir: Option<impl Into<String>>) -> Self {
        self.remote_root_dir = dir.map(Into::into);
        self
    }

    pub fn with_active_data(mut self, active: bool) -> Self {
        self.use_active_data = active;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// The configured root, or `None` when it is absent, empty or only
    /// whitespace.
    pub fn effective_remote_root(&self) -> Option<&str> {
        self.remote_root_dir
            .as_deref()
            .filter(|dir| !dir.trim().is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        validation::validate_name(&self.name)?;
        validation::validate_hostname(&self.hostname)?;
        if self.port == 0 {
            return Err(Error::validation("port", "must be a positive integer"));
        }
        Ok(())
    }
}

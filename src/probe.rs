//! "Test connection" support: connect and log in without entering the
//! remote root, then always disconnect.

use serde::Serialize;
use std::sync::Arc;

use crate::build_info::{BuildInfo, NullListener};
use crate::error::Result;
use crate::ftp::{self, FtpClientFactory, SuppaFtpFactory};
use crate::models::{FtpHostConfiguration, DEFAULT_PORT, DEFAULT_TIMEOUT};
use crate::secret::Secret;
use crate::validation;

const PROBE_NAME: &str = "connection-probe";

#[derive(Debug, Clone)]
pub struct ProbeParameters {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: Secret,
    pub timeout: u64,
    pub use_active_mode: bool,
}

impl ProbeParameters {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: Secret::default(),
            timeout: DEFAULT_TIMEOUT,
            use_active_mode: false,
        }
    }

    fn to_host_configuration(&self) -> FtpHostConfiguration {
        FtpHostConfiguration::new(
            PROBE_NAME,
            self.hostname.clone(),
            self.username.clone(),
            self.password.clone(),
        )
        .with_port(self.port)
        .with_timeout(self.timeout)
        .with_active_data(self.use_active_mode)
    }
}

impl From<&FtpHostConfiguration> for ProbeParameters {
    fn from(host: &FtpHostConfiguration) -> Self {
        Self {
            hostname: host.hostname.clone(),
            port: host.port,
            username: host.username.clone(),
            password: host.password.clone(),
            timeout: host.timeout,
            use_active_mode: host.use_active_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub success: bool,
    pub message: String,
}

impl ProbeResult {
    fn ok() -> Self {
        Self {
            success: true,
            message: "Success".to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

pub fn probe_connection(params: &ProbeParameters) -> ProbeResult {
    probe_connection_with(params, &SuppaFtpFactory)
}

/// Never fails: every error is folded into the returned result.
pub fn probe_connection_with(
    params: &ProbeParameters,
    factory: &dyn FtpClientFactory,
) -> ProbeResult {
    match try_probe(params, factory) {
        Ok(()) => {
            tracing::info!("Connection test to {}:{} succeeded", params.hostname, params.port);
            ProbeResult::ok()
        }
        Err(e) => {
            tracing::warn!("Connection test to {}:{} failed: {}", params.hostname, params.port, e);
            ProbeResult::failed(e.to_string())
        }
    }
}

fn try_probe(params: &ProbeParameters, factory: &dyn FtpClientFactory) -> Result<()> {
    validation::validate_hostname(&params.hostname)?;
    let host = params.to_host_configuration();
    host.validate()?;

    let build_info = BuildInfo::new(PROBE_NAME, "").with_listener(Arc::new(NullListener));
    let mut client = factory.create_client();
    let ret = host.connect_and_login(client.as_mut(), &build_info);
    ftp::disconnect_quietly(client.as_mut());
    ret
}

//! Publish build artifacts over FTP: named host configurations that open
//! authenticated sessions anchored at a remote root directory.

pub mod build_info;
pub mod config;
pub mod error;
pub mod ftp;
mod host;
pub mod models;
pub mod probe;
pub mod secret;
pub mod session;
pub mod validation;

pub use build_info::{BuildInfo, BuildListener, NullListener, TracingListener};
pub use config::{ConfigManager, HostRegistry};
pub use error::{Error, ErrorKind, Result};
pub use ftp::{FtpClient, FtpClientFactory, SuppaFtpClient, SuppaFtpFactory};
pub use models::{FtpHostConfiguration, DEFAULT_PORT, DEFAULT_TIMEOUT};
pub use probe::{probe_connection, probe_connection_with, ProbeParameters, ProbeResult};
pub use secret::Secret;
pub use session::FtpSession;

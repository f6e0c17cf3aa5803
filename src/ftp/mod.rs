//! FTP client capability used by the session layer.
//!
//! Sessions never talk to the network directly: they drive an
//! [`FtpClient`] obtained from an [`FtpClientFactory`], so tests and
//! alternate transports can substitute their own implementation.

#[cfg(test)]
pub(crate) mod mock;
mod stream;

pub use stream::{SuppaFtpClient, SuppaFtpFactory};

use std::io;
use std::time::Duration;

/// Reply code sent by a server that is ready for a new user.
pub const SERVICE_READY: u32 = 220;

/// Primitive operations of a blocking FTP client.
pub trait FtpClient: Send {
    /// Timeout for the control connection. Zero disables it.
    fn set_default_timeout(&mut self, timeout: Duration);
    /// Timeout for data connections. Zero disables it.
    fn set_data_timeout(&mut self, timeout: Duration);

    /// Open the control connection. An `Err` means the transport failed;
    /// a server that answered with something other than a greeting is
    /// reported through [`FtpClient::reply_code`].
    fn connect(&mut self, hostname: &str, port: u16) -> io::Result<()>;
    /// Code of the last reply received from the server.
    fn reply_code(&self) -> u32;
    /// Text of the last reply, if the client kept it.
    fn reply_string(&self) -> Option<String>;

    fn enter_local_active_mode(&mut self);
    fn enter_local_passive_mode(&mut self);

    /// `Ok(false)` when the server rejected the credentials.
    fn login(&mut self, username: &str, password: &str) -> io::Result<bool>;
    /// `Ok(false)` when the server refused to change directory.
    fn change_working_directory(&mut self, path: &str) -> io::Result<bool>;
    fn print_working_directory(&mut self) -> io::Result<String>;

    fn is_connected(&self) -> bool;
    fn disconnect(&mut self) -> io::Result<()>;
}

/// Produces a fresh client for every session.
pub trait FtpClientFactory: Send + Sync {
    fn create_client(&self) -> Box<dyn FtpClient>;
}

impl<F> FtpClientFactory for F
where
    F: Fn() -> Box<dyn FtpClient> + Send + Sync,
{
    fn create_client(&self) -> Box<dyn FtpClient> {
        self()
    }
}

/// Disconnect, logging rather than returning any failure. Used on error
/// paths where the original error must reach the caller.
pub fn disconnect_quietly(client: &mut dyn FtpClient) {
    if !client.is_connected() {
        return;
    }
    if let Err(e) = client.disconnect() {
        tracing::warn!("Error while disconnecting from FTP server: {}", e);
    }
}

use std::fmt;

use crate::ftp::FtpClient;

/// A connected, logged-in FTP session anchored at its remote root.
///
/// The connection is closed when the session is closed or dropped.
pub struct FtpSession {
    client: Box<dyn FtpClient>,
    absolute_remote_root: String,
    host_name: String,
    closed: bool,
}

impl FtpSession {
    pub(crate) fn new(
        client: Box<dyn FtpClient>,
        absolute_remote_root: String,
        host_name: String,
    ) -> Self {
        Self {
            client,
            absolute_remote_root,
            host_name,
            closed: false,
        }
    }

    /// Directory all relative operations of this session start from.
    pub fn absolute_remote_root(&self) -> &str {
        &self.absolute_remote_root
    }

    /// Name of the host configuration this session was created from.
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn client(&mut self) -> &mut dyn FtpClient {
        self.client.as_mut()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Disconnect from the server. Calling it again is a no-op, and a
    /// failure to disconnect is only logged.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if !self.client.is_connected() {
            return;
        }
        tracing::debug!("Disconnecting from {}", self.host_name);
        if let Err(e) = self.client.disconnect() {
            tracing::warn!("Error disconnecting from {}: {}", self.host_name, e);
        }
    }
}

impl Drop for FtpSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for FtpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpSession")
            .field("host_name", &self.host_name)
            .field("absolute_remote_root", &self.absolute_remote_root)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

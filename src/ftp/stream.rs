use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use suppaftp::types::Response;
use suppaftp::{FtpError, FtpStream, Mode};

use super::{FtpClient, FtpClientFactory, SERVICE_READY};

/// [`FtpClient`] backed by a `suppaftp` control connection.
pub struct SuppaFtpClient {
    stream: Option<FtpStream>,
    default_timeout: Option<Duration>,
    data_timeout: Option<Duration>,
    mode: Mode,
    reply_code: u32,
    reply_string: Option<String>,
}

impl Default for SuppaFtpClient {
    fn default() -> Self {
        Self {
            stream: None,
            default_timeout: None,
            data_timeout: None,
            mode: Mode::Passive,
            reply_code: 0,
            reply_string: None,
        }
    }
}

impl SuppaFtpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeout applied to data connections, passive connects and active
    /// accepts alike.
    pub fn data_timeout(&self) -> Option<Duration> {
        self.data_timeout
    }

    pub fn stream_mut(&mut self) -> Option<&mut FtpStream> {
        self.stream.as_mut()
    }

    fn record(&mut self, code: u32, text: Option<String>) {
        self.reply_code = code;
        self.reply_string = text;
    }

    fn record_response(&mut self, response: &Response) {
        let text = String::from_utf8_lossy(&response.body).into_owned();
        self.record(response.status.code(), Some(text));
    }

    fn stream(&mut self) -> io::Result<&mut FtpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "not connected"))
    }

    fn open(&self, hostname: &str, port: u16) -> io::Result<Result<FtpStream, Response>> {
        let mut last_err = None;
        for addr in (hostname, port).to_socket_addrs()? {
            let tcp = match connect_socket(addr, self.default_timeout) {
                Ok(tcp) => tcp,
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                    continue;
                }
            };
            // The greeting is read by connect_with_stream, so the socket
            // timeouts must already be in place.
            match FtpStream::connect_with_stream(tcp) {
                Ok(stream) => return Ok(Ok(stream)),
                Err(FtpError::UnexpectedResponse(response)) => return Ok(Err(response)),
                Err(e) => {
                    tracing::debug!("No greeting from {}: {}", addr, e);
                    last_err = Some(into_io_error(e));
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no address found for {}", hostname),
            )
        }))
    }

    /// Re-apply the data channel mode and timeout to the open stream.
    fn reconfigure(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.stream = Some(configure_data_channel(stream, self.mode, self.data_timeout));
        }
    }
}

impl FtpClient for SuppaFtpClient {
    fn set_default_timeout(&mut self, timeout: Duration) {
        self.default_timeout = non_zero(timeout);
        if let Some(stream) = self.stream.as_ref() {
            let tcp = stream.get_ref();
            if let Err(e) = tcp
                .set_read_timeout(self.default_timeout)
                .and_then(|()| tcp.set_write_timeout(self.default_timeout))
            {
                tracing::warn!("Failed to update control connection timeout: {}", e);
            }
        }
    }

    fn set_data_timeout(&mut self, timeout: Duration) {
        self.data_timeout = non_zero(timeout);
        self.reconfigure();
    }

    fn connect(&mut self, hostname: &str, port: u16) -> io::Result<()> {
        match self.open(hostname, port)? {
            Ok(stream) => {
                let stream = configure_data_channel(stream, self.mode, self.data_timeout);
                let welcome = stream.get_welcome_msg().map(str::to_string);
                self.record(SERVICE_READY, welcome);
                self.stream = Some(stream);
            }
            Err(response) => {
                // The socket is dropped here; only the greeting is kept.
                self.record_response(&response);
            }
        }
        Ok(())
    }

    fn reply_code(&self) -> u32 {
        self.reply_code
    }

    fn reply_string(&self) -> Option<String> {
        self.reply_string.clone()
    }

    fn enter_local_active_mode(&mut self) {
        self.mode = Mode::Active;
        self.reconfigure();
    }

    fn enter_local_passive_mode(&mut self) {
        self.mode = Mode::Passive;
        self.reconfigure();
    }

    fn login(&mut self, username: &str, password: &str) -> io::Result<bool> {
        let ret = self.stream()?.login(username, password);
        self.command_result(ret)
    }

    fn change_working_directory(&mut self, path: &str) -> io::Result<bool> {
        let ret = self.stream()?.cwd(path);
        self.command_result(ret)
    }

    fn print_working_directory(&mut self) -> io::Result<String> {
        let ret = self.stream()?.pwd();
        match ret {
            Ok(dir) => Ok(dir),
            Err(FtpError::UnexpectedResponse(response)) => {
                self.record_response(&response);
                Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("PWD rejected with reply code {}", response.status.code()),
                ))
            }
            Err(e) => Err(into_io_error(e)),
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn disconnect(&mut self) -> io::Result<()> {
        match self.stream.take() {
            Some(mut stream) => stream.quit().map_err(into_io_error),
            None => Ok(()),
        }
    }
}

impl SuppaFtpClient {
    /// Rejections become `Ok(false)`, everything else is a transport error.
    fn command_result(&mut self, ret: Result<(), FtpError>) -> io::Result<bool> {
        match ret {
            Ok(()) => Ok(true),
            Err(FtpError::UnexpectedResponse(response)) => {
                self.record_response(&response);
                Ok(false)
            }
            Err(e) => Err(into_io_error(e)),
        }
    }
}

fn non_zero(timeout: Duration) -> Option<Duration> {
    if timeout.is_zero() {
        None
    } else {
        Some(timeout)
    }
}

fn connect_socket(addr: SocketAddr, timeout: Option<Duration>) -> io::Result<TcpStream> {
    let tcp = match timeout {
        Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
        None => TcpStream::connect(addr)?,
    };
    tcp.set_read_timeout(timeout)?;
    tcp.set_write_timeout(timeout)?;
    Ok(tcp)
}

/// Active mode waits at most `data_timeout` for the server to connect back;
/// passive mode connects and reads with it.
fn configure_data_channel(
    stream: FtpStream,
    mode: Mode,
    data_timeout: Option<Duration>,
) -> FtpStream {
    match mode {
        Mode::Active => stream.active_mode(data_timeout.unwrap_or(Duration::MAX)),
        mode => {
            let mut stream = stream.passive_stream_builder(move |addr| {
                connect_socket(addr, data_timeout).map_err(FtpError::ConnectionError)
            });
            stream.set_mode(mode);
            stream
        }
    }
}

fn into_io_error(e: FtpError) -> io::Error {
    match e {
        FtpError::ConnectionError(e) => e,
        e => io::Error::new(io::ErrorKind::Other, e.to_string()),
    }
}

/// Default factory: one new `SuppaFtpClient` per session.
#[derive(Debug, Default, Clone, Copy)]
pub struct SuppaFtpFactory;

impl FtpClientFactory for SuppaFtpFactory {
    fn create_client(&self) -> Box<dyn FtpClient> {
        Box::new(SuppaFtpClient::new())
    }
}

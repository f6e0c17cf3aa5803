use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{FtpClient, FtpClientFactory, SERVICE_READY};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DefaultTimeout(Duration),
    DataTimeout(Duration),
    Connect(String, u16),
    ReplyCode,
    ActiveMode,
    PassiveMode,
    Login(String, String),
    Cwd(String),
    Pwd,
    Disconnect,
}

/// Scripted answers for a [`MockClient`].
#[derive(Debug, Clone)]
pub struct Script {
    pub connect_error: Option<io::ErrorKind>,
    pub greeting: u32,
    pub login: bool,
    pub cwd: bool,
    pub pwd: Option<String>,
    pub disconnect_error: bool,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            connect_error: None,
            greeting: SERVICE_READY,
            login: true,
            cwd: true,
            pwd: Some("/pub".to_string()),
            disconnect_error: false,
        }
    }
}

/// Records every call in order so tests can assert on the exact
/// sequence a session performs.
pub struct MockClient {
    script: Script,
    calls: Arc<Mutex<Vec<Call>>>,
    connected: bool,
}

impl MockClient {
    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl FtpClient for MockClient {
    fn set_default_timeout(&mut self, timeout: Duration) {
        self.push(Call::DefaultTimeout(timeout));
    }

    fn set_data_timeout(&mut self, timeout: Duration) {
        self.push(Call::DataTimeout(timeout));
    }

    fn connect(&mut self, hostname: &str, port: u16) -> io::Result<()> {
        self.push(Call::Connect(hostname.to_string(), port));
        if let Some(kind) = self.script.connect_error {
            return Err(io::Error::new(kind, "connection refused"));
        }
        self.connected = true;
        Ok(())
    }

    fn reply_code(&self) -> u32 {
        self.push(Call::ReplyCode);
        self.script.greeting
    }

    fn reply_string(&self) -> Option<String> {
        Some(format!("{} mock reply", self.script.greeting))
    }

    fn enter_local_active_mode(&mut self) {
        self.push(Call::ActiveMode);
    }

    fn enter_local_passive_mode(&mut self) {
        self.push(Call::PassiveMode);
    }

    fn login(&mut self, username: &str, password: &str) -> io::Result<bool> {
        self.push(Call::Login(username.to_string(), password.to_string()));
        Ok(self.script.login)
    }

    fn change_working_directory(&mut self, path: &str) -> io::Result<bool> {
        self.push(Call::Cwd(path.to_string()));
        Ok(self.script.cwd)
    }

    fn print_working_directory(&mut self) -> io::Result<String> {
        self.push(Call::Pwd);
        self.script
            .pwd
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "PWD failed"))
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> io::Result<()> {
        self.push(Call::Disconnect);
        self.connected = false;
        if self.script.disconnect_error {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
        }
        Ok(())
    }
}

/// Hands out [`MockClient`]s sharing one call log.
#[derive(Clone, Default)]
pub struct MockFactory {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockFactory {
    pub fn new(script: Script) -> Self {
        let factory = Self::default();
        factory.scripts.lock().unwrap().push_back(script);
        factory
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }
}

impl FtpClientFactory for MockFactory {
    fn create_client(&self) -> Box<dyn FtpClient> {
        let script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        Box::new(MockClient {
            script,
            calls: Arc::clone(&self.calls),
            connected: false,
        })
    }
}

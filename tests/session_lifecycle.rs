use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ftp_publish::{
    BuildInfo, ErrorKind, FtpClient, FtpHostConfiguration, NullListener,
};

/// Minimal in-memory server: accepts one user and knows one directory.
struct FakeServer {
    log: Arc<Mutex<Vec<String>>>,
    connected: bool,
    cwd: String,
}

impl FtpClient for FakeServer {
    fn set_default_timeout(&mut self, _timeout: Duration) {}

    fn set_data_timeout(&mut self, _timeout: Duration) {}

    fn connect(&mut self, hostname: &str, port: u16) -> io::Result<()> {
        self.log.lock().unwrap().push(format!("connect {}:{}", hostname, port));
        self.connected = true;
        Ok(())
    }

    fn reply_code(&self) -> u32 {
        220
    }

    fn reply_string(&self) -> Option<String> {
        None
    }

    fn enter_local_active_mode(&mut self) {}

    fn enter_local_passive_mode(&mut self) {}

    fn login(&mut self, username: &str, password: &str) -> io::Result<bool> {
        Ok(username == "ci" && password == "secret")
    }

    fn change_working_directory(&mut self, path: &str) -> io::Result<bool> {
        if path == "/pub/builds" {
            self.cwd = path.to_string();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn print_working_directory(&mut self) -> io::Result<String> {
        Ok(self.cwd.clone())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) -> io::Result<()> {
        self.log.lock().unwrap().push("disconnect".to_string());
        self.connected = false;
        Ok(())
    }
}

fn factory(log: &Arc<Mutex<Vec<String>>>) -> impl Fn() -> Box<dyn FtpClient> + Send + Sync {
    let log = Arc::clone(log);
    move || -> Box<dyn FtpClient> {
        Box::new(FakeServer {
            log: Arc::clone(&log),
            connected: false,
            cwd: "/home/ci".to_string(),
        })
    }
}

fn build_info() -> BuildInfo {
    BuildInfo::new("1", ".").with_listener(Arc::new(NullListener))
}

#[test]
fn session_uses_home_directory_when_root_is_blank() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let host = FtpHostConfiguration::new("home", "ftp.example.com", "ci", "secret");
    let session = host.create_session_with(&build_info(), &factory(&log)).unwrap();
    assert_eq!(session.absolute_remote_root(), "/home/ci");
    drop(session);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["connect ftp.example.com:21".to_string(), "disconnect".to_string()]
    );
}

#[test]
fn session_enters_configured_root() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let host = FtpHostConfiguration::new("builds", "ftp.example.com", "ci", "secret")
        .with_remote_root_dir(Some("/pub/builds"));
    let root = host
        .with_session_using(&build_info(), &factory(&log), |session| {
            assert_eq!(session.client().print_working_directory().unwrap(), "/pub/builds");
            Ok(session.absolute_remote_root().to_string())
        })
        .unwrap();
    assert_eq!(root, "/pub/builds");
    assert_eq!(log.lock().unwrap().last().map(String::as_str), Some("disconnect"));
}

#[test]
fn failures_close_the_connection() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let bad_login = FtpHostConfiguration::new("x", "ftp.example.com", "ci", "wrong");
    let err = bad_login
        .create_session_with(&build_info(), &factory(&log))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authentication);

    let bad_root = FtpHostConfiguration::new("x", "ftp.example.com", "ci", "secret")
        .with_remote_root_dir(Some("/nope"));
    let err = bad_root
        .create_session_with(&build_info(), &factory(&log))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Directory);

    let log = log.lock().unwrap();
    assert_eq!(log.iter().filter(|l| *l == "disconnect").count(), 2);
}

#[test]
fn sessions_can_be_sent_to_other_threads() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let host = FtpHostConfiguration::new("home", "ftp.example.com", "ci", "secret");
    let session = host.create_session_with(&build_info(), &factory(&log)).unwrap();
    let root = std::thread::spawn(move || session.absolute_remote_root().to_string())
        .join()
        .unwrap();
    assert_eq!(root, "/home/ci");
}

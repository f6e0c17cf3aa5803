use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of a failure, used by callers that only care about
/// which phase of session setup went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or the server was not ready for service.
    Connection,
    /// Login rejected.
    Authentication,
    /// Remote root could not be entered or queried.
    Directory,
    /// Bad configuration, caught before any network action.
    Validation,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("no FTP host configuration named '{0}'")]
    UnknownHost(String),
    #[error("unable to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
    #[error("{host}:{port} is not ready for service (reply code {code}){}", reply_suffix(.reply))]
    ServiceNotReady {
        host: String,
        port: u16,
        code: u32,
        reply: Option<String>,
    },
    // never carries the password
    #[error("login as '{username}' on {host}:{port} failed")]
    Authentication {
        host: String,
        port: u16,
        username: String,
    },
    #[error("unable to change into remote root directory '{directory}' on {host}{}", source_suffix(.source))]
    Directory {
        host: String,
        directory: String,
        #[source]
        source: Option<io::Error>,
    },
    #[error("unable to query the working directory on {host}: {source}")]
    WorkingDirectory {
        host: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::UnknownHost(_) => ErrorKind::Validation,
            Error::Connect { .. } | Error::ServiceNotReady { .. } => ErrorKind::Connection,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Directory { .. } | Error::WorkingDirectory { .. } => ErrorKind::Directory,
        }
    }
}

fn reply_suffix(reply: &Option<String>) -> String {
    match reply.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(": {}", text),
        _ => String::new(),
    }
}

fn source_suffix(source: &Option<io::Error>) -> String {
    match source {
        Some(e) => format!(": {}", e),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let e = Error::validation("port", "must be positive");
        assert_eq!(e.kind(), ErrorKind::Validation);

        let e = Error::ServiceNotReady {
            host: "ftp.example.com".into(),
            port: 21,
            code: 421,
            reply: None,
        };
        assert_eq!(e.kind(), ErrorKind::Connection);

        let e = Error::WorkingDirectory {
            host: "ftp.example.com".into(),
            source: io::Error::new(io::ErrorKind::Other, "boom"),
        };
        assert_eq!(e.kind(), ErrorKind::Directory);
    }

    #[test]
    fn test_not_ready_message_includes_reply() {
        let e = Error::ServiceNotReady {
            host: "ftp.example.com".into(),
            port: 2121,
            code: 421,
            reply: Some("421 Too many users\r\n".into()),
        };
        assert_eq!(
            e.to_string(),
            "ftp.example.com:2121 is not ready for service (reply code 421): 421 Too many users"
        );
    }

    #[test]
    fn test_directory_message_names_directory() {
        let e = Error::Directory {
            host: "ftp.example.com".into(),
            directory: "/pub/builds".into(),
            source: None,
        };
        assert_eq!(
            e.to_string(),
            "unable to change into remote root directory '/pub/builds' on ftp.example.com"
        );
    }
}

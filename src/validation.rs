//! Field validators for host configuration input.
//!
//! These are pure: they never touch the network, so a front-end can run
//! them on every keystroke.

use crate::error::{Error, Result};

pub fn validate_name(value: &str) -> Result<()> {
    required("name", value)
}

pub fn validate_hostname(value: &str) -> Result<()> {
    required("hostname", value)
}

/// Parse a port number. Zero is rejected.
pub fn validate_port(value: &str) -> Result<u16> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation("port", "required"));
    }
    match value.parse::<u16>() {
        Ok(0) => Err(Error::validation("port", "must be a positive integer")),
        Ok(port) => Ok(port),
        Err(_) => Err(Error::validation(
            "port",
            format!("'{}' is not a positive integer up to 65535", value),
        )),
    }
}

/// Parse a timeout in milliseconds. Zero disables the timeout.
pub fn validate_timeout(value: &str) -> Result<u64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation("timeout", "required"));
    }
    value.parse::<u64>().map_err(|_| {
        Error::validation(
            "timeout",
            format!("'{}' is not a non-negative integer", value),
        )
    })
}

fn required(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::validation(field, "required"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_name_and_hostname() {
        assert!(validate_name("myTestConfig").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_hostname("my.test.hostname").is_ok());
        assert_eq!(
            validate_hostname("\t").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_port() {
        assert_eq!(validate_port("21").unwrap(), 21);
        assert_eq!(validate_port(" 2121 ").unwrap(), 2121);
        assert!(validate_port("0").is_err());
        assert!(validate_port("-1").is_err());
        assert!(validate_port("65536").is_err());
        assert!(validate_port("ftp").is_err());
        assert!(validate_port("").is_err());
    }

    #[test]
    fn test_timeout() {
        assert_eq!(validate_timeout("0").unwrap(), 0);
        assert_eq!(validate_timeout("300000").unwrap(), 300_000);
        assert!(validate_timeout("-5").is_err());
        assert!(validate_timeout("1.5").is_err());
        assert!(validate_timeout(" ").is_err());
    }
}

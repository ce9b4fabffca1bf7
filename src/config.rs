//! Server configuration.
//!
//! Every option can be given on the command line or through a `DICTD_*`
//! environment variable. Defaults match the classic deployment: port 5001 on
//! all interfaces, 100 words, a 5 second idle window and the echo quirk on.

use crate::connection::SessionConfig;
use crate::storage::DEFAULT_CAPACITY;
use crate::{DEFAULT_HOST, DEFAULT_IDLE_TIMEOUT, DEFAULT_PORT};
use clap::Parser;
use std::time::Duration;

/// Command-line and environment configuration for `dictd`.
#[derive(Debug, Clone, Parser)]
#[command(name = "dictd", version, about = "Shared word/definition dictionary over TCP")]
pub struct Config {
    /// Host to bind to
    #[arg(short = 'H', long, env = "DICTD_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "DICTD_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds a client may stay silent before it is disconnected
    #[arg(
        short = 't',
        long = "idle-timeout",
        env = "DICTD_IDLE_TIMEOUT",
        value_name = "SECS",
        default_value = "5",
        value_parser = parse_seconds
    )]
    pub idle_timeout: Duration,

    /// Maximum number of words in the dictionary
    #[arg(short, long, env = "DICTD_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Do not echo the request line after each reply
    #[arg(long, env = "DICTD_NO_ECHO")]
    pub no_echo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            capacity: DEFAULT_CAPACITY,
            no_echo: false,
        }
    }
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-connection settings derived from this configuration.
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            idle_timeout: self.idle_timeout,
            echo: !self.no_echo,
        }
    }
}

/// Parses a (possibly fractional) number of seconds.
fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("invalid number of seconds: {}", value))?;

    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("idle timeout must be positive: {}", value));
    }

    Duration::try_from_secs_f64(secs)
        .map_err(|e| format!("invalid idle timeout {}: {}", value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.port, 5001);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.idle_timeout, Duration::from_secs(5));
        assert_eq!(config.capacity, 100);
        assert!(!config.no_echo);
        assert_eq!(config.bind_address(), "0.0.0.0:5001");
    }

    #[test]
    fn test_flags() {
        let config = Config::parse_from([
            "dictd",
            "--port",
            "6000",
            "-H",
            "127.0.0.1",
            "--idle-timeout",
            "0.5",
            "--capacity",
            "10",
            "--no-echo",
        ]);

        assert_eq!(config.bind_address(), "127.0.0.1:6000");
        assert_eq!(config.idle_timeout, Duration::from_millis(500));
        assert_eq!(config.capacity, 10);

        let session = config.session();
        assert!(!session.echo);
        assert_eq!(session.idle_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        assert!(Config::try_parse_from(["dictd", "-t", "0"]).is_err());
        assert!(Config::try_parse_from(["dictd", "-t", "soon"]).is_err());
        assert!(Config::try_parse_from(["dictd", "-p", "70000"]).is_err());
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("5"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_seconds("0.25"), Ok(Duration::from_millis(250)));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("inf").is_err());
    }

    #[test]
    fn test_huge_timeout_rejected() {
        assert!(parse_seconds("1e30").is_err());
        assert!(Config::try_parse_from(["dictd", "-t", "1e30"]).is_err());
    }

    #[test]
    fn test_clap_defaults_match_default() {
        let parsed = Config::try_parse_from(["dictd"]).unwrap();
        let expected = Config::default();

        // Fields without a DICTD_* override in the test environment
        if std::env::var_os("DICTD_IDLE_TIMEOUT").is_none() {
            assert_eq!(parsed.idle_timeout, expected.idle_timeout);
        }
        if std::env::var_os("DICTD_CAPACITY").is_none() {
            assert_eq!(parsed.capacity, expected.capacity);
        }
        if std::env::var_os("DICTD_PORT").is_none() {
            assert_eq!(parsed.port, expected.port);
        }
        if std::env::var_os("DICTD_HOST").is_none() {
            assert_eq!(parsed.host, expected.host);
        }
    }
}

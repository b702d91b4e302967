//! Service configuration.
//!
//! Values come from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0` | interface to listen on |
//! | `PORT` | per service | TCP port |
//! | `LOG_FORMAT` | `pretty` | `pretty` or `json` log output |
//!
//! Log filtering itself is controlled by `RUST_LOG`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use anyhow::Context;

/// Default port of the document service.
pub const DOCUMENT_SERVICE_PORT: u16 = 8000;
/// Default port of the graph service.
pub const GRAPH_SERVICE_PORT: u16 = 8001;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line, with ANSI colours.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown LOG_FORMAT '{other}', expected 'pretty' or 'json'"),
        }
    }
}

/// The configuration parameters for one service binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// The interface to listen for HTTP requests on.
    pub bind_addr: IpAddr,
    /// The port to listen for HTTP requests on.
    pub port: u16,
    pub log_format: LogFormat,
}

impl ServiceConfig {
    /// Read the configuration from the process environment.
    pub fn from_env(default_port: u16) -> anyhow::Result<Self> {
        Self::from_vars(default_port, |key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(default_port: u16, var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = match var("BIND_ADDR") {
            Some(raw) => raw.parse::<IpAddr>().with_context(|| format!("BIND_ADDR '{raw}' is not an IP address"))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("PORT '{raw}' is not a valid port"))?,
            None => default_port,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>()?,
            None => LogFormat::default(),
        };

        Ok(Self { bind_addr, port, log_format })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

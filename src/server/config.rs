//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Consume timeout applied when a request gives none
pub const DEFAULT_CONSUME_TIMEOUT: Duration = Duration::from_secs(5);

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Consume timeout when the request has no `timeout` parameter
    pub default_consume_timeout: Duration,

    /// Stats logging interval (zero = disabled)
    pub stats_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            default_consume_timeout: DEFAULT_CONSUME_TIMEOUT,
            stats_interval: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the default consume timeout (zero falls back to the built-in default)
    pub fn default_consume_timeout(mut self, timeout: Duration) -> Self {
        self.default_consume_timeout = if timeout.is_zero() {
            DEFAULT_CONSUME_TIMEOUT
        } else {
            timeout
        };
        self
    }

    /// Set stats logging interval
    pub fn stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval;
        self
    }

    /// Disable periodic stats logging
    pub fn disable_stats(self) -> Self {
        self.stats_interval(Duration::ZERO)
    }
}

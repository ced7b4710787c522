//! Server configuration

use std::time::Duration;

/// Default grace period between the shutdown notice and closing the listener
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Default deadline after which the process exits regardless of open work
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Server configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to bind to (0 = pick an ephemeral port)
    pub port: u16,

    /// Time clients get to react to `server-shutdown` before sockets close
    pub shutdown_grace: Duration,

    /// Forced exit deadline, counted from the first drain signal
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Set the host address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the shutdown grace period
    pub fn shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Set the forced shutdown timeout
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// `host:port` string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Forced shutdown timeout, raised to the grace period if configured lower
    pub fn effective_shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout.max(self.shutdown_grace)
    }
}

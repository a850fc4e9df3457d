use std::time::Duration;

use strategos_settings::ServerSettings;

/// Runtime configuration of the HTTP server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    /// `0` lets the OS pick a port.
    pub port: u16,
    pub keep_alive: Duration,
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    pub fn from_settings(settings: &ServerSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            keep_alive: Duration::from_secs(settings.keep_alive_secs.max(1)),
            shutdown_timeout: Duration::from_secs(settings.shutdown_timeout_secs),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            keep_alive: Duration::from_secs(15),
            shutdown_timeout: Duration::from_secs(10),
        }
    }
}

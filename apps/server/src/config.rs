//! Server configuration.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Public base URL of the web client, used to build invitation signup
    /// links.
    pub public_url: String,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("CLASSYNC_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("CLASSYNC_SERVER_PORT")
                .unwrap_or_else(|_| "4860".to_string())
                .parse()
                .unwrap_or(4860),
            public_url: env::var("CLASSYNC_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            log_level: env::var("CLASSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the public base URL without a trailing slash.
    pub fn public_base(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        // SAFETY: Tests run serially or in isolation
        unsafe {
            env::remove_var("CLASSYNC_SERVER_HOST");
            env::remove_var("CLASSYNC_SERVER_PORT");
            env::remove_var("CLASSYNC_PUBLIC_URL");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.server_addr(), "0.0.0.0:4860");
        assert_eq!(config.public_base(), "http://localhost:5173");
    }
}

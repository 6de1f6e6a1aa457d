//! Server configuration

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP listener
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Port for the gRPC listener
    #[serde(default = "default_grpc_port")]
    pub grpc_port: u16,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// CORS allowed origins (comma-separated)
    pub cors_origins: Option<String>,
}

impl ServerConfig {
    /// Get the HTTP socket address to bind to.
    pub fn http_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.http_port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Get the gRPC socket address to bind to.
    pub fn grpc_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.grpc_port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Get CORS origins as a vector
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_ref()
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default()
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.http_port == 0 || self.grpc_port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.http_port == self.grpc_port {
            return Err(ValidationError::PortCollision);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            grpc_port: default_grpc_port(),
            log_level: default_log_level(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_grpc_port() -> u16 {
    50051
}

fn default_log_level() -> String {
    "info,room_service=debug,sqlx=warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.grpc_port, 50051);
    }

    #[test]
    fn test_socket_addrs() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            http_port: 3000,
            grpc_port: 3001,
            ..Default::default()
        };
        assert_eq!(config.http_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.grpc_addr().to_string(), "127.0.0.1:3001");
    }

    #[test]
    fn test_cors_origins_parsing() {
        let config = ServerConfig {
            cors_origins: Some("http://localhost:5173, http://localhost:3000".to_string()),
            ..Default::default()
        };
        let origins = config.cors_origins_list();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "http://localhost:5173");
    }

    #[test]
    fn test_validation_invalid_port() {
        let config = ServerConfig {
            http_port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_port_collision() {
        let config = ServerConfig {
            http_port: 9000,
            grpc_port: 9000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

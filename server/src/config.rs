/// Listener settings, filled from the command line in `main`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_connections: 1024,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.max_connections, 1024);
    }

    #[test]
    fn test_address_parses() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 0,
            max_connections: 1,
        };
        assert!(config.address().parse::<SocketAddr>().is_ok());
    }
}

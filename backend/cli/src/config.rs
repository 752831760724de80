use pantrysnap_vision::VisionSettings;

/// PantrySnap runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Directory for rolling log files
    pub log_dir: String,
    /// Vision model settings
    pub vision: VisionSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            vision: VisionSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("PANTRYSNAP_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PANTRYSNAP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_dir: std::env::var("PANTRYSNAP_LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
            vision: VisionSettings::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, "./logs");
    }
}

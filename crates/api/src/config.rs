use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Host-portal JWT validation configuration
    pub jwt: JwtAuthConfig,
    /// Outbound notification configuration
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Public base URL embedded in gate pass links.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// SHA-256 hex digests of accepted desk API keys (kiosk, checkpoint).
    #[serde(default)]
    pub desk_api_keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// RSA private key in PEM format for signing tokens (tooling/tests;
    /// the API itself only validates)
    #[serde(default)]
    pub private_key: String,

    /// RSA public key in PEM format for verifying tokens
    pub public_key: String,

    /// Access token expiration in seconds (default: 3600 = 1 hour)
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: i64,

    /// Leeway in seconds for clock skew tolerance (default: 30)
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

/// Outbound notification configuration (email + chat webhook).
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    /// Whether outbound notifications are enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: console (for development) or sendgrid
    #[serde(default = "default_email_provider")]
    pub email_provider: String,

    /// SendGrid API key (for sendgrid provider)
    #[serde(default)]
    pub sendgrid_api_key: String,

    /// Sender email address (From header)
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Chat webhook URL; empty disables the chat channel
    #[serde(default)]
    pub chat_webhook_url: String,

    /// Secret used to HMAC-sign chat webhook payloads
    #[serde(default)]
    pub chat_webhook_secret: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            email_provider: default_email_provider(),
            sendgrid_api_key: String::new(),
            sender_email: default_sender_email(),
            chat_webhook_url: String::new(),
            chat_webhook_secret: String::new(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    100
}
fn default_access_token_expiry() -> i64 {
    3600
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_email_provider() -> String {
    "console".to_string()
}
fn default_sender_email() -> String {
    "reception@visitor-manager.local".to_string()
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with VM__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("VM").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Sanity-checks values the deserializer cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("database.url must be set".to_string());
        }
        for digest in &self.security.desk_api_keys {
            if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(
                    "security.desk_api_keys entries must be SHA-256 hex digests".to_string()
                );
            }
        }
        Ok(())
    }

    /// The socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://vm:vm@localhost:5432/vm_test"

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 100

            [jwt]
            public_key = "test-key"
        "#
    }

    fn load_from_str(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let cfg = load_from_str(minimal_toml());
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert_eq!(cfg.database.max_connections, 20);
        assert_eq!(cfg.jwt.access_token_expiry_secs, 3600);
        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.notifications.email_provider, "console");
        assert!(cfg.security.desk_api_keys.is_empty());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = load_from_str(minimal_toml());
        assert_eq!(cfg.socket_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_validate_accepts_minimal() {
        let cfg = load_from_str(minimal_toml());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_database_url() {
        let mut cfg = load_from_str(minimal_toml());
        cfg.database.url = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_digest_desk_keys() {
        let mut cfg = load_from_str(minimal_toml());
        cfg.security.desk_api_keys = vec!["plain-text-key".to_string()];
        assert!(cfg.validate().is_err());

        cfg.security.desk_api_keys = vec![shared::crypto::sha256_hex("desk-key")];
        assert!(cfg.validate().is_ok());
    }
}

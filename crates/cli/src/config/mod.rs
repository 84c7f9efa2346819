//! # Database Configuration
//!
//! Database configuration handling for the CLI, reading from environment variables.

use std::net::SocketAddr;

use migration::PoolOptions;

const DEFAULT_POOL_SIZE: u32 = 20;

/// Database configuration for CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL; overrides the individual parts when set
    pub url:       Option<String>,
    /// Database host address
    pub host:      String,
    /// Database port number
    pub port:      u16,
    /// Database name
    pub database:  String,
    /// Database username
    pub username:  String,
    /// Database password
    pub password:  String,
    /// SSL mode
    pub ssl_mode:  String,
    /// Maximum pooled connections
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url:       None,
            host:      "localhost".to_owned(),
            port:      5432,
            database:  "expo_leads".to_owned(),
            username:  "expo".to_owned(),
            password:  String::new(),
            ssl_mode:  "prefer".to_owned(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

/// Errors that can occur when parsing database configuration.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseConfigError {
    /// The port number could not be parsed as a valid number.
    #[error("Invalid port number: {value}")]
    InvalidPort {
        /// The invalid port value that was provided.
        value: String,
    },
    /// The pool size is not a positive number.
    #[error("Invalid pool size: {value}")]
    InvalidPoolSize {
        /// The invalid pool size that was provided.
        value: String,
    },
}

impl DatabaseConfig {
    /// Creates a new DatabaseConfig from environment variables.
    ///
    /// Returns `Err` if any variable has an invalid format.
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DatabaseConfigError> {
        let defaults = Self::default();

        let port = match lookup("EXPO_DATABASE_PORT") {
            Some(value) => {
                value
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| DatabaseConfigError::InvalidPort {
                        value,
                    })?
            },
            None => defaults.port,
        };

        let pool_size = match lookup("EXPO_DATABASE_POOL_SIZE") {
            Some(value) => {
                value
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|size| *size > 0)
                    .ok_or(DatabaseConfigError::InvalidPoolSize {
                        value,
                    })?
            },
            None => defaults.pool_size,
        };

        Ok(Self {
            url: lookup("EXPO_DATABASE_URL").filter(|url| !url.trim().is_empty()),
            host: lookup("EXPO_DATABASE_HOST").unwrap_or(defaults.host),
            port,
            database: lookup("EXPO_DATABASE_NAME").unwrap_or(defaults.database),
            username: lookup("EXPO_DATABASE_USER").unwrap_or(defaults.username),
            password: lookup("EXPO_DATABASE_PASSWORD").unwrap_or(defaults.password),
            ssl_mode: lookup("EXPO_DATABASE_SSL_MODE").unwrap_or(defaults.ssl_mode),
            pool_size,
        })
    }

    /// Pool settings for [`migration::connect_to_database`].
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_connections: self.pool_size,
            ..PoolOptions::default()
        }
    }
}

/// Builds the database URL from DatabaseConfig
///
/// An explicit `url` is returned as is.
pub fn build_database_url(config: &DatabaseConfig) -> String {
    if let Some(url) = &config.url {
        return url.clone();
    }

    let encoded_username = percent_encode_userinfo(&config.username);
    let encoded_password = percent_encode_userinfo(&config.password);
    format!(
        "postgres://{}:{}@{}:{}/{}?sslmode={}",
        encoded_username, encoded_password, config.host, config.port, config.database, config.ssl_mode
    )
}

/// Percent-encoding for username/password in PostgreSQL URIs.
///
/// Everything outside the RFC 3986 unreserved set is encoded as UTF-8 bytes.
fn percent_encode_userinfo(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut result = String::with_capacity(s.len().saturating_mul(3));
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            result.push(char::from(byte));
        }
        else {
            result.push('%');
            result.push(char::from(HEX[usize::from(byte >> 4)]));
            result.push(char::from(HEX[usize::from(byte & 0x0F)]));
        }
    }
    result
}

/// Parses a host and port into a SocketAddr.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    // IPv6 literals need brackets before a port is appended
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}

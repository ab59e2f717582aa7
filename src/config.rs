//! Service Configuration
//! Mission: Load every runtime setting once at startup and hand it out explicitly

use clap::Parser;
use thiserror::Error;

/// Lowest and highest cost accepted by bcrypt.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Parser, Debug, Clone)]
#[command(name = "recipebook")]
#[command(about = "Recipe Book API - recipe management with JWT authentication")]
pub struct Config {
    /// Secret used to sign and verify JWTs
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Database connection string (sqlite://path, a file path, or :memory:)
    #[arg(long, env = "DB_CONNECTION_STRING")]
    pub db_connection_string: String,

    /// Interface to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// HTTP port
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// Token lifetime in hours
    #[arg(long, env = "TOKEN_TTL_HOURS", default_value_t = 24)]
    pub token_ttl_hours: i64,

    /// bcrypt work factor for password hashing
    #[arg(long, env = "BCRYPT_COST", default_value_t = 10)]
    pub bcrypt_cost: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SECRET_KEY must not be empty")]
    EmptySecret,
    #[error("DB_CONNECTION_STRING must not be empty")]
    EmptyConnectionString,
    #[error("bcrypt cost {0} is outside 4..=31")]
    InvalidBcryptCost(u32),
    #[error("token lifetime must be positive, got {0}h")]
    InvalidTokenTtl(i64),
}

impl Config {
    /// Reject settings that parse fine but cannot run the service.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.db_connection_string.trim().is_empty() {
            return Err(ConfigError::EmptyConnectionString);
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.bcrypt_cost));
        }
        if self.token_ttl_hours <= 0 {
            return Err(ConfigError::InvalidTokenTtl(self.token_ttl_hours));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "recipebook",
            "--secret-key",
            "test-secret",
            "--db-connection-string",
            ":memory:",
        ]
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::try_parse_from(base_args()).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.bind_addr(), "0.0.0.0:4000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_secret_rejected() {
        let mut config = Config::try_parse_from(base_args()).unwrap();
        config.secret_key = "   ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptySecret));
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let mut config = Config::try_parse_from(base_args()).unwrap();
        config.bcrypt_cost = 3;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBcryptCost(3)));
        config.bcrypt_cost = 32;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBcryptCost(32)));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = Config::try_parse_from(base_args()).unwrap();
        config.token_ttl_hours = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTokenTtl(0)));
    }
}

/*
 * Responsibility
 * - Load settings from the environment (JWT secret, DATABASE_URL, CORS, paging ...)
 * - Validate them once at start-up (missing/invalid => refuse to start)
 * - Nothing below app.rs reads the environment; values are injected from here
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // None => in-memory store
    pub database_url: Option<String>,

    pub jwt_secret: String,
    pub token_ttl_seconds: i64,

    pub page_size: i64,

    pub sqids_min_length: usize,
    pub sqids_alphabet: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret or database credentials
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("database", &self.database_url.as_ref().map(|_| "postgres"))
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or(AppEnv::Development);

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let database_url = match lookup("DATABASE_URL").filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let parsed = Url::parse(&raw).map_err(|_| ConfigError::Invalid("DATABASE_URL"))?;
                if !matches!(parsed.scheme(), "postgres" | "postgresql") {
                    return Err(ConfigError::Invalid("DATABASE_URL"));
                }
                Some(raw)
            }
            None => None,
        };

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let token_ttl_seconds = match lookup("TOKEN_TTL_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => 3600, // 1h
        };

        let page_size = match lookup("PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|v| *v >= 1)
                .ok_or(ConfigError::Invalid("PAGE_SIZE"))?,
            None => 2,
        };

        let sqids_min_length = lookup("SQIDS_MIN_LENGTH")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(10);

        let sqids_alphabet = lookup("SQIDS_ALPHABET").unwrap_or_else(|| {
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string()
        });

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            database_url,
            jwt_secret,
            token_ttl_seconds,
            page_size,
            sqids_min_length,
            sqids_alphabet,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.token_ttl_seconds, 3600);
        assert_eq!(config.page_size, 2);
        assert!(config.database_url.is_none());
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn missing_secret_refuses_to_start() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn rejects_zero_page_size_and_non_postgres_url() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "x"), ("PAGE_SIZE", "0")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PAGE_SIZE"));

        let err = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("DATABASE_URL", "mysql://localhost/feed"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("DATABASE_URL"));
    }

    #[test]
    fn parses_origins_and_environment() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "x"),
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("DATABASE_URL", "postgres://feed:pw@localhost/feed"),
        ]))
        .unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.database_url.is_some());
    }
}

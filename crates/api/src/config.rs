//! Process configuration for the HTTP server.
//!
//! | Env Var                 | Default                 |
//! |-------------------------|-------------------------|
//! | `HOST`                  | `0.0.0.0`               |
//! | `PORT`                  | `4000`                  |
//! | `CORS_ORIGINS`          | `http://localhost:5173` |
//! | `REQUEST_TIMEOUT_SECS`  | `30`                    |
//! | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
//!
//! Token settings come from [`JwtConfig::from_env`].

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`; blanks are dropped.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Drain window for in-flight requests after SIGINT/SIGTERM.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// # Panics
    ///
    /// Panics on a numeric variable that does not parse, or when the JWT
    /// secret is missing.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 4000),
            cors_origins: parse_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid number: {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" https://a.example, ,https://b.example,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse_origins("").is_empty());
    }
}

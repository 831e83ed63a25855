//! Application configuration loaded from environment variables.

use std::env;

use thiserror::Error;

use crate::store::MEMORY_URI;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub graphql_path: String,
    pub mongodb_uri: String,
    pub mongodb_database: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") => Environment::Production,
            _ => Environment::Development,
        };

        let (uri_var, uri) = match environment {
            Environment::Production => ("MONGODB_URI_PROD", lookup("MONGODB_URI_PROD")),
            Environment::Development => ("MONGODB_URI_DEV", lookup("MONGODB_URI_DEV")),
        };
        let mongodb_uri = match uri.or_else(|| lookup("MONGODB_URI")) {
            Some(uri) => uri,
            // Never fall back to a throwaway store in production
            None if environment == Environment::Production => {
                return Err(ConfigError::Missing(uri_var));
            }
            None => MEMORY_URI.to_string(),
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 4000,
        };

        let mut graphql_path = lookup("GRAPHQL_PATH").unwrap_or_else(|| "/graphql".to_string());
        if !graphql_path.starts_with('/') {
            graphql_path.insert(0, '/');
        }

        Ok(Self {
            environment,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            graphql_path,
            mongodb_uri,
            mongodb_database: lookup("MONGODB_DATABASE"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.port, 4000);
        assert_eq!(config.graphql_path, "/graphql");
        assert_eq!(config.mongodb_uri, MEMORY_URI);
        assert_eq!(config.bind_addr(), "0.0.0.0:4000");
    }

    #[test]
    fn environment_selects_connection_string() {
        let vars = [
            ("MONGODB_URI_PROD", "mongodb://prod/blog"),
            ("MONGODB_URI_DEV", "mongodb://dev/blog"),
        ];
        assert_eq!(config(&vars).unwrap().mongodb_uri, "mongodb://dev/blog");

        let mut prod = vars.to_vec();
        prod.push(("APP_ENV", "production"));
        assert_eq!(config(&prod).unwrap().mongodb_uri, "mongodb://prod/blog");
    }

    #[test]
    fn production_requires_a_uri() {
        assert_eq!(
            config(&[("APP_ENV", "production")]).unwrap_err(),
            ConfigError::Missing("MONGODB_URI_PROD")
        );
    }

    #[test]
    fn generic_uri_is_the_fallback() {
        let config = config(&[("MONGODB_URI", "mongodb://localhost:27017/blog")]).unwrap();
        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017/blog");
    }

    #[test]
    fn bad_port_is_rejected() {
        assert_eq!(
            config(&[("PORT", "http")]).unwrap_err(),
            ConfigError::InvalidPort("http".into())
        );
    }

    #[test]
    fn graphql_path_gets_a_leading_slash() {
        assert_eq!(config(&[("GRAPHQL_PATH", "api")]).unwrap().graphql_path, "/api");
    }
}

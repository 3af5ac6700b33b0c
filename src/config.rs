//! Database URL resolution for the migration runner.

use thiserror::Error;

/// Set by the hosting platform in deployed environments.
pub const PRODUCTION_MARKER_VAR: &str = "RAILWAY_ENVIRONMENT";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
/// Externally reachable URL, preferred outside production.
pub const DATABASE_PUBLIC_URL_VAR: &str = "DATABASE_PUBLIC_URL";

/// Errors raised while resolving configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("database URL not configured: pass --database-url or set DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Deployment environment the runner is operating in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Settings needed to reach the target database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub database_url: String,
    pub environment: Environment,
}

impl DatabaseSettings {
    /// Resolve settings from the process environment.
    pub fn from_env(explicit_url: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve(explicit_url, |name| std::env::var(name).ok())
    }

    /// Resolve settings using `lookup` to read variables.
    ///
    /// An explicit URL always wins. In production only `DATABASE_URL` is
    /// consulted; elsewhere `DATABASE_PUBLIC_URL` is tried first.
    pub fn resolve<F>(explicit_url: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment = if non_blank(PRODUCTION_MARKER_VAR).is_some() {
            Environment::Production
        } else {
            Environment::Development
        };

        let explicit = explicit_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        let url = explicit
            .or_else(|| match environment {
                Environment::Production => non_blank(DATABASE_URL_VAR),
                Environment::Development => {
                    non_blank(DATABASE_PUBLIC_URL_VAR).or_else(|| non_blank(DATABASE_URL_VAR))
                }
            })
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            database_url: normalize_database_url(url.trim()),
            environment,
        })
    }
}

/// Strip driver suffixes such as `+asyncpg` that libpq does not understand.
pub fn normalize_database_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => match scheme.split_once('+') {
            Some((base, _driver)) if base == "postgresql" || base == "postgres" => {
                format!("{base}://{rest}")
            }
            _ => url.to_string(),
        },
        None => url.to_string(),
    }
}

//! Runtime configuration from environment variables (a `.env` file is loaded by the binary).

use crate::error::ConfigError;
use crate::service::{Credential, CredentialPolicy};
use std::net::SocketAddr;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/stockbox";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Credential substituted for missing identity headers when development credentials are enabled.
pub const DEV_CREDENTIAL: Credential = Credential {
    id_account: 1,
    id_user: 1,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::Invalid {
                key: "STOCKBOX_ENV",
                reason: format!("{} (expected development or production)", s),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub body_limit_bytes: usize,
    pub environment: Environment,
    /// Substitute [`DEV_CREDENTIAL`] for missing identity headers. Never allowed in production.
    pub dev_credentials: bool,
    pub cors_allowed_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: DEFAULT_DATABASE_URL.into(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
            environment: Environment::Production,
            dev_credentials: false,
            cors_allowed_origin: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get("STOCKBOX_ENV") {
            Some(v) => v.parse()?,
            None => Environment::default(),
        };
        let dev_credentials = match get("STOCKBOX_DEV_CREDENTIALS") {
            Some(v) => parse_bool("STOCKBOX_DEV_CREDENTIALS", &v)?,
            None => false,
        };
        if dev_credentials && environment == Environment::Production {
            return Err(ConfigError::DevCredentialsInProduction);
        }
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.into())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;
        let db_max_connections = parse_num("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), DEFAULT_MAX_CONNECTIONS)?;
        let body_limit_bytes = parse_num("BODY_LIMIT_BYTES", get("BODY_LIMIT_BYTES"), DEFAULT_BODY_LIMIT)?;
        let cors_allowed_origin = get("CORS_ALLOWED_ORIGIN");
        if let Some(origin) = &cors_allowed_origin {
            axum::http::HeaderValue::from_str(origin).map_err(|_| ConfigError::Invalid {
                key: "CORS_ALLOWED_ORIGIN",
                reason: format!("not a valid header value: {}", origin),
            })?;
        }

        Ok(AppConfig {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr,
            db_max_connections,
            body_limit_bytes,
            environment,
            dev_credentials,
            cors_allowed_origin,
        })
    }

    pub fn credential_policy(&self) -> CredentialPolicy {
        if self.dev_credentials && self.environment == Environment::Development {
            CredentialPolicy::DevelopmentFallback(DEV_CREDENTIAL)
        } else {
            CredentialPolicy::Strict
        }
    }
}

fn parse_bool(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            reason: format!("{} is not a boolean", v),
        }),
    }
}

fn parse_num<T: FromStr>(key: &'static str, v: Option<String>, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match v {
        Some(s) => s.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_are_production_and_strict() {
        let c = config(&[]).unwrap();
        assert_eq!(c.environment, Environment::Production);
        assert_eq!(c.bind_addr.port(), 3000);
        assert_eq!(c.credential_policy(), CredentialPolicy::Strict);
    }

    #[test]
    fn dev_credentials_only_in_development() {
        let c = config(&[("STOCKBOX_ENV", "development"), ("STOCKBOX_DEV_CREDENTIALS", "true")]).unwrap();
        assert_eq!(c.credential_policy(), CredentialPolicy::DevelopmentFallback(DEV_CREDENTIAL));
        assert!(matches!(
            config(&[("STOCKBOX_DEV_CREDENTIALS", "true")]),
            Err(ConfigError::DevCredentialsInProduction)
        ));
    }

    #[test]
    fn development_without_flag_stays_strict() {
        let c = config(&[("STOCKBOX_ENV", "dev")]).unwrap();
        assert_eq!(c.credential_policy(), CredentialPolicy::Strict);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(config(&[("BIND_ADDR", "nowhere")]), Err(ConfigError::Invalid { key: "BIND_ADDR", .. })));
        assert!(matches!(
            config(&[("DB_MAX_CONNECTIONS", "-1")]),
            Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(config(&[("STOCKBOX_ENV", "staging")]), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let c = config(&[("BODY_LIMIT_BYTES", "  "), ("DATABASE_URL", "")]).unwrap();
        assert_eq!(c.body_limit_bytes, DEFAULT_BODY_LIMIT);
        assert_eq!(c.database_url, DEFAULT_DATABASE_URL);
    }
}

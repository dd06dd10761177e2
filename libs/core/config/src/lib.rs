pub mod server;
pub mod tracing;

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Application environment, read from `APP_ENV`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Cookies carry the `Secure` attribute only when served over HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.is_production()
    }
}

/// Name and version of the running binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Build an [`AppInfo`] from the calling crate's package metadata.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Helper to load an environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Helper to load an environment variable or return error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse an environment variable, falling back to `default` when unset.
pub fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.secure_cookies());
        });
    }

    #[test]
    fn test_environment_production_any_case() {
        for value in ["production", "PRODUCTION", "Production"] {
            temp_env::with_var("APP_ENV", Some(value), || {
                let env = Environment::from_env();
                assert_eq!(env, Environment::Production);
                assert!(env.secure_cookies());
            });
        }
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_app_info_macro_reads_package() {
        let info = app_info!();
        assert_eq!(info.name, "core_config");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn test_env_or_default() {
        temp_env::with_var("SHOP_TEST_VAR", Some("set"), || {
            assert_eq!(env_or_default("SHOP_TEST_VAR", "default"), "set");
        });
        temp_env::with_var_unset("SHOP_TEST_VAR", || {
            assert_eq!(env_or_default("SHOP_TEST_VAR", "default"), "default");
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("SHOP_REQUIRED_VAR", || {
            let err = env_required("SHOP_REQUIRED_VAR").unwrap_err();
            assert!(err.to_string().contains("SHOP_REQUIRED_VAR"));
            assert!(err.to_string().contains("required"));
        });
    }

    #[test]
    fn test_env_parse_default_and_value() {
        temp_env::with_var_unset("SHOP_PAGE_SIZE", || {
            assert_eq!(env_parse("SHOP_PAGE_SIZE", 4_i64).unwrap(), 4);
        });
        temp_env::with_var("SHOP_PAGE_SIZE", Some(" 12 "), || {
            assert_eq!(env_parse("SHOP_PAGE_SIZE", 4_i64).unwrap(), 12);
        });
    }

    #[test]
    fn test_env_parse_invalid() {
        temp_env::with_var("SHOP_PAGE_SIZE", Some("many"), || {
            let err = env_parse("SHOP_PAGE_SIZE", 4_i64).unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "SHOP_PAGE_SIZE"));
        });
    }
}

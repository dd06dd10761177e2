//! JWT settings read from the environment.

use core_config::{ConfigError, FromEnv, env_parse, env_required};

/// Shortest accepted signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime: seven days.
pub const DEFAULT_EXPIRES_SECS: i64 = 7 * 24 * 60 * 60;

/// JWT signing configuration.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `JWT_EXPIRES_SECS` (default 604800)
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_secs: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expires_in_secs: i64) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least {} characters (got {}). Generate one with: openssl rand -base64 32",
                    MIN_SECRET_LEN,
                    secret.len()
                ),
            });
        }
        if expires_in_secs <= 0 {
            return Err(ConfigError::ParseError {
                key: "JWT_EXPIRES_SECS".to_string(),
                details: format!("must be positive (got {})", expires_in_secs),
            });
        }

        Ok(Self {
            secret,
            expires_in_secs,
        })
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        let expires_in_secs = env_parse("JWT_EXPIRES_SECS", DEFAULT_EXPIRES_SECS)?;
        Self::new(secret, expires_in_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_jwt_config_from_env_defaults_expiry() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_EXPIRES_SECS", None)],
            || {
                let config = JwtConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.expires_in_secs, DEFAULT_EXPIRES_SECS);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_custom_expiry() {
        temp_env::with_vars(
            [("JWT_SECRET", Some(SECRET)), ("JWT_EXPIRES_SECS", Some("3600"))],
            || {
                assert_eq!(JwtConfig::from_env().unwrap().expires_in_secs, 3600);
            },
        );
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_rejects_short_secret() {
        let err = JwtConfig::new("short", 60).unwrap_err();
        assert!(err.to_string().contains("32 characters"));
    }

    #[test]
    fn test_jwt_config_rejects_non_positive_expiry() {
        let err = JwtConfig::new(SECRET, 0).unwrap_err();
        assert!(err.to_string().contains("JWT_EXPIRES_SECS"));
    }
}

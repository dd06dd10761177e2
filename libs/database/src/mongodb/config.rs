#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

const DEFAULT_URL: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "shop";

/// MongoDB connection settings.
///
/// ```ignore
/// let config = MongoConfig::new("mongodb://localhost:27017")
///     .with_database("shop")
///     .with_app_name("shop_api");
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// `mongodb://[username:password@]host[:port][/database][?options]`
    pub url: String,
    pub database: String,
    /// Reported to the server for its logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_pool_size(mut self, max_pool_size: u32, min_pool_size: u32) -> Self {
        self.max_pool_size = max_pool_size;
        self.min_pool_size = min_pool_size;
        self
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

/// First set variable among `keys`.
#[cfg(feature = "config")]
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| std::env::var(key).ok())
}

/// Environment variables:
/// - `MONGODB_URL`, `MONGO_URL` or `DATABASE_URL` (required)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default: `shop`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (100), `MONGODB_MIN_POOL_SIZE` (5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (10), `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = first_env(&["MONGODB_URL", "MONGO_URL", "DATABASE_URL"]).ok_or_else(|| {
            ConfigError::MissingEnvVar("MONGODB_URL, MONGO_URL or DATABASE_URL".to_string())
        })?;
        let defaults = Self::default();

        Ok(Self {
            url,
            database: first_env(&["MONGODB_DATABASE", "MONGO_DATABASE"])
                .unwrap_or(defaults.database),
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?,
            min_pool_size: env_parse("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?,
            connect_timeout_secs: env_parse(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            server_selection_timeout_secs: env_parse(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongo_config_builder() {
        let config = MongoConfig::new("mongodb://db:27017")
            .with_database("catalog")
            .with_pool_size(50, 10)
            .with_app_name("shop_api");

        assert_eq!(config.url, "mongodb://db:27017");
        assert_eq!(config.database, "catalog");
        assert_eq!(config.max_pool_size, 50);
        assert_eq!(config.min_pool_size, 10);
        assert_eq!(config.app_name.as_deref(), Some("shop_api"));
    }

    #[test]
    fn test_mongo_config_default() {
        let config = MongoConfig::default();
        assert_eq!(config.url, "mongodb://localhost:27017");
        assert_eq!(config.database, "shop");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_DATABASE", Some("testdb")),
                ("MONGODB_MAX_POOL_SIZE", Some("20")),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.database, "testdb");
                assert_eq!(config.max_pool_size, 20);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_fallbacks() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None::<&str>),
                ("DATABASE_URL", Some("mongodb://fallback:27017")),
                ("MONGODB_DATABASE", None::<&str>),
                ("MONGO_DATABASE", None::<&str>),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://fallback:27017");
                assert_eq!(config.database, "shop");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_missing_url() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None::<&str>),
                ("DATABASE_URL", None::<&str>),
            ],
            || {
                let err = MongoConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_URL"));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_bad_pool_size() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("MONGODB_MAX_POOL_SIZE", Some("lots")),
            ],
            || {
                let err = MongoConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_MAX_POOL_SIZE"));
            },
        );
    }
}

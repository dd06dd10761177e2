use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, env_parse, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_products::DEFAULT_PAGE_SIZE;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub jwt: JwtConfig,
    /// `PRODUCTS_PAGE_SIZE`: page size when a listing carries no `size`
    pub products_page_size: i64,
    /// `PUBLIC_URL`: base of password reset links, without trailing slash
    pub public_url: Option<String>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;

        let products_page_size = env_parse("PRODUCTS_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        eyre::ensure!(
            products_page_size > 0,
            "PRODUCTS_PAGE_SIZE must be positive (got {})",
            products_page_size
        );

        let public_url = std::env::var("PUBLIC_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            jwt,
            products_page_size,
            public_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "shop-api-config-test-secret-32-chars!";

    fn with_env<F: FnOnce()>(extra: [(&str, Option<&str>); 2], f: F) {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("JWT_SECRET", Some(SECRET)),
                extra[0],
                extra[1],
            ],
            f,
        );
    }

    #[test]
    fn test_defaults() {
        with_env([("PRODUCTS_PAGE_SIZE", None), ("PUBLIC_URL", None)], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.app.name, "shop_api");
            assert_eq!(config.products_page_size, DEFAULT_PAGE_SIZE);
            assert!(config.public_url.is_none());
        });
    }

    #[test]
    fn test_public_url_is_trimmed() {
        with_env(
            [
                ("PRODUCTS_PAGE_SIZE", Some("8")),
                ("PUBLIC_URL", Some("https://shop.example.com/")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.products_page_size, 8);
                assert_eq!(config.public_url.as_deref(), Some("https://shop.example.com"));
            },
        );
    }

    #[test]
    fn test_rejects_non_positive_page_size() {
        with_env([("PRODUCTS_PAGE_SIZE", Some("0")), ("PUBLIC_URL", None)], || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("PRODUCTS_PAGE_SIZE"));
        });
    }

    #[test]
    fn test_requires_jwt_secret() {
        temp_env::with_vars(
            [
                ("MONGODB_URL", Some("mongodb://localhost:27017")),
                ("JWT_SECRET", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }
}

use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // user id
    pub email: String,
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Stateless HS256 token issuer and verifier.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in_secs: i64,
}

impl std::fmt::Debug for JwtAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuth")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(expires_in_secs = config.expires_in_secs, "JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            expires_in_secs: config.expires_in_secs,
        }
    }

    /// Lifetime of issued tokens, also used as the cookie `Max-Age`.
    pub fn expires_in_secs(&self) -> i64 {
        self.expires_in_secs
    }

    pub fn create_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            exp: (now + Duration::seconds(self.expires_in_secs)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Check the signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<JwtClaims>(token, &self.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    fn auth(expires_in_secs: i64) -> JwtAuth {
        let config = JwtConfig::new("test-secret-key-that-is-at-least-32-chars", expires_in_secs).unwrap();
        JwtAuth::new(&config)
    }

    #[test]
    fn test_token_carries_claims() {
        let auth = auth(3600);
        let token = auth.create_token("user-1", "jane@example.com", "Jane", "admin").unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = auth(3600).create_token("user-1", "a@b.c", "A", "user").unwrap();

        let other = JwtConfig::new("another-secret-key-that-is-at-least-32-chars", 3600).unwrap();
        let err = JwtAuth::new(&other).verify_token(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(auth(3600).verify_token("not.a.jwt").is_err());
    }
}

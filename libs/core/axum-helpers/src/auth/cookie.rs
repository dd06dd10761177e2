//! The `token` cookie carrying the access token.

use axum::http::{HeaderMap, header};

pub const TOKEN_COOKIE: &str = "token";

/// `Set-Cookie` value storing `token` for `max_age_secs`.
pub fn token_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure = if secure { " Secure;" } else { "" };
    format!(
        "{}={}; HttpOnly;{} SameSite=Strict; Path=/; Max-Age={}",
        TOKEN_COOKIE, token, secure, max_age_secs
    )
}

/// `Set-Cookie` value expiring the token cookie.
pub fn clear_token_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", TOKEN_COOKIE)
}

/// Value of the named cookie from the `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_cookie_attributes() {
        let cookie = token_cookie("abc", 60, false);
        assert_eq!(cookie, "token=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=60");

        let secure = token_cookie("abc", 60, true);
        assert!(secure.contains("HttpOnly; Secure; SameSite=Strict"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        assert!(clear_token_cookie().starts_with("token=;"));
        assert!(clear_token_cookie().ends_with("Max-Age=0"));
    }

    #[test]
    fn test_cookie_value_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=xyz.abc"));

        assert_eq!(cookie_value(&headers, "token").as_deref(), Some("xyz.abc"));
        assert!(cookie_value(&headers, "session").is_none());
    }

    #[test]
    fn test_empty_cookie_value_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        assert!(cookie_value(&headers, "token").is_none());
    }
}

//! Query-string extractor producing a [`ParameterMapping`].

use api_features::ParameterMapping;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

/// The request's query string, bracket keys expanded.
///
/// Never rejects: a missing or malformed query string yields whatever pairs
/// could be read.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(pub ParameterMapping);

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = parts
            .uri
            .query()
            .map(ParameterMapping::from_query_str)
            .unwrap_or_default();

        Ok(QueryParams(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(uri: &str) -> ParameterMapping {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        let QueryParams(params) = QueryParams::from_request_parts(&mut parts, &()).await.unwrap();
        params
    }

    #[tokio::test]
    async fn test_extracts_nested_params() {
        let params = extract("/api/v1/products?keyword=usb&price[gte]=10").await;

        assert_eq!(params.text("keyword").as_deref(), Some("usb"));
        assert!(params.get("price").is_some_and(|price| price.as_document().is_some()));
    }

    #[tokio::test]
    async fn test_missing_query_is_empty() {
        assert!(extract("/api/v1/products").await.is_empty());
    }
}

//! Custom Axum extractors.

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use stitch_core::CommerceError;

/// Bearer credential lifted from the `Authorization` header.
///
/// Extraction only peels `Bearer <token>` off the header; resolving the
/// token to an identity is the [`Authenticator`] provider's job, invoked by
/// the state's `require_user`/`require_admin` helpers.
///
/// Missing or malformed headers reject with 401 before the handler runs.
///
/// [`Authenticator`]: stitch_core::providers::Authenticator
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(CommerceError::MissingToken)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(CommerceError::MissingToken)?;

        Ok(Self(token.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<BearerToken, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        let request = builder.body(()).map_err(|e| AppError::internal(e.to_string()))?;
        let (mut parts, ()) = request.into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_token() {
        let token = extract(Some("Bearer abc123")).await.map(|t| t.0);
        assert_eq!(token.ok().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_missing_header_rejects() {
        let err = extract(None).await.err();
        assert_eq!(
            err.map(|e| e.status()),
            Some(axum::http::StatusCode::UNAUTHORIZED)
        );
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_rejects() {
        let err = extract(Some("Basic dXNlcjpwYXNz")).await.err();
        assert_eq!(
            err.map(|e| e.status()),
            Some(axum::http::StatusCode::UNAUTHORIZED)
        );
    }
}

// Caller identity supplied by the upstream authenticator

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Id of the authenticated user making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| CallerIdentity(value.to_string()))
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<CallerIdentity, ApiError> {
        let (mut parts, _) = request.into_parts();
        CallerIdentity::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_identity_from_header() {
        let request = Request::builder()
            .header(USER_ID_HEADER, " harry ")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap(), CallerIdentity("harry".to_string()));
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let request = Request::builder().body(()).unwrap();
        assert!(matches!(extract(request).await, Err(ApiError::Unauthorized)));

        let request = Request::builder().header(USER_ID_HEADER, "").body(()).unwrap();
        assert!(matches!(extract(request).await, Err(ApiError::Unauthorized)));
    }
}

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::{debug, error};

use shared_models::auth::TokenClaims;
use shared_models::error::AppError;

use crate::jwt::AuthError;
use crate::state::AppState;

pub const UNAUTHORIZED_ACCESS: &str = "UnAuthorized access";
pub const FORBIDDEN_ACCESS: &str = "Forbidden access";

/// Requires a bearer token. A missing header is 401; a header that does not
/// carry a valid token is 403. On success the decoded claims are added to the
/// request extensions.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = authenticate(&state, &request)?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn authenticate(state: &AppState, request: &Request<Body>) -> Result<TokenClaims, AppError> {
    if !request.headers().contains_key(AUTHORIZATION) {
        return Err(AppError::Unauthorized(UNAUTHORIZED_ACCESS.to_string()));
    }

    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| {
            debug!("Authorization header is not a bearer credential");
            AppError::Forbidden(FORBIDDEN_ACCESS.to_string())
        })?;

    state.tokens.verify(bearer.token()).map_err(|e| {
        if e == AuthError::MissingSecret {
            error!("Cannot verify tokens: {}", e);
        }
        AppError::Forbidden(FORBIDDEN_ACCESS.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::{http::StatusCode, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    use crate::test_utils::{JwtTestUtils, TestConfig};

    fn protected_app() -> Router {
        let state = Arc::new(TestConfig::default().memory_state());
        Router::new()
            .route(
                "/whoami",
                get(|Extension(claims): Extension<TokenClaims>| async move { claims.email }),
            )
            .layer(middleware::from_fn_with_state(state.clone(), require_token))
            .with_state(state)
    }

    fn request_with(header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let response = protected_app().oneshot(request_with(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_forbidden() {
        let response = protected_app()
            .oneshot(request_with(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_bad_token_is_forbidden() {
        let token = JwtTestUtils::create_malformed_token();
        let response = protected_app()
            .oneshot(request_with(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let config = TestConfig::default();
        let token = JwtTestUtils::create_test_token("a@x.com", &config.jwt_secret);

        let response = protected_app()
            .oneshot(request_with(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"a@x.com");
    }

    #[test]
    fn test_authenticate_without_secret() {
        let mut config = TestConfig::default();
        config.jwt_secret = String::new();
        let state = config.memory_state();

        let request = request_with(Some("Bearer a.b.c"));

        assert_matches!(authenticate(&state, &request), Err(AppError::Forbidden(_)));
    }
}

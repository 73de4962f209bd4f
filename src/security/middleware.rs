//! Security Middleware Module
//!
//! Axum middleware for bearer authentication and security headers.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::AppError;
use crate::security::auth::{Authenticator, Claims, Credentials};

/// Extension trait for adding claims to request extensions
pub trait RequestClaimsExt {
    fn set_claims(&mut self, claims: Claims);
}

impl RequestClaimsExt for Request<Body> {
    fn set_claims(&mut self, claims: Claims) {
        self.extensions_mut().insert(claims);
    }
}

/// Authentication middleware
///
/// Rejects the request with 401 unless it carries a valid bearer token; on success
/// the decoded [`Claims`] are available to handlers as an extension.
pub async fn auth_middleware(
    State(authenticator): State<Arc<dyn Authenticator>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = extract_credentials(&req);
    let claims = authenticator.authenticate(&credentials).await.map_err(|e| {
        debug!(error = %e, "request rejected by authenticator");
        match e {
            AppError::Authentication(_) => e,
            other => AppError::Authentication(other.to_string()),
        }
    })?;

    req.set_claims(claims);
    Ok(next.run(req).await)
}

/// Extract credentials from request headers
fn extract_credentials(req: &Request<Body>) -> Credentials {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    Credentials::from_authorization_header(auth_header)
}

/// Security headers middleware
pub async fn security_headers_middleware(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::auth::{JwtAuth, JwtTokenGenerator};
    use axum::{Extension, Router, http::StatusCode, middleware, routing::get};
    use tower::ServiceExt;

    const SECRET: &str = "middleware-secret-at-least-32-chars!";

    async fn whoami(Extension(claims): Extension<Claims>) -> String {
        claims.sub
    }

    fn app() -> Router {
        let auth: Arc<dyn Authenticator> = Arc::new(JwtAuth::new(
            SECRET,
            "wellbeing".into(),
            "wellbeing-api".into(),
        ));
        Router::new()
            .route("/me", get(whoami))
            .layer(middleware::from_fn_with_state(auth, auth_middleware))
            .layer(middleware::from_fn(security_headers_middleware))
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let token = JwtTokenGenerator::new(SECRET, "wellbeing".into(), "wellbeing-api".into(), 60)
            .generate_token("alice")
            .unwrap();
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"alice");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app()
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

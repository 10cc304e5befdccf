//! HTTP API for the Maand node.
//!
//! Wires the user account endpoints into an axum router with CORS and
//! request tracing.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use maand_auth::{AuthError, CredentialStore};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::user_api::user_routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential store.
    pub store: Arc<CredentialStore>,
    /// Delivery channel for password-reset tokens.
    pub mailer: Arc<dyn ResetTokenMailer>,
}

/// Out-of-band delivery of password-reset tokens.
///
/// The HTTP response to forgot-password never carries the token; it leaves
/// through this seam instead. Tests substitute a capturing implementation.
pub trait ResetTokenMailer: Send + Sync {
    /// Deliver a freshly issued reset token to an account's email address.
    fn deliver(&self, email: &str, token: &str);
}

/// Default mailer: records that a delivery happened, nothing more.
///
/// The token itself stays out of the logs.
#[derive(Debug, Default)]
pub struct TracingMailer;

impl ResetTokenMailer for TracingMailer {
    fn deliver(&self, email: &str, _token: &str) {
        tracing::info!(email = %email, "Password reset token issued");
    }
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Validation(String),
    #[error("not authorized, no token")]
    Unauthorized,
    #[error("not authorized as an admin")]
    Forbidden,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Auth(err) => match err {
                AuthError::DuplicateIdentity => (StatusCode::CONFLICT, self.to_string()),
                AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
                AuthError::TokenInvalidOrExpired => (StatusCode::BAD_REQUEST, self.to_string()),
                AuthError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
                AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
                AuthError::Hashing(_) => {
                    tracing::error!(error = %err, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Something went wrong!".to_string(),
                    )
                }
            },
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Creates the API router.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentialed CORS requires an explicit origin list, never a wildcard.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(user_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint.
async fn root() -> impl IntoResponse {
    "API is running...."
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

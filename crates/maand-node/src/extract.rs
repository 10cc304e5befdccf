//! Request extractors.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use maand_auth::User;

use crate::api::{ApiError, AppState};

/// Extracts the signed-in user from a `Authorization: Bearer <token>` header.
///
/// Rejects with 401 when the header is missing, malformed, or the token does
/// not resolve to a live session.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let user = state
            .store
            .resolve_token(token)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(Self(user))
    }
}

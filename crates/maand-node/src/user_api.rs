//! User account endpoints: signup, signin, password reset, profile.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use maand_auth::{Gender, NewUser, Role, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::{ApiError, AppState};
use crate::extract::AuthUser;

/// Creates the user API routes.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/signup", post(signup))
        .route("/api/users/signin", post(signin))
        .route("/api/users/signout", post(signout))
        .route("/api/users/forgot-password", post(forgot_password))
        .route("/api/users/reset-password/{token}", post(reset_password))
        .route("/api/users/me", get(me))
        .route("/api/users", get(list_users))
}

// ==================== Request/Response Types ====================

/// Request to create an account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
    pub role: Option<String>,
    pub institution: Option<String>,
    pub gender: Option<Gender>,
    pub avatar_url: Option<String>,
}

/// Request to sign in.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Request to start a password reset.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request to finish a password reset.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

/// Response for a user profile.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: u64,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            institution: user.institution.clone(),
            gender: user.gender,
            avatar_url: user.avatar_url.clone(),
            created_at: user.created_at,
        }
    }
}

/// Response for a successful sign-in.
#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

/// Generic acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ==================== Handlers ====================

/// Creates a new account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let role = req
        .role
        .as_deref()
        .map(|r| {
            Role::parse(r).ok_or_else(|| ApiError::Validation(format!("invalid role: {}", r)))
        })
        .transpose()?;

    let mut input = NewUser::new(req.name, req.email, req.password);
    input.role = role;
    input.institution = req.institution;
    input.gender = req.gender;
    input.avatar_url = req.avatar_url;

    let user = state.store.register(input)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Verifies credentials and issues a bearer token.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = state.store.authenticate(&req.email, &req.password)?;

    Ok(Json(SigninResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    }))
}

/// Revokes the presented bearer token.
async fn signout(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    AuthUser(user): AuthUser,
) -> impl IntoResponse {
    // The extractor proved the token is live; revoke the raw value.
    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
    {
        state.store.revoke_token(token);
    }

    tracing::debug!(user = %user.id, "Signed out");
    Json(MessageResponse {
        message: "signed out".to_string(),
    })
}

/// Starts a password reset.
///
/// Always answers with the same generic body so the endpoint cannot be used
/// to probe which email addresses have accounts.
async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = state.store.issue_reset_token(&req.email)? {
        state.mailer.deliver(&req.email, &token);
    }

    Ok(Json(MessageResponse {
        message: "If an account with that email exists, a reset link has been sent".to_string(),
    }))
}

/// Finishes a password reset with a token from the reset email.
async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.consume_reset_token(&token, &req.password)?;

    Ok(Json(MessageResponse {
        message: "Password has been reset".to_string(),
    }))
}

/// Returns the signed-in user's profile.
async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(UserResponse::from(&user))
}

/// Lists all users. Admin only.
async fn list_users(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    if user.role != Role::Admin {
        return Err(ApiError::Forbidden);
    }

    let users = state.store.list_users();
    let responses: Vec<UserResponse> = users.iter().map(Into::into).collect();

    Ok(Json(responses))
}

//! Authenticated request gateway.

use maand_auth::Role;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ClientError;
use crate::session::{Session, SessionStore};

/// Fallback message when an error body is missing or unreadable.
const GENERIC_ERROR: &str = "Something went wrong";

/// HTTP client for the Maand API.
///
/// Every request goes through one code path: if a session exists, its bearer
/// token rides along in the `Authorization` header; if not, the request goes
/// out anonymous. Requests are sent exactly once, with no retries, so a
/// failure observed by the caller is a failure of that one attempt.
#[derive(Clone)]
pub struct Gateway {
    base: Url,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
}

/// A user identity as the API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Sign-in response body.
#[derive(Debug, Deserialize)]
struct SigninBody {
    id: Uuid,
    name: String,
    email: String,
    role: Role,
    token: String,
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Acknowledgement body.
#[derive(Debug, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl Gateway {
    /// Create a gateway for the API at `base`, reading tokens from `session`.
    pub fn new(base: &str, session: Arc<dyn SessionStore>) -> Result<Self, ClientError> {
        let base = Url::parse(base).map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;
        Ok(Self {
            base,
            http: reqwest::Client::new(),
            session,
        })
    }

    /// Whether a session is currently stored.
    pub fn is_authenticated(&self) -> bool {
        self.session.get().is_some()
    }

    // ==================== Account Operations ====================

    /// Create an account. Does not sign in.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, ClientError> {
        self.send(
            Method::POST,
            "/api/users/signup",
            Some(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            })),
        )
        .await
    }

    /// Sign in and persist the resulting session.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        let body: SigninBody = self
            .send(
                Method::POST,
                "/api/users/signin",
                Some(&serde_json::json!({ "email": email, "password": password })),
            )
            .await?;

        self.session.set(Session {
            id: body.id,
            name: body.name.clone(),
            email: body.email.clone(),
            role: body.role,
            token: body.token,
        });

        Ok(Identity {
            id: body.id,
            name: body.name,
            email: body.email,
            role: body.role,
        })
    }

    /// Sign out: revoke the token server-side, then drop the local session.
    ///
    /// The local session is cleared even if the server call fails; a stale
    /// server-side token expires on its own.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let result: Result<Acknowledgement, ClientError> =
            self.send(Method::POST, "/api/users/signout", None).await;

        self.session.clear();

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::debug!(error = %e, "Server-side sign out failed; session cleared locally");
                Ok(())
            }
        }
    }

    /// Start a password reset. The response is intentionally uninformative.
    pub async fn forgot_password(&self, email: &str) -> Result<Acknowledgement, ClientError> {
        self.send(
            Method::POST,
            "/api/users/forgot-password",
            Some(&serde_json::json!({ "email": email })),
        )
        .await
    }

    /// Finish a password reset with a token from the reset email.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Acknowledgement, ClientError> {
        self.send(
            Method::POST,
            &format!("/api/users/reset-password/{}", token),
            Some(&serde_json::json!({ "password": new_password })),
        )
        .await
    }

    /// Fetch the signed-in user's profile.
    pub async fn me(&self) -> Result<Identity, ClientError> {
        self.send(Method::GET, "/api/users/me", None).await
    }

    /// List all users. Admin only.
    pub async fn list_users(&self) -> Result<Vec<Identity>, ClientError> {
        self.send(Method::GET, "/api/users", None).await
    }

    // ==================== Core ====================

    /// Send one request and decode the response.
    ///
    /// Attaches the bearer token exactly when a session exists. Non-success
    /// statuses become [`ClientError::Api`] carrying the server's `message`
    /// field, or a generic message when the body is not in that shape.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ClientError> {
        let url = self
            .base
            .join(endpoint)
            .map_err(|e| ClientError::InvalidBaseUrl(e.to_string()))?;

        let mut request = self.http.request(method, url);
        if let Some(session) = self.session.get() {
            request = request.bearer_auth(&session.token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        Err(Self::api_error(status, response).await)
    }

    async fn api_error(status: StatusCode, response: reqwest::Response) -> ClientError {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| GENERIC_ERROR.to_string());

        ClientError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

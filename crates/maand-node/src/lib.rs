//! HTTP API node for the Maand community platform.
//!
//! Exposes the user account endpoints (signup, signin, password reset) over
//! axum, backed by [`maand_auth::CredentialStore`].

pub mod api;
pub mod config;
pub mod extract;
pub mod user_api;

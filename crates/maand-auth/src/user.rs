//! User account types.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Self-reported gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// A user account.
///
/// The password is only ever present as a salted argon2id hash, and the hash
/// never leaves the store through serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address (trimmed, lowercased). Unique across the store.
    pub email: String,
    /// Argon2id PHC string of the password.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// Optional institution the account belongs to.
    pub institution: Option<String>,
    /// Optional self-reported gender.
    pub gender: Option<Gender>,
    /// Optional avatar URL.
    pub avatar_url: Option<String>,
    /// Unix timestamp when created.
    pub created_at: u64,
    /// Unix timestamp when last updated.
    pub updated_at: u64,
}

impl User {
    /// Create a new user from registration input and a precomputed hash.
    pub fn new(input: &NewUser, email: String, password_hash: String) -> Self {
        let now = Self::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            email,
            password_hash,
            role: input.role.unwrap_or_default(),
            institution: input.institution.clone(),
            gender: input.gender,
            avatar_url: input.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Self::now();
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Registration input.
///
/// Carries the plaintext password exactly once, on the way into
/// [`CredentialStore::register`](crate::CredentialStore::register).
#[derive(Clone, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email address (normalized by the store).
    pub email: String,
    /// Plaintext password, consumed by registration.
    pub password: String,
    /// Role; defaults to [`Role::User`] when omitted.
    #[serde(default)]
    pub role: Option<Role>,
    /// Optional institution.
    #[serde(default)]
    pub institution: Option<String>,
    /// Optional gender.
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Optional avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl NewUser {
    /// Registration input with just the required fields.
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            name,
            email,
            password,
            role: None,
            institution: None,
            gender: None,
            avatar_url: None,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

// The plaintext password must not leak through debug output.
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

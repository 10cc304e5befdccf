//! Credential store for Maand.
//!
//! This crate provides:
//! - **Users**: account records with role, optional institution/gender/avatar
//! - **Password hashing**: salted argon2id, hashed before anything is persisted
//! - **Bearer tokens**: opaque random tokens with server-side expiry
//! - **Reset tokens**: single-use, digest-stored, 15-minute expiry
//!
//! # Example
//!
//! ```
//! use maand_auth::{CredentialStore, NewUser, Role};
//!
//! let store = CredentialStore::new();
//!
//! // Register an account (the password is hashed, never stored).
//! let user = store.register(NewUser::new(
//!     "Sarah".into(),
//!     "s@x.com".into(),
//!     "p1".into(),
//! )).unwrap();
//! assert_eq!(user.role, Role::User);
//!
//! // Sign in and get a fresh bearer token.
//! let (user, token) = store.authenticate("s@x.com", "p1").unwrap();
//! assert_eq!(store.resolve_token(&token).unwrap().id, user.id);
//! ```

mod error;
mod password;
mod role;
mod store;
mod token;
mod user;

pub use error::{AuthError, Result};
pub use password::{hash_password, verify_password};
pub use role::Role;
pub use store::CredentialStore;
pub use token::{generate_token, token_digest, BearerToken, ResetToken, RESET_TOKEN_TTL_SECS};
pub use user::{Gender, NewUser, User};

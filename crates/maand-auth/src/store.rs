//! Thread-safe in-memory credential store.

use crate::{
    error::{AuthError, Result},
    password::{hash_password, verify_password},
    token::{generate_token, token_digest, BearerToken, ResetToken, BEARER_TOKEN_TTL_SECS},
    user::{NewUser, User},
};
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Thread-safe in-memory store for user credentials and tokens.
///
/// Email uniqueness is the only cross-record invariant; it is enforced by a
/// single check-and-insert critical section on the email index, never by
/// check-then-write at a higher layer. Password hashing happens outside any
/// lock so a slow hash does not stall unrelated requests.
#[derive(Debug, Default)]
pub struct CredentialStore {
    /// Users by ID.
    users: RwLock<HashMap<Uuid, User>>,

    /// Normalized email to user ID mapping. Guards uniqueness.
    email_index: RwLock<HashMap<String, Uuid>>,

    /// Outstanding bearer tokens by SHA-256 digest.
    bearer_tokens: RwLock<HashMap<String, BearerToken>>,

    /// Outstanding reset tokens by SHA-256 digest.
    reset_tokens: RwLock<HashMap<String, ResetToken>>,

    /// Bearer token lifetime in seconds.
    bearer_ttl_secs: u64,
}

impl CredentialStore {
    /// Create a new empty store with the default bearer token lifetime.
    pub fn new() -> Self {
        Self::with_bearer_ttl(BEARER_TOKEN_TTL_SECS)
    }

    /// Create a store whose bearer tokens expire `ttl_secs` after issuance.
    pub fn with_bearer_ttl(ttl_secs: u64) -> Self {
        Self {
            bearer_ttl_secs: ttl_secs,
            ..Self::default()
        }
    }

    // ==================== Registration & Sign-in ====================

    /// Register a new account.
    ///
    /// The password is hashed before anything is persisted. Fails with
    /// [`AuthError::DuplicateIdentity`] if the (case-normalized) email is
    /// already taken.
    pub fn register(&self, input: NewUser) -> Result<User> {
        let email = normalize_email(&input.email);
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidInput("invalid email address".into()));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::InvalidInput("name cannot be empty".into()));
        }
        if input.password.is_empty() {
            return Err(AuthError::InvalidInput("password cannot be empty".into()));
        }

        // Hash outside the lock; a duplicate just wastes one hash.
        let password_hash = hash_password(&input.password)?;
        let user = User::new(&input, email.clone(), password_hash);

        // Check-and-insert under one write lock on the index.
        let mut index = self.email_index.write();
        if index.contains_key(&email) {
            return Err(AuthError::DuplicateIdentity);
        }
        index.insert(email, user.id);
        self.users.write().insert(user.id, user.clone());

        Ok(user)
    }

    /// Verify credentials and issue a fresh bearer token.
    ///
    /// Unknown email and wrong password are indistinguishable: both fail
    /// with [`AuthError::InvalidCredentials`].
    pub fn authenticate(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .find_by_email(email)
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = generate_token();
        self.bearer_tokens.write().insert(
            token_digest(&token),
            BearerToken::new(user.id, self.bearer_ttl_secs),
        );

        Ok((user, token))
    }

    /// Resolve a bearer token to its user.
    ///
    /// Expired tokens are removed on the way out.
    pub fn resolve_token(&self, token: &str) -> Result<User> {
        let digest = token_digest(token);

        let mut tokens = self.bearer_tokens.write();
        let record = tokens.get(&digest).ok_or(AuthError::TokenInvalidOrExpired)?;

        if record.is_expired() {
            tokens.remove(&digest);
            return Err(AuthError::TokenInvalidOrExpired);
        }

        let user_id = record.user_id;
        drop(tokens);

        self.get_user(user_id).ok_or(AuthError::TokenInvalidOrExpired)
    }

    /// Revoke a bearer token (sign-out). Revoking an unknown token is a no-op.
    pub fn revoke_token(&self, token: &str) {
        self.bearer_tokens.write().remove(&token_digest(token));
    }

    // ==================== Password Reset ====================

    /// Issue a password-reset token for an account.
    ///
    /// Returns `Ok(None)` for an unknown email so callers can answer
    /// generically and not confirm which addresses exist. The plaintext
    /// token is returned exactly once, for out-of-band delivery; only its
    /// digest is stored, alongside a 15-minute expiry.
    pub fn issue_reset_token(&self, email: &str) -> Result<Option<String>> {
        let user = match self.find_by_email(email) {
            Some(user) => user,
            None => return Ok(None),
        };

        let token = generate_token();
        self.reset_tokens
            .write()
            .insert(token_digest(&token), ResetToken::new(user.id));

        Ok(Some(token))
    }

    /// Consume a reset token and replace the account password.
    ///
    /// Single use: a matched token is removed whether or not it has expired.
    /// On any failure the stored password is left untouched. Success revokes
    /// every outstanding bearer token of the account.
    pub fn consume_reset_token(&self, token: &str, new_password: &str) -> Result<User> {
        if new_password.is_empty() {
            return Err(AuthError::InvalidInput("password cannot be empty".into()));
        }

        let record = self
            .reset_tokens
            .write()
            .remove(&token_digest(token))
            .ok_or(AuthError::TokenInvalidOrExpired)?;

        if record.is_expired() {
            return Err(AuthError::TokenInvalidOrExpired);
        }

        let password_hash = hash_password(new_password)?;

        let mut users = self.users.write();
        let user = users
            .get_mut(&record.user_id)
            .ok_or_else(|| AuthError::NotFound(record.user_id.to_string()))?;
        user.password_hash = password_hash;
        user.touch();
        let user = user.clone();
        drop(users);

        // A rotated password invalidates existing sign-ins.
        self.bearer_tokens
            .write()
            .retain(|_, t| t.user_id != record.user_id);

        Ok(user)
    }

    // ==================== Lookups ====================

    /// Get a user by ID.
    pub fn get_user(&self, id: Uuid) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    /// Find a user by (case-normalized) email.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.email_index.read().get(&normalize_email(email))?;
        self.get_user(id)
    }

    /// List all users.
    pub fn list_users(&self) -> Vec<User> {
        self.users.read().values().cloned().collect()
    }

    #[cfg(test)]
    fn expire_reset_token(&self, token: &str) {
        if let Some(record) = self.reset_tokens.write().get_mut(&token_digest(token)) {
            record.expires_at = 0;
        }
    }
}

/// Emails compare case-insensitively and ignore surrounding whitespace.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Role;

    fn sarah() -> NewUser {
        NewUser::new("Sarah".into(), "s@x.com".into(), "p1".into())
    }

    #[test]
    fn test_register_then_authenticate() {
        let store = CredentialStore::new();

        let user = store.register(sarah()).unwrap();
        assert_eq!(user.email, "s@x.com");
        assert_eq!(user.role, Role::User);
        assert_ne!(user.password_hash, "p1");
        assert!(user.password_hash.starts_with("$argon2"));

        let (signed_in, token) = store.authenticate("s@x.com", "p1").unwrap();
        assert_eq!(signed_in.id, user.id);
        assert!(!token.is_empty());

        // Wrong password fails.
        assert!(matches!(
            store.authenticate("s@x.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_unknown_email_indistinguishable_from_wrong_password() {
        let store = CredentialStore::new();
        store.register(sarah()).unwrap();

        let unknown = store.authenticate("nobody@x.com", "p1").unwrap_err();
        let wrong = store.authenticate("s@x.com", "nope").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_duplicate_email_case_insensitive() {
        let store = CredentialStore::new();
        store.register(sarah()).unwrap();

        let dup = NewUser::new("Imposter".into(), "  S@X.COM ".into(), "p2".into());
        assert!(matches!(
            store.register(dup),
            Err(AuthError::DuplicateIdentity)
        ));

        // Exactly one record for that email survives.
        assert_eq!(store.list_users().len(), 1);
        assert_eq!(store.find_by_email("S@x.Com").unwrap().name, "Sarah");
    }

    #[test]
    fn test_register_rejects_bad_input() {
        let store = CredentialStore::new();

        let no_at = NewUser::new("A".into(), "not-an-email".into(), "pw".into());
        assert!(matches!(
            store.register(no_at),
            Err(AuthError::InvalidInput(_))
        ));

        let blank_name = NewUser::new("  ".into(), "a@b.com".into(), "pw".into());
        assert!(matches!(
            store.register(blank_name),
            Err(AuthError::InvalidInput(_))
        ));

        let empty_password = NewUser::new("A".into(), "a@b.com".into(), "".into());
        assert!(matches!(
            store.register(empty_password),
            Err(AuthError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_and_revoke_token() {
        let store = CredentialStore::new();
        let user = store.register(sarah()).unwrap();

        let (_, token) = store.authenticate("s@x.com", "p1").unwrap();
        assert_eq!(store.resolve_token(&token).unwrap().id, user.id);

        assert!(matches!(
            store.resolve_token("deadbeef"),
            Err(AuthError::TokenInvalidOrExpired)
        ));

        store.revoke_token(&token);
        assert!(matches!(
            store.resolve_token(&token),
            Err(AuthError::TokenInvalidOrExpired)
        ));

        // Revoking again is harmless.
        store.revoke_token(&token);
    }

    #[test]
    fn test_expired_bearer_token() {
        let store = CredentialStore::with_bearer_ttl(0);
        store.register(sarah()).unwrap();

        let (_, token) = store.authenticate("s@x.com", "p1").unwrap();
        assert!(matches!(
            store.resolve_token(&token),
            Err(AuthError::TokenInvalidOrExpired)
        ));
    }

    #[test]
    fn test_reset_token_happy_path() {
        let store = CredentialStore::new();
        store.register(sarah()).unwrap();

        let token = store.issue_reset_token("s@x.com").unwrap().unwrap();
        store.consume_reset_token(&token, "p2").unwrap();

        // New password works, old one is rejected.
        assert!(store.authenticate("s@x.com", "p2").is_ok());
        assert!(matches!(
            store.authenticate("s@x.com", "p1"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_reset_token_single_use() {
        let store = CredentialStore::new();
        store.register(sarah()).unwrap();

        let token = store.issue_reset_token("s@x.com").unwrap().unwrap();
        store.consume_reset_token(&token, "p2").unwrap();

        assert!(matches!(
            store.consume_reset_token(&token, "p3"),
            Err(AuthError::TokenInvalidOrExpired)
        ));
        assert!(store.authenticate("s@x.com", "p2").is_ok());
    }

    #[test]
    fn test_wrong_reset_token_leaves_password_alone() {
        let store = CredentialStore::new();
        store.register(sarah()).unwrap();
        store.issue_reset_token("s@x.com").unwrap().unwrap();

        assert!(matches!(
            store.consume_reset_token("not-the-token", "p2"),
            Err(AuthError::TokenInvalidOrExpired)
        ));
        assert!(store.authenticate("s@x.com", "p1").is_ok());
    }

    #[test]
    fn test_expired_reset_token() {
        let store = CredentialStore::new();
        store.register(sarah()).unwrap();

        let token = store.issue_reset_token("s@x.com").unwrap().unwrap();
        store.expire_reset_token(&token);

        assert!(matches!(
            store.consume_reset_token(&token, "p2"),
            Err(AuthError::TokenInvalidOrExpired)
        ));
        assert!(store.authenticate("s@x.com", "p1").is_ok());
    }

    #[test]
    fn test_reset_token_unknown_email_is_silent() {
        let store = CredentialStore::new();
        assert!(store.issue_reset_token("ghost@x.com").unwrap().is_none());
    }

    #[test]
    fn test_password_reset_revokes_sessions() {
        let store = CredentialStore::new();
        store.register(sarah()).unwrap();

        let (_, bearer) = store.authenticate("s@x.com", "p1").unwrap();
        assert!(store.resolve_token(&bearer).is_ok());

        let token = store.issue_reset_token("s@x.com").unwrap().unwrap();
        store.consume_reset_token(&token, "p2").unwrap();

        assert!(matches!(
            store.resolve_token(&bearer),
            Err(AuthError::TokenInvalidOrExpired)
        ));
    }
}

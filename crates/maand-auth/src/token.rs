//! Bearer and password-reset token types.
//!
//! Tokens are opaque random values. The store never keeps the plaintext;
//! it keeps the SHA-256 digest and looks tokens up by digest, so a leaked
//! store dump does not yield usable credentials.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Reset tokens expire 15 minutes after issuance.
pub const RESET_TOKEN_TTL_SECS: u64 = 15 * 60;

/// Default bearer token lifetime.
pub const BEARER_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

const TOKEN_BYTES: usize = 32;

/// Generate a fresh random token (hex-encoded).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 digest of a plaintext token, hex-encoded.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Server-side record of an issued bearer token, keyed by digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerToken {
    /// Owning user.
    pub user_id: Uuid,
    /// Unix timestamp when issued.
    pub issued_at: u64,
    /// Unix timestamp after which the token no longer resolves.
    pub expires_at: u64,
}

impl BearerToken {
    /// Create a record expiring `ttl_secs` from now.
    pub fn new(user_id: Uuid, ttl_secs: u64) -> Self {
        let now = now();
        Self {
            user_id,
            issued_at: now,
            expires_at: now.saturating_add(ttl_secs),
        }
    }

    /// Check if the token is past its expiry.
    pub fn is_expired(&self) -> bool {
        now() >= self.expires_at
    }
}

/// Server-side record of a password-reset token, keyed by digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    /// Owning user.
    pub user_id: Uuid,
    /// Unix timestamp after which the token is dead.
    pub expires_at: u64,
}

impl ResetToken {
    /// Create a record expiring [`RESET_TOKEN_TTL_SECS`] from now.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            expires_at: now().saturating_add(RESET_TOKEN_TTL_SECS),
        }
    }

    /// Check if the token is past its expiry.
    pub fn is_expired(&self) -> bool {
        now() >= self.expires_at
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

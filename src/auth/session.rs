//! Session state derived from token claims

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::auth::claims::Claims;

/// Identity derived from the token's claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Username, from the `sub` claim
    pub username: String,

    /// Numeric user id, from the `uid` claim
    pub uid: i64,
}

/// The authenticated session.
///
/// `user` and `expires_at` exist exactly as long as `token` does; a token
/// that fails to decode never produces a session at all.
#[derive(Debug, Clone)]
pub struct Session {
    /// The raw bearer token
    pub token: String,

    /// Identity derived from the token
    pub user: AuthUser,

    /// Absolute expiry instant, epoch milliseconds
    pub expires_at: i64,
}

pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

impl Session {
    /// Build a session from a token and its already-decoded claims.
    /// Claims carry seconds; session state carries milliseconds.
    pub fn from_claims(token: &str, claims: Claims) -> Self {
        Self {
            token: token.to_string(),
            user: AuthUser {
                username: claims.sub,
                uid: claims.uid,
            },
            expires_at: claims.exp * 1000,
        }
    }

    /// Whether the expiry instant has passed
    pub fn is_expired(&self) -> bool {
        now_millis() >= self.expires_at
    }

    /// Time left until expiry; zero once expired
    pub fn remaining(&self) -> Duration {
        let left = self.expires_at - now_millis();
        if left > 0 {
            Duration::from_millis(left as u64)
        } else {
            Duration::ZERO
        }
    }
}

//! Caller authentication.
//!
//! Resolves an inbound call to a [`SignedInUser`]. The default
//! implementation accepts `Authorization: Bearer <token>` against a fixed set
//! of configured API tokens, keeping only their SHA-256 hashes in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use sha2::{Digest, Sha256};

use crate::config::ApiTokenConfig;
use crate::models::SignedInUser;

/// Resolves the caller of an inbound request.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns `None` when no signed-in user can be resolved.
    async fn resolve(&self, headers: &HeaderMap) -> Option<SignedInUser>;
}

/// Bearer token authenticator over configured API tokens.
#[derive(Debug, Default)]
pub struct StaticTokenAuthenticator {
    /// token hash -> user
    users: HashMap<String, SignedInUser>,
}

impl StaticTokenAuthenticator {
    pub fn new(tokens: &[ApiTokenConfig]) -> Self {
        let users = tokens
            .iter()
            .map(|t| {
                (
                    hash_token(&t.token),
                    SignedInUser::new(t.user_id, t.org_id, t.login.clone()),
                )
            })
            .collect();
        Self { users }
    }

    /// Number of configured tokens.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn resolve(&self, headers: &HeaderMap) -> Option<SignedInUser> {
        let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = header.strip_prefix("Bearer ")?.trim();
        if token.is_empty() {
            return None;
        }

        let user = self.users.get(&hash_token(token)).cloned();
        if user.is_none() {
            tracing::debug!("unknown API token");
        }
        user
    }
}

/// SHA-256 hash a token for lookup.
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

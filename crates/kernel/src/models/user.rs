//! Signed-in user identity.

use serde::{Deserialize, Serialize};

/// An authenticated principal scoped to one organization.
///
/// Created by the authenticator for each inbound call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub user_id: i64,
    pub org_id: i64,
    pub login: String,
}

impl SignedInUser {
    /// Create a new signed-in user.
    pub fn new(user_id: i64, org_id: i64, login: impl Into<String>) -> Self {
        Self {
            user_id,
            org_id,
            login: login.into(),
        }
    }
}

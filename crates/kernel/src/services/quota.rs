//! Quota checks for import targets.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::SignedInUser;
use crate::services::dashboard_store::DashboardStore;

/// Quota target name for the per-organization dashboard count.
pub const DASHBOARD_QUOTA_TARGET: &str = "dashboard";

/// Decides whether a caller has reached the quota for a target.
///
/// Implementations must be pure reads: checking never consumes quota.
#[async_trait]
pub trait QuotaChecker: Send + Sync {
    async fn reached(&self, user: &SignedInUser, target: &str) -> Result<bool>;
}

/// Per-organization dashboard quota backed by the dashboard store.
pub struct OrgDashboardQuota {
    /// Maximum dashboards per organization; negative means unlimited.
    limit: i64,
    store: Arc<DashboardStore>,
}

impl OrgDashboardQuota {
    pub fn new(limit: i64, store: Arc<DashboardStore>) -> Self {
        Self { limit, store }
    }
}

#[async_trait]
impl QuotaChecker for OrgDashboardQuota {
    async fn reached(&self, user: &SignedInUser, target: &str) -> Result<bool> {
        if target != DASHBOARD_QUOTA_TARGET || self.limit < 0 {
            return Ok(false);
        }

        let used = i64::try_from(self.store.count_for_org(user.org_id))?;
        let reached = used >= self.limit;
        if reached {
            tracing::debug!(org_id = user.org_id, used, limit = self.limit, "dashboard quota reached");
        }

        Ok(reached)
    }
}

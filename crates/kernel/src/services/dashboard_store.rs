//! In-memory dashboard storage.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;

/// A stored dashboard.
#[derive(Debug, Clone)]
pub struct StoredDashboard {
    pub id: i64,
    pub org_id: i64,
    pub uid: String,
    pub title: String,
    pub folder_uid: String,
    pub plugin_id: String,
    pub version: i64,
    pub data: Value,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Dashboard fields supplied by a save.
#[derive(Debug, Clone)]
pub struct SaveDashboard {
    pub org_id: i64,
    pub uid: String,
    pub title: String,
    pub folder_uid: String,
    pub plugin_id: String,
    pub data: Value,
    pub overwrite: bool,
}

/// Concurrent dashboard map keyed by `(org_id, uid)`.
#[derive(Debug)]
pub struct DashboardStore {
    dashboards: DashMap<(i64, String), StoredDashboard>,
    next_id: AtomicI64,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    pub fn new() -> Self {
        Self {
            dashboards: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of dashboards owned by an organization.
    pub fn count_for_org(&self, org_id: i64) -> usize {
        self.dashboards
            .iter()
            .filter(|entry| entry.key().0 == org_id)
            .count()
    }

    /// Look up a dashboard by organization and uid.
    pub fn get(&self, org_id: i64, uid: &str) -> Option<StoredDashboard> {
        self.dashboards
            .get(&(org_id, uid.to_string()))
            .map(|entry| entry.value().clone())
    }

    /// Insert or replace a dashboard.
    ///
    /// Returns `None` when a dashboard with the same uid exists and
    /// `overwrite` is false. Replacing keeps the id and bumps the version.
    pub fn save(&self, cmd: SaveDashboard) -> Option<StoredDashboard> {
        let now = Utc::now();

        match self.dashboards.entry((cmd.org_id, cmd.uid.clone())) {
            Entry::Occupied(mut occupied) => {
                if !cmd.overwrite {
                    return None;
                }
                let existing = occupied.get_mut();
                existing.title = cmd.title;
                existing.folder_uid = cmd.folder_uid;
                existing.plugin_id = cmd.plugin_id;
                existing.data = cmd.data;
                existing.version += 1;
                existing.updated = now;
                Some(existing.clone())
            }
            Entry::Vacant(vacant) => {
                let stored = StoredDashboard {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed),
                    org_id: cmd.org_id,
                    uid: cmd.uid,
                    title: cmd.title,
                    folder_uid: cmd.folder_uid,
                    plugin_id: cmd.plugin_id,
                    version: 1,
                    data: cmd.data,
                    created: now,
                    updated: now,
                };
                vacant.insert(stored.clone());
                Some(stored)
            }
        }
    }
}

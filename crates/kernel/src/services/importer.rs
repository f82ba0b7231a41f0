//! Dashboard import service.
//!
//! The default importer resolves the dashboard document (inline or from a
//! plugin directory), substitutes template inputs, and saves it to the
//! in-memory [`DashboardStore`].

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::models::{ImportDashboardInput, ImportDashboardRequest, ImportDashboardResponse, SignedInUser};
use crate::services::dashboard_store::{DashboardStore, SaveDashboard};

/// Key holding template input declarations inside exported dashboards.
const INPUTS_KEY: &str = "__inputs";

/// Dashboard import failures.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("dashboard title cannot be empty")]
    MissingTitle,

    #[error("a dashboard with uid {0:?} already exists")]
    AlreadyExists(String),

    #[error("invalid plugin dashboard path {0:?}")]
    InvalidPath(String),

    #[error("failed to read plugin dashboard {path}")]
    PluginDashboard {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("plugin dashboard {path} is not valid JSON")]
    PluginDashboardJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("import request has no dashboard")]
    NoDashboard,
}

/// Performs the actual dashboard import.
#[async_trait]
pub trait DashboardImporter: Send + Sync {
    async fn import_dashboard(
        &self,
        user: &SignedInUser,
        req: ImportDashboardRequest,
    ) -> Result<ImportDashboardResponse, ImportError>;
}

/// Importer that writes into an in-memory dashboard store.
pub struct InMemoryDashboardImporter {
    store: Arc<DashboardStore>,
    plugins_dir: PathBuf,
}

impl InMemoryDashboardImporter {
    pub fn new(store: Arc<DashboardStore>, plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            plugins_dir: plugins_dir.into(),
        }
    }

    /// Load a dashboard shipped by a plugin.
    async fn load_plugin_dashboard(&self, plugin_id: &str, path: &str) -> Result<Value, ImportError> {
        if !is_safe_relative(plugin_id) || !is_safe_relative(path) || path.is_empty() {
            return Err(ImportError::InvalidPath(format!("{plugin_id}/{path}")));
        }

        let full_path = self.plugins_dir.join(plugin_id).join(path);
        let bytes = tokio::fs::read(&full_path)
            .await
            .map_err(|source| ImportError::PluginDashboard {
                path: full_path.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| ImportError::PluginDashboardJson {
            path: full_path,
            source,
        })
    }
}

#[async_trait]
impl DashboardImporter for InMemoryDashboardImporter {
    async fn import_dashboard(
        &self,
        user: &SignedInUser,
        req: ImportDashboardRequest,
    ) -> Result<ImportDashboardResponse, ImportError> {
        let mut dashboard = match req.dashboard {
            Some(doc) => doc,
            None if !req.plugin_id.is_empty() => {
                self.load_plugin_dashboard(&req.plugin_id, &req.path).await?
            }
            None => return Err(ImportError::NoDashboard),
        };

        apply_inputs(&mut dashboard, &req.inputs);
        if let Value::Object(map) = &mut dashboard {
            map.remove(INPUTS_KEY);
        }

        let title = dashboard
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        if title.is_empty() {
            return Err(ImportError::MissingTitle);
        }

        let uid = match dashboard.get("uid").and_then(Value::as_str) {
            Some(uid) if !uid.is_empty() => uid.to_string(),
            _ => uuid::Uuid::now_v7().simple().to_string(),
        };
        if let Value::Object(map) = &mut dashboard {
            map.insert("uid".to_string(), Value::String(uid.clone()));
        }

        let revision = dashboard
            .get("revision")
            .and_then(Value::as_i64)
            .unwrap_or(1);

        let stored = self
            .store
            .save(SaveDashboard {
                org_id: user.org_id,
                uid: uid.clone(),
                title: title.clone(),
                folder_uid: req.folder_uid.clone(),
                plugin_id: req.plugin_id.clone(),
                data: dashboard,
                overwrite: req.overwrite,
            })
            .ok_or_else(|| ImportError::AlreadyExists(uid.clone()))?;

        info!(
            user_id = user.user_id,
            org_id = user.org_id,
            uid = %stored.uid,
            version = stored.version,
            "dashboard imported"
        );

        let slug = slugify(&title);
        Ok(ImportDashboardResponse {
            imported_uri: format!("db/{slug}"),
            imported_url: format!("/d/{uid}/{slug}"),
            uid,
            plugin_id: req.plugin_id,
            title,
            imported: true,
            slug,
            dashboard_id: stored.id,
            folder_uid: stored.folder_uid,
            path: req.path,
            revision,
            imported_revision: revision,
            removed: false,
        })
    }
}

/// Replace `${name}` placeholders in every string value.
fn apply_inputs(value: &mut Value, inputs: &[ImportDashboardInput]) {
    if inputs.is_empty() {
        return;
    }

    match value {
        Value::String(s) if s.contains("${") => {
            for input in inputs {
                let placeholder = format!("${{{}}}", input.name);
                if s.contains(&placeholder) {
                    *s = s.replace(&placeholder, &input.value);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                apply_inputs(item, inputs);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                apply_inputs(item, inputs);
            }
        }
        _ => {}
    }
}

/// Lowercase alphanumeric runs joined by `-`.
fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// A relative path that cannot escape its base directory.
fn is_safe_relative(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

//! Dashboard import request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/dashboards/import`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDashboardRequest {
    /// Plugin that ships the dashboard; empty when the dashboard is inline.
    #[serde(default)]
    pub plugin_id: String,

    /// Path of the dashboard file inside the plugin directory.
    #[serde(default)]
    pub path: String,

    /// Replace an existing dashboard with the same uid.
    #[serde(default)]
    pub overwrite: bool,

    /// Inline dashboard document.
    #[serde(default)]
    pub dashboard: Option<Value>,

    /// Template inputs substituted into `${name}` placeholders.
    #[serde(default)]
    pub inputs: Vec<ImportDashboardInput>,

    #[serde(default)]
    pub folder_uid: String,
}

impl ImportDashboardRequest {
    /// Check the request carries something to import.
    ///
    /// Returns a short reason when it does not.
    pub fn validate(&self) -> Result<(), &'static str> {
        match &self.dashboard {
            None if self.plugin_id.is_empty() => Err("pluginId and dashboard are both empty"),
            Some(doc) if !doc.is_object() => Err("dashboard must be a JSON object"),
            _ => Ok(()),
        }
    }
}

/// A template input for a dashboard import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDashboardInput {
    pub name: String,
    #[serde(rename = "type", default)]
    pub input_type: String,
    #[serde(default)]
    pub plugin_id: String,
    #[serde(default)]
    pub value: String,
}

/// Result of a successful import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDashboardResponse {
    pub uid: String,
    pub plugin_id: String,
    pub title: String,
    pub imported: bool,
    pub imported_uri: String,
    pub imported_url: String,
    pub slug: String,
    pub dashboard_id: i64,
    pub folder_uid: String,
    pub path: String,
    pub revision: i64,
    pub imported_revision: i64,
    pub removed: bool,
}

//! Dashboard import test utilities.
//!
//! Helpers for integration testing: dashboard fixtures, import request
//! bodies, and assertion utilities for JSON responses.

use serde_json::{Value as JsonValue, json};

/// Create a test dashboard with a title and uid.
pub fn test_dashboard(title: &str) -> TestDashboard {
    TestDashboard {
        title: title.to_string(),
        uid: None,
        panels: vec![],
        revision: None,
        extra: serde_json::Map::new(),
    }
}

/// A test dashboard builder for creating dashboard documents.
#[derive(Debug, Clone)]
pub struct TestDashboard {
    pub title: String,
    pub uid: Option<String>,
    pub panels: Vec<JsonValue>,
    pub revision: Option<i64>,
    pub extra: serde_json::Map<String, JsonValue>,
}

impl TestDashboard {
    /// Set the uid.
    pub fn with_uid(mut self, uid: &str) -> Self {
        self.uid = Some(uid.to_string());
        self
    }

    /// Add a panel of the given type.
    pub fn with_panel(mut self, panel_type: &str) -> Self {
        let id = self.panels.len() + 1;
        self.panels.push(json!({ "id": id, "type": panel_type }));
        self
    }

    /// Set the revision.
    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Set an arbitrary top-level key.
    pub fn with_key(mut self, key: &str, value: JsonValue) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    /// Build the dashboard document.
    pub fn build(self) -> JsonValue {
        let mut doc = self.extra;
        doc.insert("title".to_string(), json!(self.title));
        if let Some(uid) = self.uid {
            doc.insert("uid".to_string(), json!(uid));
        }
        if !self.panels.is_empty() {
            doc.insert("panels".to_string(), JsonValue::Array(self.panels));
        }
        if let Some(revision) = self.revision {
            doc.insert("revision".to_string(), json!(revision));
        }
        JsonValue::Object(doc)
    }
}

/// Import request bodies for `POST /api/dashboards/import`.
pub mod requests {
    use serde_json::{Value, json};

    /// A request importing an inline dashboard.
    pub fn inline(dashboard: Value) -> Value {
        json!({ "dashboard": dashboard })
    }

    /// A request importing an inline dashboard, replacing any existing one.
    pub fn inline_overwrite(dashboard: Value) -> Value {
        json!({ "dashboard": dashboard, "overwrite": true })
    }

    /// A request importing a dashboard shipped by a plugin.
    pub fn from_plugin(plugin_id: &str, path: &str) -> Value {
        json!({ "pluginId": plugin_id, "path": path })
    }

    /// A request with neither a plugin id nor a dashboard.
    pub fn empty() -> Value {
        json!({ "pluginId": "", "dashboard": null })
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a JSON value does not have a specific key.
    pub fn lacks_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_none(),
            "Expected JSON to lack key '{key}', got: {value}"
        );
    }
}

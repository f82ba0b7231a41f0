//! Dashboard schema normalization ("apply defaults").
//!
//! Fills in schema-default fields that a trimmed dashboard document leaves
//! out. Present values always win over defaults; nested objects are merged
//! key by key.

use anyhow::{Result, bail};
use serde_json::{Map, Value, json};

/// Schema version stamped on dashboards that do not declare one.
pub const DEFAULT_SCHEMA_VERSION: i64 = 36;

/// Expands a dashboard document with schema defaults.
pub trait SchemaNormalizer: Send + Sync {
    /// Whether normalization is available at all.
    fn is_enabled(&self) -> bool;

    /// Return the document with every missing default filled in.
    fn apply_defaults(&self, document: Value) -> Result<Value>;
}

/// Built-in dashboard defaults.
#[derive(Debug, Clone, Default)]
pub struct DashboardSchemaDefaults {
    enabled: bool,
}

impl DashboardSchemaDefaults {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl SchemaNormalizer for DashboardSchemaDefaults {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply_defaults(&self, document: Value) -> Result<Value> {
        let Value::Object(mut dashboard) = document else {
            bail!("dashboard must be a JSON object");
        };

        merge_defaults(&mut dashboard, dashboard_defaults());

        if let Some(panels) = dashboard.get_mut("panels") {
            let Value::Array(panels) = panels else {
                bail!("dashboard panels must be an array");
            };
            for (index, panel) in panels.iter_mut().enumerate() {
                let Value::Object(panel) = panel else {
                    bail!("panel {index} must be a JSON object");
                };
                merge_defaults(panel, panel_defaults());
            }
        }

        Ok(Value::Object(dashboard))
    }
}

fn dashboard_defaults() -> Value {
    json!({
        "editable": true,
        "graphTooltip": 0,
        "panels": [],
        "schemaVersion": DEFAULT_SCHEMA_VERSION,
        "style": "dark",
        "tags": [],
        "timezone": "browser",
        "time": { "from": "now-6h", "to": "now" },
        "timepicker": {},
        "templating": { "list": [] },
        "annotations": { "list": [] },
        "links": []
    })
}

fn panel_defaults() -> Value {
    json!({
        "options": {},
        "fieldConfig": { "defaults": {}, "overrides": [] },
        "targets": []
    })
}

/// Copy every default missing from `target`, recursing where both sides are objects.
fn merge_defaults(target: &mut Map<String, Value>, defaults: Value) {
    let Value::Object(defaults) = defaults else {
        return;
    };

    for (key, default) in defaults {
        match target.get_mut(&key) {
            None => {
                target.insert(key, default);
            }
            Some(Value::Object(existing)) => merge_defaults(existing, default),
            Some(_) => {}
        }
    }
}

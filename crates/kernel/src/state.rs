//! Application state shared across all handlers.

use std::sync::Arc;

use tracing::info;

use crate::config::{Config, DEFAULT_IMPORT_BODY_LIMIT};
use crate::metrics::Metrics;
use crate::services::{
    Authenticator, DashboardImporter, DashboardSchemaDefaults, DashboardStore,
    InMemoryDashboardImporter, OrgDashboardQuota, QuotaChecker, SchemaNormalizer,
    StaticTokenAuthenticator,
};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Collaborators are fixed at
/// construction; nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Resolves callers to signed-in users.
    authenticator: Arc<dyn Authenticator>,

    /// Per-organization quota checks.
    quota: Arc<dyn QuotaChecker>,

    /// Schema defaults normalizer.
    schema: Arc<dyn SchemaNormalizer>,

    /// Dashboard import service.
    importer: Arc<dyn DashboardImporter>,

    /// Prometheus metrics.
    metrics: Arc<Metrics>,

    /// Maximum import request body size in bytes.
    import_body_limit: usize,
}

impl AppState {
    /// Create application state with the built-in collaborators.
    pub fn new(config: &Config) -> Self {
        let store = Arc::new(DashboardStore::new());
        let authenticator = StaticTokenAuthenticator::new(&config.api_tokens);

        info!(
            api_tokens = authenticator.len(),
            dashboard_quota = config.dashboard_quota,
            schema_defaults = config.schema_defaults_enabled,
            "Collaborators configured"
        );

        Self::from_parts(
            Arc::new(authenticator),
            Arc::new(OrgDashboardQuota::new(config.dashboard_quota, store.clone())),
            Arc::new(DashboardSchemaDefaults::new(config.schema_defaults_enabled)),
            Arc::new(InMemoryDashboardImporter::new(store, config.plugins_dir.clone())),
            config.import_body_limit,
        )
    }

    /// Create application state from explicit collaborators.
    ///
    /// Uses the default import body limit.
    pub fn with_collaborators(
        authenticator: Arc<dyn Authenticator>,
        quota: Arc<dyn QuotaChecker>,
        schema: Arc<dyn SchemaNormalizer>,
        importer: Arc<dyn DashboardImporter>,
    ) -> Self {
        Self::from_parts(
            authenticator,
            quota,
            schema,
            importer,
            DEFAULT_IMPORT_BODY_LIMIT,
        )
    }

    fn from_parts(
        authenticator: Arc<dyn Authenticator>,
        quota: Arc<dyn QuotaChecker>,
        schema: Arc<dyn SchemaNormalizer>,
        importer: Arc<dyn DashboardImporter>,
        import_body_limit: usize,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                authenticator,
                quota,
                schema,
                importer,
                metrics: Arc::new(Metrics::new()),
                import_body_limit,
            }),
        }
    }

    /// Get the authenticator.
    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.inner.authenticator
    }

    /// Get the quota checker.
    pub fn quota(&self) -> &Arc<dyn QuotaChecker> {
        &self.inner.quota
    }

    /// Get the schema normalizer.
    pub fn schema(&self) -> &Arc<dyn SchemaNormalizer> {
        &self.inner.schema
    }

    /// Get the dashboard importer.
    pub fn importer(&self) -> &Arc<dyn DashboardImporter> {
        &self.inner.importer
    }

    /// Get the metrics registry.
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.inner.metrics
    }

    /// Maximum import request body size in bytes.
    pub fn import_body_limit(&self) -> usize {
        self.inner.import_body_limit
    }
}

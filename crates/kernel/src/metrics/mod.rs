//! Prometheus metrics collection.
//!
//! Provides dashboard import metrics in Prometheus format.

use prometheus_client::encoding::{EncodeLabelSet, text::encode};
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

/// Terminal outcome of an import call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    Unauthenticated,
    Malformed,
    Unreadable,
    QuotaExceeded,
    QuotaError,
    NormalizationFailed,
    ImportFailed,
}

impl ImportOutcome {
    /// Label value used in exported metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ImportOutcome::Imported => "imported",
            ImportOutcome::Unauthenticated => "unauthenticated",
            ImportOutcome::Malformed => "malformed",
            ImportOutcome::Unreadable => "unreadable",
            ImportOutcome::QuotaExceeded => "quota_exceeded",
            ImportOutcome::QuotaError => "quota_error",
            ImportOutcome::NormalizationFailed => "normalization_failed",
            ImportOutcome::ImportFailed => "import_failed",
        }
    }
}

/// Import outcome labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ImportLabels {
    pub outcome: String,
}

/// Application metrics.
pub struct Metrics {
    registry: Registry,

    /// Import calls by outcome.
    pub dashboard_imports: Family<ImportLabels, Counter>,

    /// Dashboards passed through the schema defaults normalizer.
    pub normalizations: Counter,
}

impl Metrics {
    /// Create a new metrics registry.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let dashboard_imports = Family::<ImportLabels, Counter>::default();
        registry.register(
            "dashboard_imports",
            "Dashboard import calls by outcome",
            dashboard_imports.clone(),
        );

        let normalizations = Counter::default();
        registry.register(
            "dashboard_normalizations",
            "Dashboards expanded with schema defaults",
            normalizations.clone(),
        );

        Self {
            registry,
            dashboard_imports,
            normalizations,
        }
    }

    /// Record the outcome of an import call.
    pub fn record_import(&self, outcome: ImportOutcome) {
        self.dashboard_imports
            .get_or_create(&ImportLabels {
                outcome: outcome.as_str().to_string(),
            })
            .inc();
    }

    /// Record a schema defaults pass.
    pub fn record_normalization(&self) {
        self.normalizations.inc();
    }

    /// Encode metrics in Prometheus text format.
    ///
    /// # Panics
    ///
    /// Panics if Prometheus metric encoding to a `String` buffer fails.
    /// The `fmt::Write` impl for `String` is infallible, and all metric
    /// labels use derived `EncodeLabelSet` impls that do not produce
    /// `fmt::Error`.
    pub fn encode(&self) -> String {
        let mut buffer = String::new();
        // Prometheus encoding to String buffer is infallible
        #[allow(clippy::expect_used)]
        encode(&mut buffer, &self.registry).expect("encoding metrics");
        buffer
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish()
    }
}

//! Collaborators consumed by the dashboard import gatekeeper.
//!
//! Each collaborator is a capability trait so the gatekeeper can be wired
//! against the in-process defaults here or against fakes in tests.

pub mod auth;
pub mod dashboard_store;
pub mod importer;
pub mod quota;
pub mod schema;

pub use auth::{Authenticator, StaticTokenAuthenticator};
pub use dashboard_store::{DashboardStore, StoredDashboard};
pub use importer::{DashboardImporter, ImportError, InMemoryDashboardImporter};
pub use quota::{DASHBOARD_QUOTA_TARGET, OrgDashboardQuota, QuotaChecker};
pub use schema::{DashboardSchemaDefaults, SchemaNormalizer};

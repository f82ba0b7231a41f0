//! Request-scoped models.

pub mod dashboard_import;
pub mod user;

pub use dashboard_import::{ImportDashboardInput, ImportDashboardRequest, ImportDashboardResponse};
pub use user::SignedInUser;

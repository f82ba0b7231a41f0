//! Dashboard import endpoint.
//!
//! `POST /api/dashboards/import` gates every call through, in order:
//!
//! 1. authentication (anonymous callers get the same 404 as an unknown route)
//! 2. request shape (`pluginId` or `dashboard` required, else 422)
//! 3. the organization dashboard quota (403 when reached)
//! 4. schema defaults, unless `?trimdefaults=true` or the normalizer is disabled
//!
//! and only then hands the request to the importer, at most once.

use anyhow::Context;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, ExtensionRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::routing::post;
use axum::{Extension, Json, Router};
use tracing::debug;

use crate::config::parse_bool_flag;
use crate::error::{AppError, AppResult};
use crate::metrics::ImportOutcome;
use crate::models::{ImportDashboardRequest, ImportDashboardResponse, SignedInUser};
use crate::services::DASHBOARD_QUOTA_TARGET;
use crate::state::AppState;

/// Whether the caller asked to keep schema defaults trimmed.
///
/// The first `trimdefaults` parameter wins. Absent or unparseable values
/// mean "expand defaults".
pub fn trim_defaults(params: &[(String, String)]) -> bool {
    params
        .iter()
        .find(|(key, _)| key == "trimdefaults")
        .and_then(|(_, value)| parse_bool_flag(value))
        .unwrap_or(false)
}

/// Decode an import request body.
///
/// The body is JSON regardless of the declared content type.
pub fn decode_request(body: &[u8]) -> AppResult<ImportDashboardRequest> {
    serde_json::from_slice(body).map_err(|e| AppError::MalformedRequest(e.to_string()))
}

/// Run the import decision path for one call.
///
/// `payload` is the decoded body, or the error that reading or decoding it
/// produced. Authentication is checked before the payload is looked at.
pub async fn handle_import(
    state: &AppState,
    user: Option<SignedInUser>,
    payload: AppResult<ImportDashboardRequest>,
    trim_defaults: bool,
) -> AppResult<ImportDashboardResponse> {
    let Some(user) = user else {
        return Err(AppError::Unauthenticated);
    };

    let mut req = payload?;
    req.validate()
        .map_err(|reason| AppError::MalformedRequest(reason.to_string()))?;

    let reached = state
        .quota()
        .reached(&user, DASHBOARD_QUOTA_TARGET)
        .await
        .context("failed to check dashboard quota")?;
    if reached {
        debug!(user_id = user.user_id, org_id = user.org_id, "dashboard quota reached");
        return Err(AppError::QuotaExceeded);
    }

    if !trim_defaults
        && state.schema().is_enabled()
        && let Some(dashboard) = req.dashboard.take()
    {
        let normalized = state
            .schema()
            .apply_defaults(dashboard)
            .map_err(AppError::Normalization)?;
        state.metrics().record_normalization();
        req.dashboard = Some(normalized);
    }

    let resp = state.importer().import_dashboard(&user, req).await?;
    Ok(resp)
}

/// POST /api/dashboards/import
async fn import_dashboard(
    State(state): State<AppState>,
    user: Result<Extension<SignedInUser>, ExtensionRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<ImportDashboardResponse>> {
    let user = user.ok().map(|Extension(user)| user);
    let trim = match query {
        Ok(Query(params)) => trim_defaults(&params),
        Err(rejection) => {
            debug!(error = %rejection, "ignoring unparseable import query");
            false
        }
    };
    let payload = body
        .map_err(AppError::from)
        .and_then(|bytes| decode_request(&bytes));

    let result = handle_import(&state, user, payload, trim).await;
    state.metrics().record_import(outcome(&result));

    result.map(Json)
}

fn outcome(result: &AppResult<ImportDashboardResponse>) -> ImportOutcome {
    match result {
        Ok(_) => ImportOutcome::Imported,
        Err(AppError::Unauthenticated | AppError::NotFound) => ImportOutcome::Unauthenticated,
        Err(AppError::MalformedRequest(_)) => ImportOutcome::Malformed,
        Err(AppError::Body(_)) => ImportOutcome::Unreadable,
        Err(AppError::QuotaExceeded) => ImportOutcome::QuotaExceeded,
        Err(AppError::Internal(_)) => ImportOutcome::QuotaError,
        Err(AppError::Normalization(_)) => ImportOutcome::NormalizationFailed,
        Err(AppError::Import(_)) => ImportOutcome::ImportFailed,
    }
}

/// Create the dashboard import router.
///
/// Other methods on the import path fall through to the generic 404.
/// Bodies larger than `body_limit` bytes are rejected with 413.
pub fn router(body_limit: usize) -> Router<AppState> {
    Router::new().route(
        "/api/dashboards/import",
        post(import_dashboard)
            .fallback(super::not_found)
            .layer(DefaultBodyLimit::max(body_limit)),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn trim_defaults_parses_bool_like_values() {
        assert!(trim_defaults(&params(&[("trimdefaults", "true")])));
        assert!(trim_defaults(&params(&[("trimdefaults", "1")])));
        assert!(!trim_defaults(&params(&[("trimdefaults", "false")])));
        assert!(!trim_defaults(&params(&[("trimdefaults", "nonsense")])));
        assert!(!trim_defaults(&params(&[])));
    }

    #[test]
    fn trim_defaults_takes_first_value() {
        assert!(trim_defaults(&params(&[
            ("trimdefaults", "true"),
            ("trimdefaults", "false"),
        ])));
        assert!(trim_defaults(&params(&[
            ("other", "x"),
            ("trimdefaults", "true"),
            ("trimdefaults", "true"),
        ])));
    }

    #[test]
    fn decode_request_maps_bad_json_to_malformed() {
        assert!(matches!(
            decode_request(b"{\"dashboard\":"),
            Err(AppError::MalformedRequest(_))
        ));
        assert!(matches!(decode_request(b""), Err(AppError::MalformedRequest(_))));

        let req = decode_request(br#"{"dashboard":{"title":"x"}}"#).unwrap();
        assert_eq!(req.dashboard.unwrap()["title"], "x");
    }

    #[test]
    fn outcome_labels_follow_errors() {
        assert_eq!(
            outcome(&Err(AppError::Unauthenticated)),
            ImportOutcome::Unauthenticated
        );
        assert_eq!(
            outcome(&Err(AppError::QuotaExceeded)),
            ImportOutcome::QuotaExceeded
        );
        assert_eq!(
            outcome(&Ok(ImportDashboardResponse::default())),
            ImportOutcome::Imported
        );
    }
}

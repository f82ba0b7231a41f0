#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests drive the REAL kernel router and gatekeeper. Only the collaborators
//! behind the capability traits are replaced with recording fakes, so each
//! test can assert which collaborators ran, in what order, and with what.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use dashimport_kernel::AppState;
use dashimport_kernel::models::{ImportDashboardRequest, ImportDashboardResponse, SignedInUser};
use dashimport_kernel::routes;
use dashimport_kernel::services::{
    Authenticator, DashboardImporter, ImportError, QuotaChecker, SchemaNormalizer,
};

/// Header the fake authenticator reads the caller's user id from.
pub const TEST_USER_HEADER: &str = "x-test-user-id";

/// Org every fake caller belongs to.
pub const TEST_ORG_ID: i64 = 1;

/// Shared, ordered record of collaborator calls.
pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

// =============================================================================
// Fake collaborators
// =============================================================================

/// Resolves `x-test-user-id: <n>` to user `n` in [`TEST_ORG_ID`].
pub struct FakeAuthenticator;

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn resolve(&self, headers: &HeaderMap) -> Option<SignedInUser> {
        let user_id: i64 = headers.get(TEST_USER_HEADER)?.to_str().ok()?.parse().ok()?;
        Some(SignedInUser::new(user_id, TEST_ORG_ID, format!("user{user_id}")))
    }
}

/// What the fake quota checker answers.
#[derive(Debug, Clone, Copy)]
pub enum QuotaMode {
    NotReached,
    Reached,
    Fails,
}

pub struct FakeQuota {
    mode: QuotaMode,
    log: CallLog,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<(SignedInUser, String)>>,
}

#[async_trait]
impl QuotaChecker for FakeQuota {
    async fn reached(&self, user: &SignedInUser, target: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("quota");
        self.seen
            .lock()
            .unwrap()
            .push((user.clone(), target.to_string()));

        match self.mode {
            QuotaMode::NotReached => Ok(false),
            QuotaMode::Reached => Ok(true),
            QuotaMode::Fails => bail!("quota backend unavailable"),
        }
    }
}

/// Marks every document it normalizes with `"normalized": true`.
pub struct FakeNormalizer {
    enabled: bool,
    fails: bool,
    log: CallLog,
    pub calls: AtomicUsize,
}

impl SchemaNormalizer for FakeNormalizer {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn apply_defaults(&self, mut document: Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("normalizer");

        if self.fails {
            bail!("schema rejected dashboard");
        }
        if let Some(map) = document.as_object_mut() {
            map.insert("normalized".to_string(), Value::Bool(true));
        }
        Ok(document)
    }
}

pub struct FakeImporter {
    fails: bool,
    response: ImportDashboardResponse,
    log: CallLog,
    pub calls: AtomicUsize,
    pub received: Mutex<Vec<ImportDashboardRequest>>,
}

#[async_trait]
impl DashboardImporter for FakeImporter {
    async fn import_dashboard(
        &self,
        _user: &SignedInUser,
        req: ImportDashboardRequest,
    ) -> Result<ImportDashboardResponse, ImportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("importer");
        self.received.lock().unwrap().push(req);

        if self.fails {
            return Err(ImportError::MissingTitle);
        }
        Ok(self.response.clone())
    }
}

/// The response every successful fake import returns.
pub fn canned_response() -> ImportDashboardResponse {
    ImportDashboardResponse {
        uid: "canned-uid".to_string(),
        plugin_id: String::new(),
        title: "Canned".to_string(),
        imported: true,
        imported_uri: "db/canned".to_string(),
        imported_url: "/d/canned-uid/canned".to_string(),
        slug: "canned".to_string(),
        dashboard_id: 42,
        folder_uid: String::new(),
        path: String::new(),
        revision: 1,
        imported_revision: 1,
        removed: false,
    }
}

// =============================================================================
// Test application
// =============================================================================

/// Builder for a [`TestApp`] wired with fake collaborators.
pub struct TestAppBuilder {
    quota: QuotaMode,
    normalizer_enabled: bool,
    normalizer_fails: bool,
    importer_fails: bool,
}

impl TestAppBuilder {
    pub fn quota(mut self, mode: QuotaMode) -> Self {
        self.quota = mode;
        self
    }

    pub fn normalizer_enabled(mut self, enabled: bool) -> Self {
        self.normalizer_enabled = enabled;
        self
    }

    pub fn normalizer_fails(mut self) -> Self {
        self.normalizer_enabled = true;
        self.normalizer_fails = true;
        self
    }

    pub fn importer_fails(mut self) -> Self {
        self.importer_fails = true;
        self
    }

    pub fn build(self) -> TestApp {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));

        let quota = Arc::new(FakeQuota {
            mode: self.quota,
            log: log.clone(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });
        let normalizer = Arc::new(FakeNormalizer {
            enabled: self.normalizer_enabled,
            fails: self.normalizer_fails,
            log: log.clone(),
            calls: AtomicUsize::new(0),
        });
        let importer = Arc::new(FakeImporter {
            fails: self.importer_fails,
            response: canned_response(),
            log: log.clone(),
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        });

        let state = AppState::with_collaborators(
            Arc::new(FakeAuthenticator),
            quota.clone(),
            normalizer.clone(),
            importer.clone(),
        );

        TestApp {
            router: routes::app(state),
            quota,
            normalizer,
            importer,
            log,
        }
    }
}

/// Test application wrapper using the REAL kernel routes.
pub struct TestApp {
    router: Router,
    pub quota: Arc<FakeQuota>,
    pub normalizer: Arc<FakeNormalizer>,
    pub importer: Arc<FakeImporter>,
    pub log: CallLog,
}

impl TestApp {
    /// Quota not reached, normalizer disabled, importer succeeds.
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            quota: QuotaMode::NotReached,
            normalizer_enabled: false,
            normalizer_fails: false,
            importer_fails: false,
        }
    }

    /// Send a request to the test application.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request")
    }

    /// POST a JSON body to the import endpoint.
    ///
    /// `query` is appended verbatim (e.g. `"trimdefaults=true"`); `user` sets
    /// the signed-in user id, `None` sends the call anonymously.
    pub async fn import(&self, query: Option<&str>, body: &Value, user: Option<i64>) -> Response {
        self.import_raw(query, body.to_string(), user).await
    }

    /// POST a raw body to the import endpoint.
    pub async fn import_raw(&self, query: Option<&str>, body: String, user: Option<i64>) -> Response {
        let uri = match query {
            Some(q) => format!("/api/dashboards/import?{q}"),
            None => "/api/dashboards/import".to_string(),
        };

        let mut builder = Request::post(uri).header("content-type", "application/json");
        if let Some(id) = user {
            builder = builder.header(TEST_USER_HEADER, id.to_string());
        }

        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    pub fn quota_calls(&self) -> usize {
        self.quota.calls.load(Ordering::SeqCst)
    }

    pub fn normalizer_calls(&self) -> usize {
        self.normalizer.calls.load(Ordering::SeqCst)
    }

    pub fn importer_calls(&self) -> usize {
        self.importer.calls.load(Ordering::SeqCst)
    }

    /// Collaborator calls in the order they happened.
    pub fn call_order(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }
}

pub async fn response_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).into_owned()
}

pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}

//! Integration tests for the PASS client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pass-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_client` - Request shape, bearer handling, error classification
//! - `session_flow` - Session resolution, login, logout, navigation
//! - `pages` - Advisor, student and study plan controllers
//!
//! Every test runs against [`MockBackend`], an in-process `axum` server that
//! answers like the PASS backend for two fixed accounts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pass_client::{ApiClient, App, MemoryTokenStore, TokenStore};
use serde::Deserialize;
use serde_json::{Value, json};

pub const ADVISOR_EMAIL: &str = "advisor@example.edu";
pub const ADVISOR_PASSWORD: &str = "advisor-pass";
pub const ADVISOR_TOKEN: &str = "T1";

pub const STUDENT_EMAIL: &str = "student@example.edu";
pub const STUDENT_PASSWORD: &str = "student-pass";
pub const STUDENT_TOKEN: &str = "T2";

/// Student that has a detail record in the mock.
pub const KNOWN_STUDENT_ID: i64 = 2;
/// Exam that has a study plan in the mock.
pub const KNOWN_EXAM_ID: i64 = 1;

/// A request as seen by the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path below the `/api` prefix.
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    requests: Vec<RecordedRequest>,
    interventions: Vec<Value>,
    feedback: Vec<Value>,
    /// When set, `/me` answers with this status regardless of the token.
    me_status: Option<StatusCode>,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process PASS backend.
#[derive(Debug, Clone)]
pub struct MockBackend {
    base_url: String,
    state: Shared,
}

impl MockBackend {
    /// Start the mock on an ephemeral local port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn() -> Self {
        let state = Shared::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Failed to read local address");

        let router = Router::new().nest("/api", api_routes(state.clone()));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Base URL to hand to the client.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A client for this backend reading credentials from `store`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self, store: Arc<dyn TokenStore>) -> ApiClient {
        ApiClient::new(&self.base_url, store).expect("Failed to build API client")
    }

    /// An app for this backend with an in-memory store holding `token`.
    #[must_use]
    pub fn app(&self, token: Option<&str>) -> (App, Arc<MemoryTokenStore>) {
        let store = Arc::new(token.map_or_else(MemoryTokenStore::new, MemoryTokenStore::with_token));
        (App::new(self.client(store.clone())), store)
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Number of requests received for `method` and `path`.
    #[must_use]
    pub fn hits(&self, method: &str, path: &str) -> usize {
        lock(&self.state)
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Feedback bodies posted so far.
    #[must_use]
    pub fn feedback(&self) -> Vec<Value> {
        lock(&self.state).feedback.clone()
    }

    /// Make `/me` fail with `status` for every token.
    pub fn fail_identity(&self, status: u16) {
        lock(&self.state).me_status = StatusCode::from_u16(status).ok();
    }
}

fn api_routes(state: Shared) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/advisor/students", get(students))
        .route("/advisor/students/{id}", get(student_detail))
        .route("/advisor/students/{id}/interventions", post(add_intervention))
        .route("/advisor/predict-risk", post(predict_risk))
        .route("/student/progress", get(progress))
        .route("/student/study-plan", get(study_plan))
        .route("/student/study-plan/feedback", post(feedback))
        .route("/echo", get(echo).post(echo))
        .route("/broken", get(broken))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

// ============================================================================
// Request recording
// ============================================================================

async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let recorded = {
        let header_value = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_owned(),
            authorization: header_value(header::AUTHORIZATION),
            content_type: header_value(header::CONTENT_TYPE),
        }
    };
    lock(&state).requests.push(recorded);
    next.run(request).await
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Account {
    Advisor,
    Student,
}

impl Account {
    fn identity(self) -> Value {
        match self {
            Self::Advisor => json!({"id": 1, "name": "A", "role": "advisor"}),
            Self::Student => json!({
                "id": 2,
                "name": "Sam Student",
                "role": "student",
                "email": STUDENT_EMAIL,
            }),
        }
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<Account> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    match value.strip_prefix("Bearer ")? {
        ADVISOR_TOKEN => Some(Account::Advisor),
        STUDENT_TOKEN => Some(Account::Student),
        _ => None,
    }
}

fn require(headers: &HeaderMap, account: Account) -> Result<(), Response> {
    match bearer(headers) {
        Some(a) if a == account => Ok(()),
        Some(_) => Err(error(StatusCode::FORBIDDEN, "Forbidden")),
        None => Err(error(StatusCode::UNAUTHORIZED, "Missing or invalid token")),
    }
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    match (body.email.as_str(), body.password.as_str()) {
        (ADVISOR_EMAIL, ADVISOR_PASSWORD) => {
            Json(json!({"access_token": ADVISOR_TOKEN, "role": "advisor"})).into_response()
        }
        (STUDENT_EMAIL, STUDENT_PASSWORD) => {
            Json(json!({"access_token": STUDENT_TOKEN, "role": "student"})).into_response()
        }
        _ => error(StatusCode::UNAUTHORIZED, "bad credentials"),
    }
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let forced = lock(&state).me_status;
    if let Some(status) = forced {
        return error(status, "identity unavailable");
    }
    match bearer(&headers) {
        Some(account) => Json(account.identity()).into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Missing or invalid token"),
    }
}

// ============================================================================
// Advisor
// ============================================================================

async fn students(headers: HeaderMap) -> Response {
    if let Err(denied) = require(&headers, Account::Advisor) {
        return denied;
    }
    // Deliberately out of order; the client sorts.
    Json(json!({
        "students": [
            {"student_id": 2, "name": "Sam Student", "department": "Math",
             "risk_probability": 0.31, "risk_generated_at": "2024-03-01T10:00:00"},
            {"student_id": 3, "name": "Lee Unscored", "department": "History",
             "risk_probability": null, "risk_generated_at": null},
            {"student_id": 4, "name": "Kim Atrisk", "department": "Physics",
             "risk_probability": 0.88, "risk_generated_at": "2024-03-01T10:00:00"}
        ]
    }))
    .into_response()
}

async fn student_detail(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(denied) = require(&headers, Account::Advisor) {
        return denied;
    }
    if id != KNOWN_STUDENT_ID {
        return error(StatusCode::NOT_FOUND, "Student not found");
    }
    let mut interventions = lock(&state).interventions.clone();
    interventions.reverse();
    Json(json!({
        "student": {"student_id": id, "name": "Sam Student", "department": "Math", "cohort_year": 2023},
        "latest_risk": {
            "risk_probability": 0.31,
            "generated_at": "2024-03-01T10:00:00",
            "top_factors": [
                {"feature": "attendance_pct", "importance": 0.42},
                {"feature": "lms_logins_last_7d", "importance": 0.17}
            ]
        },
        "interventions": interventions,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct InterventionBody {
    note: String,
}

async fn add_intervention(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<InterventionBody>,
) -> Response {
    if let Err(denied) = require(&headers, Account::Advisor) {
        return denied;
    }
    if id != KNOWN_STUDENT_ID {
        return error(StatusCode::NOT_FOUND, "Student not found");
    }
    let mut guard = lock(&state);
    let created = json!({
        "id": guard.interventions.len() + 1,
        "note": body.note,
        "created_at": "2024-03-02T09:30:00",
    });
    guard.interventions.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn predict_risk(headers: HeaderMap) -> Response {
    if let Err(denied) = require(&headers, Account::Advisor) {
        return denied;
    }
    Json(json!({"ok": true, "generated": 3})).into_response()
}

// ============================================================================
// Student
// ============================================================================

async fn progress(headers: HeaderMap) -> Response {
    if let Err(denied) = require(&headers, Account::Student) {
        return denied;
    }
    Json(json!({
        "progress": {"assignments_completed_pct": 75.0, "attendance_pct": 90.5, "lms_logins_last_7d": 4}
    }))
    .into_response()
}

async fn study_plan(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if let Err(denied) = require(&headers, Account::Student) {
        return denied;
    }
    let exam_id = query.get("exam_id").and_then(|v| v.parse::<i64>().ok());
    if exam_id != Some(KNOWN_EXAM_ID) {
        return error(StatusCode::NOT_FOUND, "No attempt found for this exam");
    }
    let limits = json!({"topic": "Limits", "score_pct": 90.0, "correct": 9, "total": 10});
    let integrals = json!({"topic": "Integrals", "score_pct": 40.0, "correct": 2, "total": 5});
    Json(json!({
        "exam_id": KNOWN_EXAM_ID,
        "summary": {
            "strengths": [limits],
            "areas_for_focus": [{
                "topic": "Integrals", "score_pct": 40.0, "correct": 2, "total": 5,
                "resources": [{"title": "Integration basics", "url": "https://example.org/int", "type": "video"}]
            }]
        },
        "all_topics": [limits, integrals],
    }))
    .into_response()
}

async fn feedback(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(denied) = require(&headers, Account::Student) {
        return denied;
    }
    lock(&state).feedback.push(body);
    Json(json!({"ok": true})).into_response()
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Reflects the method, credential and body back to the caller.
async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Value> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    Json(json!({
        "method": method.as_str(),
        "authorization": authorization,
        "body": body,
    }))
}

async fn broken() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/html")],
        "<html>oops</html>",
    )
        .into_response()
}

//! Axum route handlers for the diagnostic HTTP server.
//!
//! # Routes
//!
//! - `GET  /health`            — Returns `{"status": "ok", "version": ..., "service": ...}`
//! - `GET  /api/statements`    — Statement catalog for the questionnaire UI
//! - `POST /api/scores`        — Per-dimension averages for a list of answers
//! - `POST /api/feedback`      — Feedback for a finished questionnaire (always 200)
//! - `POST /api/submissions`   — Persist a submission record
//! - `GET  /api/submissions`   — List every stored submission
//! - `GET  /api/admin/stats`   — Submission count and fleet-wide averages
//! - `POST /api/diagnostic`    — Score, generate feedback and persist in one call

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::StatementCatalog;
use crate::config::AppConfig;
use crate::feedback::FeedbackGenerator;
use crate::llms::providers::anthropic::AnthropicCompletion;
use crate::llms::CompletionClient;
use crate::scoring::{calculate_dimension_scores, AdminStats, DimensionScores};
use crate::store::{JsonFileStore, SubmissionStore};
use crate::types::{Answer, Feedback, Submission, UserInfo};
use crate::utilities::errors::CatalogError;

type ApiError = (StatusCode, Json<Value>);

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Statement catalog, read-only after startup.
    pub catalog: Arc<StatementCatalog>,
    /// Durable submission list.
    pub store: Arc<dyn SubmissionStore>,
    /// Best-effort feedback generation.
    pub generator: Arc<FeedbackGenerator>,
}

impl AppState {
    pub fn new(
        catalog: StatementCatalog,
        store: Arc<dyn SubmissionStore>,
        generator: FeedbackGenerator,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            store,
            generator: Arc::new(generator),
        }
    }

    /// Wire catalog, file store and Anthropic client from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let catalog = StatementCatalog::load(config.catalog_path.as_deref())?;
        let store: Arc<dyn SubmissionStore> = Arc::new(JsonFileStore::new(&config.data_file));

        let client: Arc<dyn CompletionClient> = Arc::new(
            AnthropicCompletion::new(
                config.model.clone(),
                config.api_key.clone(),
                config.api_base_url.clone(),
            )
            .with_timeout(config.llm_timeout),
        );
        if !client.has_credentials() {
            tracing::warn!("ANTHROPIC_API_KEY not set, feedback will use placeholder text");
        }
        let generator = FeedbackGenerator::new(Some(client))
            .with_max_tokens(config.max_tokens)
            .with_call_timeout(config.llm_timeout);

        Ok(Self::new(catalog, store, generator))
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/statements", get(statements_handler))
        .route("/api/scores", post(scores_handler))
        .route("/api/feedback", post(feedback_handler))
        .route(
            "/api/submissions",
            get(list_submissions_handler).post(save_submission_handler),
        )
        .route("/api/admin/stats", get(admin_stats_handler))
        .route("/api/diagnostic", post(diagnostic_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

fn bad_request(message: String) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, message)
}

/// Reject answers the catalog cannot score as given.
///
/// Values must sit on the 1..=5 scale and be legal for the statement's answer
/// kind, and a statement may be answered once. Unknown statement ids pass
/// through; scoring skips them.
fn validate_answers(answers: &[Answer], catalog: &StatementCatalog) -> Result<(), String> {
    let mut seen = HashSet::new();
    for answer in answers {
        if !answer.in_range() {
            return Err(format!(
                "Answer for statement {} has value {}, expected {}-{}",
                answer.statement_id,
                answer.value,
                Answer::MIN_VALUE,
                Answer::MAX_VALUE
            ));
        }
        if !seen.insert(answer.statement_id) {
            return Err(format!(
                "Statement {} is answered more than once",
                answer.statement_id
            ));
        }
        if let Some(statement) = catalog.get(answer.statement_id) {
            if !statement.accepts(answer.value) {
                return Err(format!(
                    "Value {} is not a valid {:?} answer for statement {}",
                    answer.value, statement.answer_kind, answer.statement_id
                ));
            }
        }
    }
    Ok(())
}

fn validate_user_info(user_info: &UserInfo) -> Result<(), String> {
    if user_info.is_complete() {
        Ok(())
    } else {
        Err("userInfo.email is required".to_string())
    }
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "supply-diagnostic",
    }))
}

/// GET /api/statements — the catalog in questionnaire order.
async fn statements_handler(State(state): State<AppState>) -> Json<StatementCatalog> {
    Json(state.catalog.as_ref().clone())
}

#[derive(Debug, Deserialize)]
struct ScoresRequest {
    #[serde(default)]
    answers: Vec<Answer>,
}

/// POST /api/scores — per-dimension averages.
///
/// Request: `{ "answers": [{ "statementId": 1, "value": 4 }, ...] }`
async fn scores_handler(
    State(state): State<AppState>,
    Json(request): Json<ScoresRequest>,
) -> Result<Json<DimensionScores>, ApiError> {
    validate_answers(&request.answers, &state.catalog).map_err(bad_request)?;
    Ok(Json(calculate_dimension_scores(&request.answers, &state.catalog)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedbackRequest {
    #[serde(default)]
    user_info: UserInfo,
    #[serde(default)]
    answers: Vec<Answer>,
    #[serde(default)]
    category_scores: Option<DimensionScores>,
}

/// POST /api/feedback — feedback for a finished questionnaire.
///
/// Always answers 200. An unreadable body gets placeholder feedback, the
/// same as a failed model call.
async fn feedback_handler(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Json<Feedback> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable feedback request, using placeholder");
            let anonymous = UserInfo {
                name: "User".to_string(),
                ..Default::default()
            };
            return Json(Feedback::placeholder(&anonymous));
        }
    };

    let scores = request
        .category_scores
        .unwrap_or_else(|| calculate_dimension_scores(&request.answers, &state.catalog));

    let outcome = state
        .generator
        .generate(&request.user_info, &request.answers, &scores, &state.catalog)
        .await;
    Json(outcome.feedback)
}

fn save_failure(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(serde_json::json!({
            "success": false,
            "error": message.into(),
        })),
    )
}

/// POST /api/submissions — persist a submission.
///
/// Response: `{ "success": true, "id": "..." }`. Every failure answers with
/// `{ "success": false, "error": ... }`: 400 for an unreadable or invalid
/// record, 500 with `"Failed to save submission"` when storage fails.
async fn save_submission_handler(
    State(state): State<AppState>,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let submission = match payload {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Unreadable submission");
            return Err(save_failure(
                StatusCode::BAD_REQUEST,
                "Failed to save submission",
            ));
        }
    };

    validate_user_info(&submission.user_info)
        .and_then(|()| validate_answers(&submission.answers, &state.catalog))
        .map_err(|message| save_failure(StatusCode::BAD_REQUEST, message))?;

    let submission = submission.with_defaults();
    match state.store.append(&submission).await {
        Ok(()) => {
            tracing::info!(id = %submission.id, "Saved submission");
            Ok(Json(serde_json::json!({
                "success": true,
                "id": submission.id,
            })))
        }
        Err(e) => {
            tracing::error!(error = %e, "Error saving submission");
            Err(save_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save submission",
            ))
        }
    }
}

/// Read every submission; a read failure counts as an empty store.
async fn load_submissions(store: &dyn SubmissionStore) -> Vec<Submission> {
    store.list_all().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Error reading submissions");
        Vec::new()
    })
}

/// GET /api/submissions — every stored submission.
async fn list_submissions_handler(State(state): State<AppState>) -> Json<Value> {
    let submissions = load_submissions(state.store.as_ref()).await;
    Json(serde_json::json!({ "submissions": submissions }))
}

/// GET /api/admin/stats — submission count and fleet-wide averages.
async fn admin_stats_handler(State(state): State<AppState>) -> Json<AdminStats> {
    let submissions = load_submissions(state.store.as_ref()).await;
    Json(AdminStats::from_submissions(&submissions))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticRequest {
    user_info: UserInfo,
    #[serde(default)]
    answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticResponse {
    id: String,
    category_scores: DimensionScores,
    feedback: Feedback,
    saved: bool,
}

/// POST /api/diagnostic — the whole completion flow in one request.
///
/// Scores the answers, generates feedback and persists the submission. A
/// storage failure is reported through `saved: false`; the user still gets
/// their results.
async fn diagnostic_handler(
    State(state): State<AppState>,
    Json(request): Json<DiagnosticRequest>,
) -> Result<Json<DiagnosticResponse>, ApiError> {
    validate_user_info(&request.user_info).map_err(bad_request)?;
    validate_answers(&request.answers, &state.catalog).map_err(bad_request)?;

    let scores = calculate_dimension_scores(&request.answers, &state.catalog);
    let outcome = state
        .generator
        .generate(&request.user_info, &request.answers, &scores, &state.catalog)
        .await;

    let submission = Submission::new(request.user_info, request.answers, scores);
    let saved = match state.store.append(&submission).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(id = %submission.id, error = %e, "Error saving submission");
            false
        }
    };

    Ok(Json(DiagnosticResponse {
        id: submission.id,
        category_scores: submission.category_scores,
        feedback: outcome.feedback,
        saved,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        state_with_catalog(dir, StatementCatalog::load_default().unwrap())
    }

    fn state_with_catalog(dir: &tempfile::TempDir, catalog: StatementCatalog) -> AppState {
        let store = Arc::new(JsonFileStore::new(dir.path().join("submissions.json")));
        AppState::new(catalog, store, FeedbackGenerator::disabled())
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json");
        let request = match body {
            Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn user_json() -> Value {
        serde_json::json!({
            "name": "Ada",
            "role": "COO",
            "company": "Acme",
            "email": "ada@acme.io"
        })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let (status, json) = send(app_router(test_state(&dir)), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "supply-diagnostic");
    }

    #[tokio::test]
    async fn test_statements_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let (status, json) = send(app_router(test_state(&dir)), "GET", "/api/statements", None).await;
        assert_eq!(status, StatusCode::OK);
        let statements = json["statements"].as_array().unwrap();
        assert_eq!(statements.len(), 15);
        assert_eq!(statements[0]["id"], 1);
        assert!(statements[0]["answerKind"].is_string());
    }

    #[tokio::test]
    async fn test_scores_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({
            "answers": [{"statementId": 1, "value": 4}, {"statementId": 2, "value": 2}]
        });
        let (status, json) = send(app_router(test_state(&dir)), "POST", "/api/scores", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["Visibility"]["score"], 3.0);
        assert_eq!(json["Visibility"]["count"], 2);
    }

    #[tokio::test]
    async fn test_scores_rejects_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({"answers": [{"statementId": 1, "value": 9}]});
        let (status, json) = send(app_router(test_state(&dir)), "POST", "/api/scores", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("statement 1"));
    }

    #[tokio::test]
    async fn test_feedback_without_credential_is_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({
            "userInfo": user_json(),
            "answers": [{"statementId": 1, "value": 4}]
        });
        let (status, json) = send(app_router(test_state(&dir)), "POST", "/api/feedback", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["keyObservation"].as_str().unwrap().contains("Ada"));
        assert!(json["firstThingToChange"].is_string());
        assert!(json["watchOuts"].is_string());
    }

    #[tokio::test]
    async fn test_feedback_with_unreadable_body_still_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_router(test_state(&dir));
        let request = Request::builder()
            .method("POST")
            .uri("/api/feedback")
            .header("Content-Type", "application/json")
            .body(Body::from("{oops"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["keyObservation"].as_str().unwrap().contains("User"));
    }

    #[tokio::test]
    async fn test_save_then_list_submissions() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let body = serde_json::json!({
            "id": "sub-1",
            "userInfo": user_json(),
            "answers": [{"statementId": 1, "value": 4}],
            "categoryScores": {"Visibility": {"score": 4.0, "count": 1}},
            "timestamp": "2024-05-01T10:00:00.000Z"
        });
        let (status, json) = send(app_router(state.clone()), "POST", "/api/submissions", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["id"], "sub-1");

        let (status, json) = send(app_router(state), "GET", "/api/submissions", None).await;
        assert_eq!(status, StatusCode::OK);
        let subs = json["submissions"].as_array().unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0]["id"], "sub-1");
        assert_eq!(subs[0]["userInfo"]["company"], "Acme");
    }

    #[tokio::test]
    async fn test_save_assigns_missing_id() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({"userInfo": user_json(), "answers": []});
        let (status, json) = send(app_router(test_state(&dir)), "POST", "/api/submissions", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!json["id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_requires_email() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({"userInfo": {"name": "Ada"}, "answers": []});
        let (status, _) = send(app_router(test_state(&dir)), "POST", "/api/submissions", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_malformed_body_is_json_failure() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_router(test_state(&dir));
        let request = Request::builder()
            .method("POST")
            .uri("/api/submissions")
            .header("Content-Type", "application/json")
            .body(Body::from("{\"userInfo\": 42"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to save submission");
        assert!(!dir.path().join("submissions.json").exists());
    }

    #[tokio::test]
    async fn test_save_invalid_record_keeps_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({
            "userInfo": user_json(),
            "answers": [{"statementId": 1, "value": 0}]
        });
        let (status, json) = send(app_router(test_state(&dir)), "POST", "/api/submissions", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("statement 1"));
    }

    #[tokio::test]
    async fn test_yes_no_answer_must_be_one_or_five() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        assert_eq!(
            state.catalog.get(5).unwrap().answer_kind,
            crate::catalog::AnswerKind::YesNo
        );

        let body = serde_json::json!({"answers": [{"statementId": 5, "value": 3}]});
        let (status, json) = send(app_router(state.clone()), "POST", "/api/scores", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("statement 5"));

        let body = serde_json::json!({"answers": [{"statementId": 5, "value": 5}]});
        let (status, _) = send(app_router(state), "POST", "/api/scores", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dropdown_answer_must_match_a_choice() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = StatementCatalog::from_yaml(
            r#"
statements:
  - id: 1
    dimension: Visibility
    question: "How do you hear about delays?"
    answerKind: dropdown
    dropdownChoices:
      - { label: "A customer complains", value: 1 }
      - { label: "A weekly report", value: 3 }
      - { label: "An automated alert", value: 5 }
    interpretation: "Reactive vs proactive."
"#,
        )
        .unwrap();
        let state = state_with_catalog(&dir, catalog);

        let body = serde_json::json!({
            "userInfo": user_json(),
            "answers": [{"statementId": 1, "value": 2}]
        });
        let (status, json) = send(app_router(state.clone()), "POST", "/api/diagnostic", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Dropdown"));

        let body = serde_json::json!({
            "userInfo": user_json(),
            "answers": [{"statementId": 1, "value": 3}]
        });
        let (status, json) = send(app_router(state), "POST", "/api/diagnostic", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["categoryScores"]["Visibility"]["score"], 3.0);
    }

    #[tokio::test]
    async fn test_duplicate_statement_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = serde_json::json!({
            "answers": [{"statementId": 1, "value": 2}, {"statementId": 1, "value": 4}]
        });
        let (status, json) = send(app_router(test_state(&dir)), "POST", "/api/scores", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("more than once"));
    }

    #[tokio::test]
    async fn test_save_failure_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        std::fs::create_dir_all(dir.path().join("submissions.json.tmp")).unwrap();

        let body = serde_json::json!({"userInfo": user_json(), "answers": []});
        let (status, json) = send(app_router(state), "POST", "/api/submissions", Some(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to save submission");
    }

    #[tokio::test]
    async fn test_list_unreadable_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("submissions.json"), "garbage").unwrap();
        let (status, json) = send(app_router(test_state(&dir)), "GET", "/api/submissions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["submissions"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_admin_stats() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        for score in [2.0, 4.0] {
            let body = serde_json::json!({
                "userInfo": user_json(),
                "answers": [],
                "categoryScores": {"Visibility": {"score": score, "count": 1}}
            });
            let (status, _) = send(app_router(state.clone()), "POST", "/api/submissions", Some(body)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, json) = send(app_router(state), "GET", "/api/admin/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalSubmissions"], 2);
        assert_eq!(json["averageCategoryScores"]["Visibility"]["score"], 3.0);
        assert_eq!(json["averageCategoryScores"]["Visibility"]["count"], 2);
    }

    #[tokio::test]
    async fn test_admin_stats_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let (status, json) = send(app_router(test_state(&dir)), "GET", "/api/admin/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["totalSubmissions"], 0);
        assert!(json["averageCategoryScores"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_diagnostic_flow_persists() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let body = serde_json::json!({
            "userInfo": user_json(),
            "answers": [{"statementId": 1, "value": 4}, {"statementId": 2, "value": 2}]
        });
        let (status, json) = send(app_router(state.clone()), "POST", "/api/diagnostic", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["saved"], true);
        assert_eq!(json["categoryScores"]["Visibility"]["score"], 3.0);
        assert!(json["feedback"]["keyObservation"].as_str().unwrap().contains("Ada"));

        let stored = state.store.list_all().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(json["id"], stored[0].id.as_str());
    }

    #[tokio::test]
    async fn test_diagnostic_reports_save_failure() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        std::fs::create_dir_all(dir.path().join("submissions.json.tmp")).unwrap();
        let body = serde_json::json!({
            "userInfo": user_json(),
            "answers": [{"statementId": 1, "value": 4}]
        });
        let (status, json) = send(app_router(state), "POST", "/api/diagnostic", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["saved"], false);
        assert!(json["feedback"]["watchOuts"].is_string());
    }
}

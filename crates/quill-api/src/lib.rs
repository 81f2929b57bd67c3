//! quill-api - HTTP API server for quill
//!
//! Thin axum surface over the session engine: note saves, AI completions,
//! and notebook creation. Handlers validate at the boundary and delegate;
//! [`ApiError`] owns the error-to-status mapping.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use quill_core::{CompletionBackend, CreateNoteRequest, NoteStore};
use quill_inference::images::{cover_image_url, image_keyword};
use quill_session::{AutosaveClient, SaveOutcome};

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Bearer-token gate for the notebook-creation endpoint.
///
/// With no token configured every caller is accepted and identified as
/// `"local"`; with a token configured the `Authorization` header must carry
/// it and the caller id comes from `X-User-Id`.
#[derive(Clone, Default)]
pub struct AuthConfig {
    token: Option<String>,
}

impl AuthConfig {
    /// No authentication; callers are identified as `"local"`.
    pub fn disabled() -> Self {
        Self { token: None }
    }

    /// Require `Authorization: Bearer <token>` on guarded endpoints.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Read `AUTH_TOKEN` from the environment; empty or unset disables auth.
    pub fn from_env() -> Self {
        let token = std::env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty());
        Self { token }
    }

    /// Resolve the caller identity, or reject the request.
    fn authenticate(&self, headers: &HeaderMap) -> Result<String, ApiError> {
        if let Some(expected) = &self.token {
            let presented = headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));
            if presented != Some(expected.as_str()) {
                return Err(ApiError::Unauthorized(
                    "Missing or invalid authorization token".to_string(),
                ));
            }
            let user = headers
                .get("x-user-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("local");
            return Ok(user.to_string());
        }
        Ok("local".to_string())
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn NoteStore>,
    pub completion: Arc<dyn CompletionBackend>,
    pub autosave: Arc<AutosaveClient>,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn NoteStore>,
        completion: Arc<dyn CompletionBackend>,
        auth: AuthConfig,
    ) -> Self {
        let autosave = Arc::new(AutosaveClient::new(Arc::clone(&store)));
        Self {
            store,
            completion,
            autosave,
            auth,
        }
    }
}

/// Build the application router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/saveNote", post(save_note))
        .route("/completion", post(completion))
        .route("/createNoteBook", post(create_notebook))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Request body for saving note content.
///
/// Fields are optional so that a missing field is reported as a 400 from our
/// validation rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
struct SaveNoteRequest {
    #[serde(rename = "noteId")]
    note_id: Option<i64>,
    #[serde(rename = "editorState")]
    editor_state: Option<String>,
}

async fn save_note(
    State(state): State<AppState>,
    Json(req): Json<SaveNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (note_id, editor_state) = match (req.note_id, req.editor_state) {
        (Some(id), Some(content)) => (id, content),
        _ => {
            return Err(ApiError::BadRequest(
                "noteId and editorState are required".to_string(),
            ))
        }
    };

    let outcome = state.autosave.save(note_id, &editor_state).await?;
    let message = match outcome {
        SaveOutcome::Written => "Note saved",
        SaveOutcome::Unchanged => "Note already up to date",
        SaveOutcome::Stale => "Save superseded by newer content",
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "message": message,
    })))
}

#[derive(Debug, Deserialize)]
struct CompletionRequest {
    prompt: Option<String>,
}

async fn completion(
    State(state): State<AppState>,
    Json(req): Json<CompletionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let prompt = req.prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt must not be empty".to_string()));
    }

    let text = state.completion.complete(&prompt).await.map_err(|e| {
        warn!(error = %e, "Completion request failed");
        ApiError::from(e)
    })?;

    Ok(Json(serde_json::json!({
        "completion": text,
        "text": text,
        "success": true,
    })))
}

#[derive(Debug, Deserialize)]
struct CreateNotebookRequest {
    name: Option<String>,
}

async fn create_notebook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateNotebookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = state.auth.authenticate(&headers)?;

    let name = req.name.unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let keyword = image_keyword(name);
    let image_url = cover_image_url(&keyword);

    let note_id = state
        .store
        .create(CreateNoteRequest {
            owner_id: owner_id.clone(),
            name: name.to_string(),
            image_url,
        })
        .await?;

    info!(note_id, owner_id = %owner_id, "Notebook created");

    Ok(Json(serde_json::json!({
        "note_id": note_id,
        "message": "Notebook created",
    })))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    QuotaExceeded(String),
    /// Unknown upstream failure; the provider's message rides along as
    /// `details` in the response body.
    Upstream {
        message: String,
        details: String,
    },
    Internal(String),
}

impl From<quill_core::Error> for ApiError {
    fn from(err: quill_core::Error) -> Self {
        match err {
            quill_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            quill_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            quill_core::Error::Forbidden(msg) => ApiError::Forbidden(msg),
            quill_core::Error::QuotaExceeded(msg) => ApiError::QuotaExceeded(msg),
            quill_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            quill_core::Error::NoteNotFound(id) => {
                ApiError::NotFound(format!("Note {} not found", id))
            }
            quill_core::Error::Inference(details) => ApiError::Upstream {
                message: "AI completion failed".to_string(),
                details,
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, error_body(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, error_body(msg)),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, error_body(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, error_body(msg)),
            ApiError::QuotaExceeded(msg) => (StatusCode::TOO_MANY_REQUESTS, error_body(msg)),
            ApiError::Upstream { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": message,
                    "details": details,
                    "success": false,
                }),
            ),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, error_body(msg)),
        };

        (status, Json(body)).into_response()
    }
}

fn error_body(message: String) -> serde_json::Value {
    serde_json::json!({
        "error": message,
        "success": false,
    })
}

//! HTTP handlers for the Elevora server.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, get, post, web};
use chrono::Utc;
use elevora_core::{
    AuditDocument, AuditError, AuditRequest, AuditView, ElementIssues, TrendBaseline,
    derive_view_with,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::loader::AuditLoader;
use crate::openapi::ApiDoc;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Audit document loader.
    pub loader: AuditLoader,
    /// Dashboard presentation settings.
    pub dashboard: DashboardConfig,
    /// The most recently loaded view, if any.
    pub current: Arc<RwLock<Option<ViewResponse>>>,
}

impl AppState {
    /// Build state with no document loaded.
    pub fn new(loader: AuditLoader, dashboard: DashboardConfig) -> Self {
        Self {
            loader,
            dashboard,
            current: Arc::new(RwLock::new(None)),
        }
    }
}

/// Dashboard configuration loaded from the environment.
#[derive(Clone, Debug, Default)]
pub struct DashboardConfig {
    /// Historical points shown ahead of a single real sample.
    pub baseline: TrendBaseline,
}

impl DashboardConfig {
    /// Build dashboard config from environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Self {
        let baseline = match std::env::var("ELEVORA_TREND_BASELINE") {
            Ok(raw) => TrendBaseline::parse(&raw).unwrap_or_else(|err| {
                log::warn!("ignoring ELEVORA_TREND_BASELINE: {err}");
                TrendBaseline::default()
            }),
            Err(_) => TrendBaseline::default(),
        };
        Self { baseline }
    }
}

/// A derived view together with the identity of its document.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    /// Identifier assigned when the document was loaded.
    pub document_id: String,
    /// ISO-8601 load timestamp.
    pub loaded_at: String,
    /// Derived dashboard view.
    pub view: AuditView,
}

/// Request payload for selecting an issue category.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectCategoryRequest {
    /// Issue category key.
    pub category: String,
    /// Document the selection was made against.
    pub document_id: Option<String>,
}

/// Response payload for a category selection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    /// Whether the active category changed to the requested key.
    pub applied: bool,
    /// Current view after the selection.
    pub view: ViewResponse,
}

/// Explained issues of the active category.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuesResponse {
    /// Document the issues belong to.
    pub document_id: String,
    /// Active category key.
    pub category: Option<String>,
    /// Elements of the active category in document order.
    pub elements: Vec<ElementIssues>,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error kind.
    pub kind: String,
    /// Error message.
    pub message: String,
}

fn error_response(status: StatusCode, kind: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        kind: kind.to_string(),
        message: message.into(),
    })
}

fn store_unavailable() -> HttpResponse {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "view store unavailable",
    )
}

fn not_loaded() -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        "not_loaded",
        "no audit document has been loaded",
    )
}

/// Derive a view for a new document and make it current.
///
/// A document without category scores clears the current view so a stale
/// summary is never served in its place.
fn install_document(state: &AppState, doc: &AuditDocument) -> Result<ViewResponse, HttpResponse> {
    let derived = derive_view_with(doc, &state.dashboard.baseline);
    let mut current = state.current.write().map_err(|_| store_unavailable())?;
    match derived {
        Ok(view) => {
            let response = ViewResponse {
                document_id: Uuid::new_v4().to_string(),
                loaded_at: Utc::now().to_rfc3339(),
                view,
            };
            log::info!(
                "loaded document {} (score {}, {} issues)",
                response.document_id,
                response.view.overall_score,
                response.view.total_issues
            );
            *current = Some(response.clone());
            Ok(response)
        }
        Err(err @ AuditError::EmptyInput) => {
            *current = None;
            Err(error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_data",
                err.to_string(),
            ))
        }
        Err(err) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            err.to_string(),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/audit/run",
    request_body = AuditRequest,
    responses(
        (status = 200, description = "Audit loaded", body = ViewResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 422, description = "Audit has no category scores", body = ErrorResponse),
        (status = 502, description = "Audit producer failed", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[post("/api/audit/run")]
/// Run an audit through the producer and load the result.
pub async fn run_audit(
    state: web::Data<AppState>,
    payload: web::Json<AuditRequest>,
) -> impl Responder {
    let request = payload.into_inner();
    if request.url.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_request", "url is required");
    }
    let loader = state.loader.clone();
    let result = web::block(move || loader.load(&request)).await;

    let doc = match result {
        Ok(Ok(doc)) => doc,
        Ok(Err(err)) => {
            log::warn!("audit fetch failed: {err}");
            return error_response(StatusCode::BAD_GATEWAY, "fetch_failed", err.to_string());
        }
        Err(err) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                format!("audit task failed: {err}"),
            );
        }
    };
    match install_document(&state, &doc) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/audit/view",
    request_body = AuditDocument,
    responses(
        (status = 200, description = "Document loaded", body = ViewResponse),
        (status = 422, description = "Document has no category scores", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[post("/api/audit/view")]
/// Load an audit document supplied by the caller.
pub async fn load_view(
    state: web::Data<AppState>,
    payload: web::Json<AuditDocument>,
) -> impl Responder {
    match install_document(&state, &payload) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/audit/view",
    responses(
        (status = 200, description = "Current view", body = ViewResponse),
        (status = 404, description = "Nothing loaded", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[get("/api/audit/view")]
/// Fetch the current view.
pub async fn current_view(state: web::Data<AppState>) -> impl Responder {
    let current = match state.current.read() {
        Ok(current) => current,
        Err(_) => return store_unavailable(),
    };
    match current.as_ref() {
        Some(response) => HttpResponse::Ok().json(response),
        None => not_loaded(),
    }
}

#[utoipa::path(
    post,
    path = "/audit/category",
    request_body = SelectCategoryRequest,
    responses(
        (status = 200, description = "Selection processed", body = SelectionResponse),
        (status = 404, description = "Nothing loaded", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[post("/api/audit/category")]
/// Select the active issue category.
pub async fn select_category(
    state: web::Data<AppState>,
    payload: web::Json<SelectCategoryRequest>,
) -> impl Responder {
    let mut current = match state.current.write() {
        Ok(current) => current,
        Err(_) => return store_unavailable(),
    };
    let Some(response) = current.as_mut() else {
        return not_loaded();
    };
    let stale = payload
        .document_id
        .as_deref()
        .is_some_and(|id| id != response.document_id);
    let applied = if stale {
        log::info!(
            "ignoring selection of `{}` made against a replaced document",
            payload.category
        );
        false
    } else {
        response.view.select_category(&payload.category)
    };
    HttpResponse::Ok().json(SelectionResponse {
        applied,
        view: response.clone(),
    })
}

#[utoipa::path(
    get,
    path = "/audit/issues",
    responses(
        (status = 200, description = "Issues of the active category", body = IssuesResponse),
        (status = 404, description = "Nothing loaded", body = ErrorResponse)
    ),
    tag = "audit"
)]
#[get("/api/audit/issues")]
/// Fetch explained issues for the active category.
pub async fn active_issues(state: web::Data<AppState>) -> impl Responder {
    let current = match state.current.read() {
        Ok(current) => current,
        Err(_) => return store_unavailable(),
    };
    let Some(response) = current.as_ref() else {
        return not_loaded();
    };
    HttpResponse::Ok().json(IssuesResponse {
        document_id: response.document_id.clone(),
        category: response.view.active_category().map(str::to_string),
        elements: response.view.active_issues().unwrap_or_default(),
    })
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

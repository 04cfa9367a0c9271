use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
};
use research_flow::{BatchKind, FinalReview, FlowError, SessionSnapshot};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    clients::build_services,
    config::ServiceConfig,
    models::{
        AddedResponse, BatchStartedResponse, ClaimRequest, DoisRequest, KeywordsRequest,
        LocalDocumentRequest, ReviewResponse, StageRequest, StageStep, TopicRequest,
    },
    state::AppState,
};

type ApiResult<T> = Result<Json<T>, ApiError>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn flow_error(err: FlowError) -> ApiError {
    let status = match &err {
        e if e.is_precondition() => StatusCode::BAD_REQUEST,
        FlowError::SessionBusy(_) => StatusCode::CONFLICT,
        FlowError::SessionNotFound(_) | FlowError::PaperNotFound(_) | FlowError::ClaimNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        FlowError::ServiceFailed { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    (status, Json(json!({ "error": err.to_string() })))
}

pub fn create_app(config: &ServiceConfig) -> anyhow::Result<Router> {
    let services = build_services(config)?;
    Ok(build_router(AppState::new(services, config.flow_config())))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/sessions", post(create_session))
        .route("/sessions/{session_id}", get(get_session).delete(delete_session))
        .route("/sessions/{session_id}/topic", put(set_topic))
        .route("/sessions/{session_id}/keywords", put(set_keywords))
        .route("/sessions/{session_id}/stage", post(change_stage))
        .route("/sessions/{session_id}/papers/dois", post(add_dois))
        .route("/sessions/{session_id}/papers/local", post(add_local_document))
        .route("/sessions/{session_id}/claims", post(add_claim))
        .route("/sessions/{session_id}/batches/{kind}", post(start_batch))
        .route("/sessions/{session_id}/review", get(get_review))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Literature Curation Service",
        "version": "0.1.0",
        "description": "Staged PubMed literature curation with AI-assisted claim verification",
        "endpoints": {
            "POST /sessions": "Start a new curation session",
            "GET /sessions/{id}": "Latest session snapshot, readable while a batch runs",
            "PUT /sessions/{id}/topic": "Set the research topic",
            "PUT /sessions/{id}/keywords": "Set comma-separated keywords",
            "POST /sessions/{id}/stage": "Jump to a stage or step next/back",
            "POST /sessions/{id}/papers/dois": "Add papers by DOI, one per line",
            "POST /sessions/{id}/papers/local": "Add a PDF already on disk",
            "POST /sessions/{id}/claims": "Add a claim to verify",
            "POST /sessions/{id}/batches/{kind}": "Run keywords | search | download | process | verify",
            "GET /sessions/{id}/review": "Verified claims with supporting papers",
            "DELETE /sessions/{id}": "Discard a session",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionSnapshot>) {
    let handle = state.create_session();
    (StatusCode::CREATED, Json(handle.snapshot()))
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionSnapshot> {
    let handle = state.session(session_id).map_err(flow_error)?;
    Ok(Json(handle.snapshot()))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.remove_session(session_id).map_err(flow_error)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_topic(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TopicRequest>,
) -> ApiResult<SessionSnapshot> {
    let handle = state.session(session_id).map_err(flow_error)?;
    let mut session = handle.claim().map_err(flow_error)?;
    session.set_topic(request.topic);
    Ok(Json(session.snapshot()))
}

async fn set_keywords(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<KeywordsRequest>,
) -> ApiResult<SessionSnapshot> {
    let handle = state.session(session_id).map_err(flow_error)?;
    let mut session = handle.claim().map_err(flow_error)?;
    session.set_keywords(request.keywords);
    Ok(Json(session.snapshot()))
}

async fn change_stage(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<StageRequest>,
) -> ApiResult<SessionSnapshot> {
    let handle = state.session(session_id).map_err(flow_error)?;
    let mut session = handle.claim().map_err(flow_error)?;

    let stage = match (request.stage, request.step) {
        (Some(stage), None) => session.go_to(stage),
        (None, Some(StageStep::Next)) => session.advance(),
        (None, Some(StageStep::Back)) => session.back(),
        _ => return Err(bad_request_error("Give exactly one of `stage` or `step`")),
    };
    info!(session_id = %session_id, stage = %stage, "Stage changed");

    Ok(Json(session.snapshot()))
}

async fn add_dois(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<DoisRequest>,
) -> ApiResult<AddedResponse> {
    let handle = state.session(session_id).map_err(flow_error)?;
    let mut session = handle.claim().map_err(flow_error)?;
    let added = session.add_dois(&request.dois).map_err(flow_error)?;
    Ok(Json(AddedResponse { session_id, added }))
}

async fn add_local_document(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<LocalDocumentRequest>,
) -> ApiResult<AddedResponse> {
    if request.path.trim().is_empty() {
        return Err(bad_request_error("PDF path is required"));
    }
    let handle = state.session(session_id).map_err(flow_error)?;
    let mut session = handle.claim().map_err(flow_error)?;
    let id = session.add_local_document(std::path::Path::new(request.path.trim()));
    Ok(Json(AddedResponse {
        session_id,
        added: vec![id],
    }))
}

async fn add_claim(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<ClaimRequest>,
) -> ApiResult<AddedResponse> {
    let handle = state.session(session_id).map_err(flow_error)?;
    let mut session = handle.claim().map_err(flow_error)?;
    let id = session.add_claim(&request.text).map_err(flow_error)?;
    Ok(Json(AddedResponse {
        session_id,
        added: vec![id],
    }))
}

/// Starts a batch in the background. The session stays claimed until the
/// batch finishes, so a second start (or any edit) is answered with 409.
async fn start_batch(
    State(state): State<AppState>,
    Path((session_id, kind)): Path<(Uuid, BatchKind)>,
) -> Result<(StatusCode, Json<BatchStartedResponse>), ApiError> {
    let handle = state.session(session_id).map_err(flow_error)?;
    let mut session = handle.claim().map_err(flow_error)?;

    let processor = kind.processor(&state.services, &state.flow_config);
    processor.precondition(&session).map_err(flow_error)?;

    let status = processor.start_message();
    info!(session_id = %session_id, batch = %kind, "Starting batch");

    tokio::spawn(async move {
        if let Err(e) = session.run(processor.as_ref()).await {
            warn!(session_id = %session_id, batch = %kind, "Batch ended with error: {}", e);
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(BatchStartedResponse {
            session_id,
            batch: kind,
            status,
        }),
    ))
}

async fn get_review(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<ReviewResponse> {
    let handle = state.session(session_id).map_err(flow_error)?;
    let snapshot = handle.snapshot();
    let review = FinalReview::assemble(&snapshot.papers, &snapshot.claims);
    let text = review.to_string();
    Ok(Json(ReviewResponse {
        session_id,
        review,
        text,
    }))
}

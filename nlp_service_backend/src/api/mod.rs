// backend/src/api/mod.rs

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::{collections::HashMap, sync::Arc};

use crate::{
    error::ApiError,
    models::{EntityType, JobId, JobKind, JobStatusView, Operation, SubmitResponse},
    validation::RawArgs,
    AppState,
};

type ApiResult<T> = Result<T, ApiError>;

// --- Handlers ---

// GET /
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

// POST /annotate/:operation
pub async fn annotate(
    State(app_state): State<Arc<AppState>>,
    Path(operation): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Response> {
    let raw = raw_args(body, &query, Some(operation), None)?;
    submit(&app_state, JobKind::Annotate, raw).await
}

// POST /get-entities/
pub async fn get_all_entities(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Response> {
    let raw = raw_args(body, &query, None, None)?;
    submit(&app_state, JobKind::GetEntities, raw).await
}

// POST /get-entities/:entity_type
pub async fn get_entities(
    State(app_state): State<Arc<AppState>>,
    Path(entity_type): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Response> {
    let raw = raw_args(body, &query, None, Some(entity_type))?;
    submit(&app_state, JobKind::GetEntities, raw).await
}

// GET /status/:task_id
pub async fn task_status(
    State(app_state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<JobStatusView>> {
    let view = app_state.tracker.status(&JobId::from(task_id)).await?;
    Ok(Json(view))
}

// GET /help/
pub async fn list_all_options(State(app_state): State<Arc<AppState>>) -> Json<Value> {
    Json(options(&app_state, None))
}

// GET /help/:topic
pub async fn list_options(
    State(app_state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> Json<Value> {
    Json(options(&app_state, Some(&topic)))
}

// --- Helpers ---

fn raw_args(
    body: Result<Bytes, BytesRejection>,
    query: &HashMap<String, String>,
    operation: Option<String>,
    entity_type: Option<String>,
) -> ApiResult<RawArgs> {
    let text = String::from_utf8(body?.to_vec()).map_err(|_| ApiError::InvalidBody)?;
    Ok(RawArgs {
        text,
        operation,
        entity_type,
        lang: query.get("lang").cloned(),
        include_references: query.get("include-references").cloned(),
    })
}

async fn submit(app_state: &AppState, kind: JobKind, raw: RawArgs) -> ApiResult<Response> {
    let request = app_state.validator.validate(kind, raw)?;
    let id = app_state.submitter.submit(request).await?;

    let location = format!("/status/{}", id);
    let body = SubmitResponse {
        status: "Accepted".to_string(),
        task: id,
    };
    Ok((StatusCode::ACCEPTED, [(header::LOCATION, location)], Json(body)).into_response())
}

fn options(app_state: &AppState, topic: Option<&str>) -> Value {
    let operations: Vec<&str> = Operation::ALL.iter().map(Operation::as_str).collect();
    let languages: Vec<&str> = app_state
        .validator
        .supported_languages()
        .iter()
        .map(|l| l.as_str())
        .collect();
    let entity_types: Vec<&str> = EntityType::ALL.iter().map(EntityType::as_str).collect();

    match topic {
        Some("annotation-operations") => json!(operations),
        Some("languages") => json!(languages),
        Some("entity-types") => json!(entity_types),
        _ => json!({
            "annotation-operations": operations,
            "languages": languages,
            "entity-types": entity_types,
        }),
    }
}

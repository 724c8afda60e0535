//! Resource CRUD handlers: list, read, create, update, delete.

use crate::config::ResolvedResource;
use crate::error::AppError;
use crate::response::{created_id, no_content, ok_many, ok_one};
use crate::service::{CrudService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

fn resource<'a>(state: &'a AppState, path_segment: &str) -> Result<&'a ResolvedResource, AppError> {
    state
        .model
        .resource_by_path(path_segment)
        .ok_or_else(|| AppError::NotFound(format!("resource '{}'", path_segment)))
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

/// Unwrap the JSON body and check it against the resource before any store access.
fn validated_body(
    resource: &ResolvedResource,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Map<String, Value>, AppError> {
    let Json(value) = body?;
    let Value::Object(map) = value else {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    };
    RequestValidator::validate(&map, resource).into_result()?;
    Ok(map)
}

pub async fn list(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resource(&state, &path_segment)?;
    let rows = CrudService::list(state.store.as_ref(), resource).await?;
    Ok(ok_many(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resource(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let row = CrudService::read(state.store.as_ref(), resource, id).await?;
    Ok(ok_one(row))
}

pub async fn create(
    State(state): State<AppState>,
    Path(path_segment): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resource(&state, &path_segment)?;
    let body = validated_body(resource, body)?;
    let id = CrudService::create(state.store.as_ref(), resource, &body).await?;
    Ok(created_id(id))
}

pub async fn update(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resource(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    let body = validated_body(resource, body)?;
    CrudService::update(state.store.as_ref(), resource, id, &body).await?;
    Ok(no_content())
}

pub async fn delete(
    State(state): State<AppState>,
    Path((path_segment, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let resource = resource(&state, &path_segment)?;
    let id = parse_id(&id_str)?;
    CrudService::delete(state.store.as_ref(), resource, id).await?;
    Ok(no_content())
}

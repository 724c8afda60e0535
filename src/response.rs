//! Success response helpers. Bodies are bare JSON (no envelope).

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct CreatedId {
    pub id: i64,
}

pub fn created_id(id: i64) -> (StatusCode, Json<CreatedId>) {
    (StatusCode::CREATED, Json(CreatedId { id }))
}

pub fn ok_one(row: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(row))
}

pub fn ok_many(rows: Vec<Value>) -> (StatusCode, Json<Vec<Value>>) {
    (StatusCode::OK, Json(rows))
}

pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

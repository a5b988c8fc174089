//! Cake handlers: list, read, create, update, delete.

use crate::entity::NewCake;
use crate::error::AppError;
use crate::response::{success_created, success_message, success_ok};
use crate::service::{cake_rules, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("invalid cake id".into()))
}

/// Validate a raw JSON body and convert it into the write model.
fn parse_payload(payload: Result<Json<Value>, JsonRejection>) -> Result<NewCake, AppError> {
    let Json(body) = payload?;
    let mut map = match body {
        Value::Object(m) => m,
        _ => return Err(AppError::BadRequest("body must be a JSON object".into())),
    };
    let rules = cake_rules();
    RequestValidator::apply_aliases(&mut map, &rules);
    RequestValidator::validate(&map, &rules)?;
    map.retain(|_, v| !v.is_null());
    let mut cake: NewCake = serde_json::from_value(Value::Object(map))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    cake.title = cake.title.trim().to_string();
    Ok(cake)
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cakes = state.cakes.get_all_cakes().await?;
    Ok(success_ok("Cakes fetched successfully", cakes))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let cake = state.cakes.get_cake_by_id(id).await?;
    Ok(success_ok("Cake fetched successfully", cake))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let cake = parse_payload(payload)?;
    let created = state.cakes.create_cake(cake).await?;
    Ok(success_created("Cake created successfully", created))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let cake = parse_payload(payload)?;
    let updated = state.cakes.update_cake(id, cake).await?;
    Ok(success_ok("Cake updated successfully", updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.cakes.delete_cake(id).await?;
    Ok(success_message("Cake deleted successfully"))
}

//! Coffee HTTP handlers.
//!
//! This module implements the coffee collection endpoints:
//! - GET /coffees - List every coffee
//! - GET /coffees/{id} - Get one coffee (or `null`)
//! - POST /coffees - Store a new coffee
//! - PUT /coffees/{id} - Overwrite the mutable fields of a coffee
//! - DELETE /coffees/{id} - Remove a coffee
//!
//! Ids are parsed here, before the store is touched, so a malformed id is
//! reported as `400 malformed_id` and never confused with a missing coffee.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::Value;

use crate::{
    app::AppState,
    error::AppError,
    models::coffee::{self, Coffee, CoffeeId, CoffeeUpdate, DeleteAck, UpdateAck},
};

/// List all coffees.
///
/// # Response (200 OK)
///
/// ```json
/// [
///   { "_id": "550e8400-e29b-41d4-a716-446655440000", "coffee_name": "Latte", "price": 4.5 }
/// ]
/// ```
pub async fn list_coffees(State(state): State<AppState>) -> Result<Json<Vec<Coffee>>, AppError> {
    let coffees = state.coffees.list().await?;
    Ok(Json(coffees))
}

/// Get a single coffee.
///
/// # Response
///
/// - **200 OK**: the coffee, or `null` when no coffee has this id
/// - **400**: `id` is not a valid coffee id
pub async fn get_coffee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Coffee>>, AppError> {
    let id: CoffeeId = id.parse()?;
    let coffee = state.coffees.get(id).await?;
    Ok(Json(coffee))
}

/// Store a new coffee.
///
/// The body is stored as sent. It must be a JSON object; an `_id` in it is
/// ignored.
///
/// # Response (201 Created)
///
/// ```json
/// { "acknowledged": true, "insertedId": "550e8400-e29b-41d4-a716-446655440000" }
/// ```
pub async fn create_coffee(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let document = coffee::new_document(body)?;
    let ack = state.coffees.insert(document).await?;

    tracing::info!(id = %ack.inserted_id, "coffee created");

    Ok((StatusCode::CREATED, Json(ack)))
}

/// Overwrite the nine mutable fields of a coffee.
///
/// `added_by` always receives the configured attribution, whatever the body
/// says. Other stored fields are kept.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "acknowledged": true,
///   "matchedCount": 1,
///   "modifiedCount": 1,
///   "upsertedCount": 0,
///   "upsertedId": null
/// }
/// ```
///
/// Both counts are 0 when no coffee has this id.
pub async fn update_coffee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CoffeeUpdate>,
) -> Result<Json<UpdateAck>, AppError> {
    let id: CoffeeId = id.parse()?;
    let ack = state
        .coffees
        .update(id, update.into_set(&state.added_by))
        .await?;
    Ok(Json(ack))
}

/// Delete a coffee.
///
/// # Response (200 OK)
///
/// ```json
/// { "acknowledged": true, "deletedCount": 1 }
/// ```
///
/// `deletedCount` is 0 when no coffee has this id.
pub async fn delete_coffee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id: CoffeeId = id.parse()?;
    let ack = state.coffees.delete(id).await?;
    Ok(Json(ack))
}

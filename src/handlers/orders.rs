use crate::app_state::{AppState, Order};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct NewOrder {
    item: String,
    quantity: u32,
}

/// List every order.
#[tracing::instrument(skip(state))]
pub async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.list_orders().await)
}

/// Fetch one order; 404 if it does not exist.
#[tracing::instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Order>, StatusCode> {
    state.get_order(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Add an order; 422 for an empty item or zero quantity.
#[tracing::instrument(skip(state, order))]
pub async fn add_order(
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), StatusCode> {
    // ---
    if order.item.trim().is_empty() || order.quantity == 0 {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let order = state.add_order(order.item, order.quantity).await;
    info!("{}/{}", order.id, order.item);

    Ok((StatusCode::CREATED, Json(order)))
}

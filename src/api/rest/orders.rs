use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::order::{Order, OrderStatus};
use crate::sim::batch::{BatchOutcome, process_multiple_orders};
use crate::sim::delivery::{DeliveryReceipt, complete_delivery};
use crate::sim::dispatch::assign_driver;
use crate::sim::order::{PreparedOrder, process_order};
use crate::sim::tracker::track_order_status;
use crate::state::AppState;
use crate::util::text::is_valid_email;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/batch", post(run_batch))
        .route("/orders/:id", get(get_order))
        .route("/orders/:id/process", post(run_process))
        .route("/orders/:id/assign", post(run_assign))
        .route("/orders/:id/complete", post(run_complete))
        .route("/orders/:id/track", post(start_tracking))
        .route("/assignments", get(list_assignments))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub id: u32,
    pub restaurant_id: u32,
    pub items: Vec<String>,
    pub total_amount: f64,
    pub customer_email: Option<String>,
}

#[derive(Deserialize)]
pub struct CompleteDeliveryRequest {
    pub driver_id: u32,
}

#[derive(Deserialize)]
pub struct BatchRequest {
    pub order_ids: Vec<u32>,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one item".to_string(),
        ));
    }

    if payload.total_amount <= 0.0 {
        return Err(AppError::BadRequest(
            "total amount must be positive".to_string(),
        ));
    }

    if let Some(email) = &payload.customer_email {
        if !is_valid_email(email) {
            return Err(AppError::BadRequest(format!(
                "invalid customer email: {email}"
            )));
        }
    }

    if state.orders.contains_key(&payload.id) {
        return Err(AppError::Conflict(format!(
            "order {} already exists",
            payload.id
        )));
    }

    let order = Order {
        id: payload.id,
        restaurant_id: payload.restaurant_id,
        items: payload.items,
        total_amount: payload.total_amount,
        customer_email: payload.customer_email,
        status: OrderStatus::Received,
        assigned_driver: None,
        created_at: Utc::now(),
    };

    state.orders.insert(order.id, order.clone());
    Ok(Json(order))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    Ok(Json(order.value().clone()))
}

async fn run_process(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<PreparedOrder>, AppError> {
    let restaurant_id = state
        .orders
        .get(&id)
        .map(|entry| entry.value().restaurant_id)
        .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;

    let prepared = process_order(&state, restaurant_id, id).await?;
    Ok(Json(prepared))
}

async fn run_assign(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Assignment>, AppError> {
    let already_assigned = {
        let order = state
            .orders
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("order {id} not found")))?;
        order.value().assigned_driver.is_some()
    };

    if already_assigned {
        return Err(AppError::Conflict(format!("order {id} already has a driver")));
    }

    let assignment = assign_driver(&state, id)?;
    Ok(Json(assignment))
}

async fn run_complete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(payload): Json<CompleteDeliveryRequest>,
) -> Result<Json<DeliveryReceipt>, AppError> {
    let receipt = complete_delivery(&state, id, payload.driver_id).await?;
    Ok(Json(receipt))
}

async fn start_tracking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if !state.orders.contains_key(&id) {
        return Err(AppError::NotFound(format!("order {id} not found")));
    }

    track_order_status(state.clone(), id);

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "order_id": id,
            "total_stages": OrderStatus::STAGES.len(),
        })),
    ))
}

async fn run_batch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BatchRequest>,
) -> Json<BatchOutcome> {
    let outcome = process_multiple_orders(&state, &payload.order_ids).await;
    Json(outcome)
}

async fn list_assignments(State(state): State<Arc<AppState>>) -> Json<Vec<Assignment>> {
    let assignments = state
        .assignments
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Json(assignments)
}

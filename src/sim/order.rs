use serde::Serialize;
use tokio::time::{Duration, Instant, sleep};
use tracing::info;

use crate::error::AppError;
use crate::models::order::OrderStatus;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct PreparedOrder {
    pub order_id: u32,
    pub status: OrderStatus,
    pub preparation_time_secs: u64,
    pub restaurant: String,
}

/// Simulates preparing one order: wait the restaurant's preparation time,
/// then succeed or fail according to its success rate.
pub async fn process_order(
    state: &AppState,
    restaurant_id: u32,
    order_id: u32,
) -> Result<PreparedOrder, AppError> {
    let restaurant = state
        .restaurants
        .get(&restaurant_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("restaurant {restaurant_id} not found")))?;

    if let Some(mut order) = state.orders.get_mut(&order_id) {
        order.status = OrderStatus::Preparing;
    }

    let started = Instant::now();
    sleep(Duration::from_secs(restaurant.preparation_time_secs)).await;

    let draw = state.draw();
    let outcome = if draw > restaurant.success_rate {
        "failed"
    } else {
        "ready"
    };
    state
        .metrics
        .preparation_seconds
        .with_label_values(&[outcome])
        .observe(started.elapsed().as_secs_f64());
    state
        .metrics
        .orders_processed_total
        .with_label_values(&[outcome])
        .inc();

    if draw > restaurant.success_rate {
        return Err(AppError::PreparationFailed {
            order_id,
            restaurant: restaurant.name,
        });
    }

    if let Some(mut order) = state.orders.get_mut(&order_id) {
        order.status = OrderStatus::Ready;
    }

    info!(order_id, restaurant = %restaurant.name, "order ready");

    Ok(PreparedOrder {
        order_id,
        status: OrderStatus::Ready,
        preparation_time_secs: restaurant.preparation_time_secs,
        restaurant: restaurant.name,
    })
}

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{Duration, sleep};
use tracing::info;

use crate::error::AppError;
use crate::models::order::OrderStatus;
use crate::sim::dispatch::release_driver;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReceipt {
    pub order_id: u32,
    pub driver_id: u32,
    pub driver_name: String,
    pub delivered_at: DateTime<Utc>,
}

/// Simulates the delivery leg: wait the driver's delivery time, then either
/// fail at the configured rate or mark the order delivered and release the
/// driver back into the pool.
pub async fn complete_delivery(
    state: &AppState,
    order_id: u32,
    driver_id: u32,
) -> Result<DeliveryReceipt, AppError> {
    let driver = state
        .drivers
        .get(&driver_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

    if let Some(order) = state.orders.get(&order_id) {
        if order.assigned_driver.is_some_and(|id| id != driver_id) {
            return Err(AppError::Conflict(format!(
                "order {order_id} is assigned to a different driver"
            )));
        }
    }

    sleep(Duration::from_secs(driver.delivery_time_secs)).await;

    if state.draw() < state.delivery_failure_rate {
        state
            .metrics
            .deliveries_total
            .with_label_values(&["failed"])
            .inc();
        return Err(AppError::DeliveryFailed { order_id });
    }

    release_driver(state, driver_id)?;

    if let Some(mut order) = state.orders.get_mut(&order_id) {
        order.status = OrderStatus::Delivered;
    }

    state
        .metrics
        .deliveries_total
        .with_label_values(&["delivered"])
        .inc();

    info!(order_id, driver_id, driver = %driver.name, "delivery confirmed");

    Ok(DeliveryReceipt {
        order_id,
        driver_id,
        driver_name: driver.name,
        delivered_at: Utc::now(),
    })
}

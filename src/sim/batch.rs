use futures::future::join_all;
use serde::Serialize;
use tokio::time::Instant;
use tracing::info;

use crate::error::AppError;
use crate::sim::order::{PreparedOrder, process_order};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct FailedOrder {
    pub order_id: u32,
    pub error: String,
    pub restaurant: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub successful: Vec<PreparedOrder>,
    pub failed: Vec<FailedOrder>,
    pub total_processing_time_secs: u64,
}

/// Runs the preparation simulation for every order concurrently and waits
/// for all of them to settle. One failure never cancels a sibling.
pub async fn process_multiple_orders(state: &AppState, order_ids: &[u32]) -> BatchOutcome {
    let started = Instant::now();

    let runs = order_ids.iter().map(|&order_id| async move {
        let restaurant_id = state
            .orders
            .get(&order_id)
            .map(|entry| entry.value().restaurant_id);

        let result = match restaurant_id {
            Some(restaurant_id) => process_order(state, restaurant_id, order_id).await,
            None => Err(AppError::NotFound(format!("order {order_id} not found"))),
        };

        (order_id, result)
    });

    let settled = join_all(runs).await;

    let mut successful = Vec::new();
    let mut failed = Vec::new();
    for (order_id, result) in settled {
        match result {
            Ok(prepared) => successful.push(prepared),
            Err(err) => failed.push(FailedOrder {
                order_id,
                error: err.to_string(),
                restaurant: restaurant_name_for(state, order_id),
            }),
        }
    }

    let total_processing_time_secs = started.elapsed().as_secs_f64().round() as u64;

    info!(
        successful = successful.len(),
        failed = failed.len(),
        total_processing_time_secs,
        "batch settled"
    );

    BatchOutcome {
        successful,
        failed,
        total_processing_time_secs,
    }
}

fn restaurant_name_for(state: &AppState, order_id: u32) -> String {
    let Some(order) = state.orders.get(&order_id) else {
        return "unknown".to_string();
    };

    state
        .restaurants
        .get(&order.restaurant_id)
        .map(|entry| entry.value().name.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

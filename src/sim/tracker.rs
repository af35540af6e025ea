use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use crate::models::order::OrderStatus;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub order_id: u32,
    pub stage: String,
    pub stage_number: usize,
    pub total_stages: usize,
    pub timestamp: DateTime<Utc>,
}

/// Walks an order through the five status stages on a fixed interval,
/// publishing one update per stage on the status event channel.
pub fn track_order_status(state: Arc<AppState>, order_id: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        let total_stages = OrderStatus::STAGES.len();

        for (index, stage) in OrderStatus::STAGES.iter().enumerate() {
            let update = StatusUpdate {
                order_id,
                stage: stage.label().to_string(),
                stage_number: index + 1,
                total_stages,
                timestamp: Utc::now(),
            };

            // Subscribers come and go; an update with no receivers is fine.
            let _ = state.status_events_tx.send(update);
            debug!(order_id, stage = stage.label(), "status update");

            if index + 1 < total_stages {
                sleep(state.status_interval).await;
            }
        }
    })
}

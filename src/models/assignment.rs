use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub order_id: u32,
    pub driver_id: u32,
    pub driver_name: String,
    pub estimated_delivery_time_secs: u64,
    pub assigned_at: DateTime<Utc>,
}

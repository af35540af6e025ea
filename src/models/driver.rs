use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: u32,
    pub name: String,
    pub is_available: bool,
    pub delivery_time_secs: u64,
    pub updated_at: DateTime<Utc>,
}

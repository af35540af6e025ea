use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: u32,
    pub name: String,
    pub preparation_time_secs: u64,
    /// Probability in [0, 1] that a preparation run succeeds.
    pub success_rate: f64,
}

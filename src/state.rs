use std::sync::Mutex;
use std::time::Duration;

use dashmap::DashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::Config;
use crate::models::assignment::Assignment;
use crate::models::driver::Driver;
use crate::models::order::Order;
use crate::models::restaurant::Restaurant;
use crate::observability::metrics::Metrics;
use crate::sim::tracker::StatusUpdate;

pub struct AppState {
    pub restaurants: DashMap<u32, Restaurant>,
    pub drivers: DashMap<u32, Driver>,
    pub orders: DashMap<u32, Order>,
    pub assignments: DashMap<Uuid, Assignment>,
    pub status_events_tx: broadcast::Sender<StatusUpdate>,
    pub delivery_failure_rate: f64,
    pub status_interval: Duration,
    pub metrics: Metrics,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let (status_events_tx, _unused_rx) = broadcast::channel(config.event_buffer_size);

        let rng = match config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            restaurants: DashMap::new(),
            drivers: DashMap::new(),
            orders: DashMap::new(),
            assignments: DashMap::new(),
            status_events_tx,
            delivery_failure_rate: config.delivery_failure_rate,
            status_interval: Duration::from_millis(config.status_interval_ms),
            metrics: Metrics::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Next uniform draw in [0, 1). The lock is held only for the draw,
    /// never across an await.
    pub fn draw(&self) -> f64 {
        self.rng.lock().expect("rng mutex poisoned").random()
    }
}

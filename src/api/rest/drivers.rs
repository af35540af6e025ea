use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{patch, post};
use chrono::Utc;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::driver::Driver;
use crate::state::AppState;
use crate::util::text::title_case;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", post(create_driver).get(list_drivers))
        .route("/drivers/:id/availability", patch(update_driver_availability))
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub id: u32,
    pub name: String,
    pub delivery_time_secs: u64,
}

#[derive(Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub is_available: bool,
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    let name = title_case(&payload.name);
    if name.is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.delivery_time_secs == 0 {
        return Err(AppError::BadRequest(
            "delivery time must be > 0".to_string(),
        ));
    }

    if state.drivers.contains_key(&payload.id) {
        return Err(AppError::Conflict(format!(
            "driver {} already exists",
            payload.id
        )));
    }

    let driver = Driver {
        id: payload.id,
        name,
        is_available: true,
        delivery_time_secs: payload.delivery_time_secs,
        updated_at: Utc::now(),
    };

    state.drivers.insert(driver.id, driver.clone());
    state.metrics.drivers_available.inc();

    Ok(Json(driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Json<Vec<Driver>> {
    let drivers = state
        .drivers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(drivers)
}

async fn update_driver_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Json<Driver>, AppError> {
    let mut driver = state
        .drivers
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    if driver.is_available != payload.is_available {
        driver.is_available = payload.is_available;
        driver.updated_at = Utc::now();

        if payload.is_available {
            state.metrics.drivers_available.inc();
        } else {
            state.metrics.drivers_available.dec();
        }
    }

    Ok(Json(driver.clone()))
}

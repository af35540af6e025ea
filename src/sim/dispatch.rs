use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::driver::Driver;
use crate::models::order::OrderStatus;
use crate::state::AppState;

/// Picks the available driver with the shortest delivery time and claims it
/// for the order. Ties resolve to the lowest driver id.
pub fn assign_driver(state: &AppState, order_id: u32) -> Result<Assignment, AppError> {
    let mut candidates: Vec<Driver> = state
        .drivers
        .iter()
        .filter(|entry| entry.value().is_available)
        .map(|entry| entry.value().clone())
        .collect();

    if candidates.is_empty() {
        return Err(AppError::NoAvailableDrivers);
    }

    // Map iteration order is arbitrary; sorting by id keeps tie-breaking
    // deterministic across runs.
    candidates.sort_by_key(|driver| driver.id);

    let chosen = candidates
        .iter()
        .min_by_key(|driver| driver.delivery_time_secs)
        .cloned()
        .ok_or_else(|| AppError::Internal("failed to select a driver".to_string()))?;

    // Re-check under the entry guard: a concurrent assignment may have
    // claimed the driver since the snapshot above.
    let mut claimed = false;
    if let Some(mut driver) = state.drivers.get_mut(&chosen.id) {
        if driver.is_available {
            driver.is_available = false;
            driver.updated_at = Utc::now();
            claimed = true;
        }
    }
    if !claimed {
        return Err(AppError::Conflict(format!(
            "driver {} is no longer available",
            chosen.id
        )));
    }
    state.metrics.drivers_available.dec();

    if let Some(mut order) = state.orders.get_mut(&order_id) {
        order.status = OrderStatus::OutForDelivery;
        order.assigned_driver = Some(chosen.id);
    }

    let assignment = Assignment {
        id: Uuid::new_v4(),
        order_id,
        driver_id: chosen.id,
        driver_name: chosen.name.clone(),
        estimated_delivery_time_secs: chosen.delivery_time_secs,
        assigned_at: Utc::now(),
    };
    state.assignments.insert(assignment.id, assignment.clone());

    info!(order_id, driver_id = chosen.id, driver = %chosen.name, "driver assigned");

    Ok(assignment)
}

/// Puts a driver back into the available pool after a completed delivery.
pub fn release_driver(state: &AppState, driver_id: u32) -> Result<(), AppError> {
    let mut driver = state
        .drivers
        .get_mut(&driver_id)
        .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

    if !driver.is_available {
        driver.is_available = true;
        driver.updated_at = Utc::now();
        state.metrics.drivers_available.inc();
    }

    Ok(())
}

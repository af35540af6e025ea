use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::restaurant::Restaurant;
use crate::state::AppState;
use crate::util::text::title_case;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/restaurants", post(create_restaurant).get(list_restaurants))
}

#[derive(Deserialize)]
pub struct CreateRestaurantRequest {
    pub id: u32,
    pub name: String,
    pub preparation_time_secs: u64,
    pub success_rate: f64,
}

async fn create_restaurant(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<Json<Restaurant>, AppError> {
    let name = title_case(&payload.name);
    if name.is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.preparation_time_secs == 0 {
        return Err(AppError::BadRequest(
            "preparation time must be > 0".to_string(),
        ));
    }

    if state.restaurants.contains_key(&payload.id) {
        return Err(AppError::Conflict(format!(
            "restaurant {} already exists",
            payload.id
        )));
    }

    let restaurant = Restaurant {
        id: payload.id,
        name,
        preparation_time_secs: payload.preparation_time_secs,
        success_rate: payload.success_rate.clamp(0.0, 1.0),
    };

    state.restaurants.insert(restaurant.id, restaurant.clone());
    Ok(Json(restaurant))
}

async fn list_restaurants(State(state): State<Arc<AppState>>) -> Json<Vec<Restaurant>> {
    let restaurants = state
        .restaurants
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(restaurants)
}

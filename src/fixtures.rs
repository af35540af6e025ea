use chrono::Utc;

use crate::models::driver::Driver;
use crate::models::order::{Order, OrderStatus};
use crate::models::restaurant::Restaurant;
use crate::state::AppState;

/// Loads the demo data set into the stores. Used by the demo deployment
/// (behind `SEED_DEMO_DATA`) and by tests that want a populated world.
pub fn seed_demo_data(state: &AppState) {
    for restaurant in demo_restaurants() {
        state.restaurants.insert(restaurant.id, restaurant);
    }

    for driver in demo_drivers() {
        if driver.is_available {
            state.metrics.drivers_available.inc();
        }
        state.drivers.insert(driver.id, driver);
    }

    for order in demo_orders() {
        state.orders.insert(order.id, order);
    }
}

pub fn demo_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: 1,
            name: "Pizza Palace".to_string(),
            preparation_time_secs: 15,
            success_rate: 0.9,
        },
        Restaurant {
            id: 2,
            name: "Burger Barn".to_string(),
            preparation_time_secs: 10,
            success_rate: 0.8,
        },
        Restaurant {
            id: 3,
            name: "Sushi Spot".to_string(),
            preparation_time_secs: 20,
            success_rate: 0.95,
        },
        Restaurant {
            id: 4,
            name: "Taco Town".to_string(),
            preparation_time_secs: 8,
            success_rate: 0.85,
        },
    ]
}

pub fn demo_drivers() -> Vec<Driver> {
    vec![
        Driver {
            id: 1,
            name: "Alex".to_string(),
            is_available: true,
            delivery_time_secs: 12,
            updated_at: Utc::now(),
        },
        Driver {
            id: 2,
            name: "Sam".to_string(),
            is_available: false,
            delivery_time_secs: 15,
            updated_at: Utc::now(),
        },
        Driver {
            id: 3,
            name: "Jordan".to_string(),
            is_available: true,
            delivery_time_secs: 10,
            updated_at: Utc::now(),
        },
        Driver {
            id: 4,
            name: "Casey".to_string(),
            is_available: true,
            delivery_time_secs: 18,
            updated_at: Utc::now(),
        },
    ]
}

pub fn demo_orders() -> Vec<Order> {
    vec![
        Order {
            id: 101,
            restaurant_id: 1,
            items: vec!["Pizza Margherita".to_string(), "Coke".to_string()],
            total_amount: 15.99,
            customer_email: None,
            status: OrderStatus::Received,
            assigned_driver: None,
            created_at: Utc::now(),
        },
        Order {
            id: 102,
            restaurant_id: 2,
            items: vec!["Cheeseburger".to_string(), "Fries".to_string()],
            total_amount: 12.5,
            customer_email: None,
            status: OrderStatus::Received,
            assigned_driver: None,
            created_at: Utc::now(),
        },
        Order {
            id: 103,
            restaurant_id: 3,
            items: vec!["Salmon Roll".to_string(), "Miso Soup".to_string()],
            total_amount: 18.75,
            customer_email: None,
            status: OrderStatus::Received,
            assigned_driver: None,
            created_at: Utc::now(),
        },
    ]
}

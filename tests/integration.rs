use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use delivery_sim::api::rest::router;
use delivery_sim::config::Config;
use delivery_sim::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        http_port: 0,
        log_level: "info".to_string(),
        event_buffer_size: 64,
        status_interval_ms: 2000,
        delivery_failure_rate: 0.0,
        random_seed: Some(42),
        seed_demo_data: false,
    }
}

fn setup() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(&test_config()));
    (router(state.clone()), state)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn patch_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn create_restaurant(app: &axum::Router, id: u32, name: &str, prep: u64, rate: f64) {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/restaurants",
            json!({
                "id": id,
                "name": name,
                "preparation_time_secs": prep,
                "success_rate": rate
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn create_driver(app: &axum::Router, id: u32, name: &str, delivery: u64) {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/drivers",
            json!({
                "id": id,
                "name": name,
                "delivery_time_secs": delivery
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

async fn create_order(app: &axum::Router, id: u32, restaurant_id: u32) {
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders",
            json!({
                "id": id,
                "restaurant_id": restaurant_id,
                "items": ["Pizza Margherita", "Coke"],
                "total_amount": 15.99
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _state) = setup();
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["restaurants"], 0);
    assert_eq!(body["drivers"], 0);
    assert_eq!(body["orders"], 0);
    assert_eq!(body["assignments"], 0);
}

#[tokio::test]
async fn metrics_returns_prometheus_format() {
    let (app, _state) = setup();
    let response = app.oneshot(get_request("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.contains("text/plain"));

    let body = body_string(response).await;
    assert!(body.contains("drivers_available"));
}

#[tokio::test]
async fn create_restaurant_normalizes_name_and_clamps_rate() {
    let (app, _state) = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/restaurants",
            json!({
                "id": 1,
                "name": "  pizza   palace ",
                "preparation_time_secs": 15,
                "success_rate": 9.9
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "Pizza Palace");
    assert_eq!(body["preparation_time_secs"], 15);
    assert_eq!(body["success_rate"], 1.0);
}

#[tokio::test]
async fn create_restaurant_zero_prep_time_returns_400() {
    let (app, _state) = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/restaurants",
            json!({
                "id": 1,
                "name": "Taco Town",
                "preparation_time_secs": 0,
                "success_rate": 0.85
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_restaurant_duplicate_id_returns_409() {
    let (app, _state) = setup();
    create_restaurant(&app, 1, "Pizza Palace", 15, 0.9).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/restaurants",
            json!({
                "id": 1,
                "name": "Burger Barn",
                "preparation_time_secs": 10,
                "success_rate": 0.8
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_driver_starts_available() {
    let (app, _state) = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/drivers",
            json!({
                "id": 3,
                "name": "jordan",
                "delivery_time_secs": 10
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["name"], "Jordan");
    assert_eq!(body["is_available"], true);
    assert_eq!(body["delivery_time_secs"], 10);
}

#[tokio::test]
async fn create_order_empty_items_returns_400() {
    let (app, _state) = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/orders",
            json!({
                "id": 101,
                "restaurant_id": 1,
                "items": [],
                "total_amount": 15.99
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_order_invalid_email_returns_400() {
    let (app, _state) = setup();
    let response = app
        .oneshot(json_request(
            "POST",
            "/orders",
            json!({
                "id": 101,
                "restaurant_id": 1,
                "items": ["Cheeseburger"],
                "total_amount": 12.5,
                "customer_email": "invalid.email"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_nonexistent_order_returns_404() {
    let (app, _state) = setup();
    let response = app.oneshot(get_request("/orders/999")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn assign_without_drivers_returns_503() {
    let (app, _state) = setup();
    create_restaurant(&app, 1, "Pizza Palace", 15, 1.0).await;
    create_order(&app, 101, 1).await;

    let response = app
        .oneshot(post_request("/orders/101/assign"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn driver_availability_can_be_toggled() {
    let (app, _state) = setup();
    create_driver(&app, 2, "Sam", 15).await;

    let response = app
        .clone()
        .oneshot(patch_request(
            "/drivers/2/availability",
            json!({ "is_available": false }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["is_available"], false);

    let response = app.oneshot(get_request("/drivers")).await.unwrap();
    let drivers = body_json(response).await;
    assert_eq!(drivers.as_array().unwrap().len(), 1);
    assert_eq!(drivers[0]["is_available"], false);
}

#[tokio::test(start_paused = true)]
async fn full_delivery_flow_releases_the_driver() {
    let (app, _state) = setup();
    create_restaurant(&app, 1, "Pizza Palace", 15, 1.0).await;
    create_driver(&app, 1, "Alex", 12).await;
    create_order(&app, 101, 1).await;

    let response = app
        .clone()
        .oneshot(post_request("/orders/101/process"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let prepared = body_json(response).await;
    assert_eq!(prepared["status"], "ready");
    assert_eq!(prepared["preparation_time_secs"], 15);
    assert_eq!(prepared["restaurant"], "Pizza Palace");

    let response = app
        .clone()
        .oneshot(post_request("/orders/101/assign"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let assignment = body_json(response).await;
    assert_eq!(assignment["order_id"], 101);
    assert_eq!(assignment["driver_id"], 1);
    assert_eq!(assignment["driver_name"], "Alex");
    assert_eq!(assignment["estimated_delivery_time_secs"], 12);

    let response = app.clone().oneshot(get_request("/orders/101")).await.unwrap();
    let order = body_json(response).await;
    assert_eq!(order["status"], "out_for_delivery");
    assert_eq!(order["assigned_driver"], 1);

    let response = app.clone().oneshot(get_request("/drivers")).await.unwrap();
    let drivers = body_json(response).await;
    assert_eq!(drivers[0]["is_available"], false);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/orders/101/complete",
            json!({ "driver_id": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = body_json(response).await;
    assert_eq!(receipt["order_id"], 101);
    assert_eq!(receipt["driver_name"], "Alex");

    let response = app.clone().oneshot(get_request("/orders/101")).await.unwrap();
    let order = body_json(response).await;
    assert_eq!(order["status"], "delivered");

    // The completed driver is back in the pool.
    let response = app.clone().oneshot(get_request("/drivers")).await.unwrap();
    let drivers = body_json(response).await;
    assert_eq!(drivers[0]["is_available"], true);

    let response = app.oneshot(get_request("/assignments")).await.unwrap();
    let assignments = body_json(response).await;
    assert_eq!(assignments.as_array().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn batch_partitions_successes_and_failures() {
    let (app, _state) = setup();
    create_restaurant(&app, 1, "Pizza Palace", 2, 1.0).await;
    create_restaurant(&app, 2, "Burger Barn", 1, 0.0).await;
    create_order(&app, 101, 1).await;
    create_order(&app, 102, 2).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/orders/batch",
            json!({ "order_ids": [101, 102, 999] }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let outcome = body_json(response).await;
    let successful = outcome["successful"].as_array().unwrap();
    assert_eq!(successful.len(), 1);
    assert_eq!(successful[0]["order_id"], 101);

    let failed = outcome["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 2);

    let failed_ids: Vec<u64> = failed
        .iter()
        .map(|f| f["order_id"].as_u64().unwrap())
        .collect();
    assert!(failed_ids.contains(&102));
    assert!(failed_ids.contains(&999));

    // Concurrent fan-out: the batch takes as long as its slowest order.
    assert_eq!(outcome["total_processing_time_secs"], 2);
}

#[tokio::test]
async fn empty_batch_settles_with_zeroes() {
    let (app, _state) = setup();

    let response = app
        .oneshot(json_request("POST", "/orders/batch", json!({ "order_ids": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let outcome = body_json(response).await;
    assert_eq!(outcome["successful"].as_array().unwrap().len(), 0);
    assert_eq!(outcome["failed"].as_array().unwrap().len(), 0);
    assert_eq!(outcome["total_processing_time_secs"], 0);
}

#[tokio::test]
async fn tracking_an_order_is_accepted() {
    let (app, state) = setup();
    create_restaurant(&app, 1, "Pizza Palace", 15, 1.0).await;
    create_order(&app, 101, 1).await;

    let mut rx = state.status_events_tx.subscribe();

    let response = app
        .clone()
        .oneshot(post_request("/orders/101/track"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["order_id"], 101);
    assert_eq!(body["total_stages"], 5);

    let first = rx.recv().await.unwrap();
    assert_eq!(first.order_id, 101);
    assert_eq!(first.stage, "received");
}

#[tokio::test]
async fn demo_world_assigns_jordan_first() {
    let state = Arc::new(AppState::new(&test_config()));
    delivery_sim::fixtures::seed_demo_data(&state);
    let app = router(state.clone());

    // Sam is unavailable; of the rest, Jordan has the shortest delivery time.
    let response = app
        .oneshot(post_request("/orders/101/assign"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let assignment = body_json(response).await;
    assert_eq!(assignment["order_id"], 101);
    assert_eq!(assignment["driver_name"], "Jordan");
    assert_eq!(assignment["estimated_delivery_time_secs"], 10);
}

#[tokio::test]
async fn tracking_an_unknown_order_returns_404() {
    let (app, _state) = setup();

    let response = app.oneshot(post_request("/orders/999/track")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! Plain record API tests: clients, vehicles, finances, ratings and reports

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use garage_manager::domain::Collection;
use serde_json::json;

use crate::common::{json_body, TestApp};

#[tokio::test]
async fn test_client_crud() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/clients", json!({"name": "Ana Pérez", "phone": "3001234567", "vip": true}))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let client = json_body(response).await;
    let id = client["id"].as_str().unwrap().to_string();
    assert_eq!(client["vip"], true);

    let fetched = json_body(app.get(&format!("/api/clients/{}", id)).await).await;
    assert_eq!(fetched["name"], "Ana Pérez");

    let response = app
        .put_json(&format!("/api/clients/{}", id), json!({"name": "Ana P.", "phone": "3001234567"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Ana P.");

    let response = app.delete(&format!("/api/clients/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        app.get(&format!("/api/clients/{}", id)).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_create_client_requires_name_and_phone() {
    let app = TestApp::new().await;

    let response = app.post_json("/api/clients", json!({"email": "ana@example.com"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"phone"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/clients")
                .header("Content-Type", "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_put_on_missing_vehicle_creates_it() {
    let app = TestApp::new().await;

    let response = app
        .put_json("/api/vehicles/v9", json!({"clientId": "c1", "plate": "XYZ987"}))
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await["id"], "v9");
}

#[tokio::test]
async fn test_delete_unknown_record() {
    let app = TestApp::new().await;

    let response = app.delete("/api/vehicles/nope").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_vehicles_and_orders() {
    let app = TestApp::new().await;
    app.seed_order("9", "process");
    app.store.seed(
        Collection::Vehicles,
        vec![json!({"id": "v2", "clientId": "someone-else", "plate": "QQQ111"})],
    );

    let vehicles = json_body(app.get("/api/clients/c1/vehicles").await).await;
    assert_eq!(vehicles.as_array().unwrap().len(), 1);
    assert_eq!(vehicles[0]["plate"], "ABC123");

    let orders = json_body(app.get("/api/clients/c1/orders").await).await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["id"], "9");
}

#[tokio::test]
async fn test_nested_listing_of_unknown_client() {
    let app = TestApp::new().await;

    let response = app.get("/api/clients/ghost/vehicles").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_score_out_of_range() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/ratings", json!({"orderId": "9", "score": 9}))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_summary() {
    let app = TestApp::new().await;
    app.post_json("/api/revenues", json!({"description": "Brake job", "amount": 154700}))
        .await;
    app.post_json("/api/revenues", json!({"description": "Oil change", "amount": 80000.5}))
        .await;
    app.post_json("/api/expenses", json!({"description": "Pads", "amount": 60000}))
        .await;
    app.post_json("/api/ratings", json!({"orderId": "1", "score": 5})).await;
    app.post_json("/api/ratings", json!({"orderId": "2", "score": 4})).await;
    app.store.seed(
        Collection::Orders,
        vec![
            json!({"id": "1", "clientId": "c1", "vehicleId": "v1", "state": "delivered"}),
            json!({"id": "2", "clientId": "c1", "vehicleId": "v1", "state": "process"}),
            json!({"id": "3", "clientId": "c1", "vehicleId": "v1", "state": "process"}),
        ],
    );

    let response = app.get("/api/reports/summary").await;

    assert_eq!(response.status(), StatusCode::OK);
    let summary = json_body(response).await;
    assert_eq!(summary["totalRevenue"].as_f64(), Some(234700.5));
    assert_eq!(summary["totalExpenses"].as_f64(), Some(60000.0));
    assert_eq!(summary["balance"].as_f64(), Some(174700.5));
    assert_eq!(summary["totalOrders"], 3);
    assert_eq!(summary["ordersByState"]["process"], 2);
    assert_eq!(summary["ordersByState"]["reception"], 0);
    assert_eq!(summary["averageRating"].as_f64(), Some(4.5));
    assert_eq!(summary["ratingsCount"], 2);
}

#[tokio::test]
async fn test_technician_reports_are_plain_records() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/reports", json!({"orderId": "9", "description": "Replaced rotors"}))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let reports = json_body(app.get("/api/reports?orderId=9").await).await;
    assert_eq!(reports.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_state_history_collection_is_exposed() {
    let app = TestApp::new().await;
    app.seed_order("9", "reception");
    app.patch_json("/api/orders/9/state", json!({"state": "quotation"}))
        .await;

    let entries = json_body(app.get("/api/state-history?orderId=9").await).await;

    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["state"], "quotation");
}

//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers::{self, records};
use crate::domain::{Client, Expense, Rating, Report, Revenue, StateHistoryEntry, Vehicle};
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, track_metrics};
use crate::startup::AppState;

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(&state.settings.uploads.dir);
    let uploads_path = state.settings.uploads.public_path.trim_end_matches('/').to_string();

    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        // Uploaded photos
        .nest_service(&uploads_path, uploads)
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API routes
fn api_routes(state: AppState) -> Router<AppState> {
    let max_upload = state.settings.uploads.max_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .merge(auth_routes(state))
        .merge(user_routes())
        .merge(client_routes())
        .merge(order_routes())
        .merge(record_routes::<Vehicle>("/vehicles"))
        .merge(record_routes::<StateHistoryEntry>("/state-history"))
        .merge(record_routes::<Expense>("/expenses"))
        .merge(record_routes::<Revenue>("/revenues"))
        .merge(record_routes::<Rating>("/ratings"))
        .route("/reports/summary", get(handlers::reports::summary))
        .merge(record_routes::<Report>("/reports"))
        .route("/email", post(handlers::email::send_email))
        .route(
            "/upload",
            post(handlers::upload::upload_photo).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/public/orders/{id}", get(handlers::public::track_order))
}

/// Authentication routes; only `/auth/me` needs a token
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
}

/// Plain pass-through CRUD for one collection
fn record_routes<T: crate::domain::entities::Document>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(records::list::<T>).post(records::create::<T>))
        .route(
            &format!("{}/{{id}}", base),
            get(records::get::<T>)
                .put(records::update::<T>)
                .delete(records::delete::<T>),
        )
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

fn client_routes() -> Router<AppState> {
    record_routes::<Client>("/clients")
        .route("/clients/{id}/vehicles", get(handlers::clients::vehicles))
        .route("/clients/{id}/orders", get(handlers::clients::orders))
}

fn order_routes() -> Router<AppState> {
    use handlers::orders;

    Router::new()
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route(
            "/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/orders/{id}/state", patch(orders::change_state))
        .route("/orders/{id}/history", get(orders::get_history))
        .route("/orders/{id}/quotation", get(orders::get_quotation))
        .route("/orders/{id}/invoice", get(orders::get_invoice))
        .route("/orders/{id}/share-link", get(orders::get_share_link))
}

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/send-otp", post(handlers::auth::send_otp))
        .route("/auth/verify-otp", post(handlers::auth::verify_otp))
        .route("/auth/profile", get(handlers::auth::get_profile))
        .route("/auth/profile", put(handlers::auth::update_profile))
        .route("/salons", get(handlers::salons::list_salons))
        .route("/salons/:id", get(handlers::salons::get_salon))
        .route("/salons/:id/services", get(handlers::salons::get_services))
        .route("/salons/:id/slots", get(handlers::salons::get_slots))
        .route("/bookings", post(handlers::bookings::create_booking))
        .route("/bookings", get(handlers::bookings::list_bookings))
        .route("/bookings/:id", get(handlers::bookings::get_booking))
        .route(
            "/bookings/:id/cancel",
            patch(handlers::bookings::cancel_booking),
        )
        .route("/payments/process", post(handlers::payments::process_payment))
        .route(
            "/payments/booking/:booking_id",
            get(handlers::payments::get_payment),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod providers;
pub mod services;
pub mod startup;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::ports::{NotificationSink, SettingsStore, TransactionRepository};

#[derive(Clone)]
pub struct AppState {
    pub transactions: Arc<dyn TransactionRepository>,
    pub settings: Arc<dyn SettingsStore>,
    pub notifier: Arc<dyn NotificationSink>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/webhook/digiflazz",
            post(handlers::webhook::digiflazz_callback),
        )
        .route(
            "/webhook/tokovoucher",
            post(handlers::webhook::tokovoucher_callback),
        )
        .route(
            "/transactions/:ref_id",
            get(handlers::webhook::get_transaction),
        )
        .with_state(state)
}

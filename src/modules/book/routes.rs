use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(controller::browse))
        .route("/add", post(controller::create))
        .route("/{id}/book", post(controller::reserve))
        .route("/{id}/cancel", post(controller::cancel))
        .route("/{id}/otp/send", post(controller::send_sale_code))
        .route("/{id}/otp/verify", post(controller::confirm_sale))
}

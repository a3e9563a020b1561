use axum::{
    routing::{post, put},
    Router,
};
use std::sync::Arc;

use super::controller;
use crate::AppState;

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(controller::signup))
        .route("/login", post(controller::login))
        .route("/logout", post(controller::logout))
        .route("/update-profile", put(controller::update_profile))
}

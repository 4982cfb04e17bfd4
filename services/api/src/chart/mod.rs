pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chart", post(handlers::post_chart))
        .route("/suggestions", get(handlers::get_suggestions))
}

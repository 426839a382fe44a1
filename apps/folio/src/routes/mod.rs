pub mod health;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Stylesheets, scripts, images and the raw data file are served as-is from the site root.
    let assets = ServeDir::new(&state.config.site_root);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(page::handle_index))
        .route("/index.html", get(page::handle_index))
        .route("/print", get(page::handle_print))
        .route("/theme/toggle", post(page::handle_theme_toggle))
        .fallback_service(assets)
        .with_state(state)
}

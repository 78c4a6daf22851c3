pub mod health;
pub mod render;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Render API
        .route("/api/v1/render", post(render::handle_render))
        .route("/api/v1/render/additional", post(render::handle_categorize))
        .route("/api/v1/render/contact", post(render::handle_contact))
        .with_state(state)
}

use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::health_controller::{self, HealthResponse};
use crate::state::AppState;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health_controller::check(&state).await)
}

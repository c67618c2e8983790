pub mod fueling_routes;
pub mod health_routes;

use axum::Router;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let fueling_path = format!("/api/{}/abastecimentos", state.config.api_version);
    let cors = cors_middleware(&state.config);

    Router::new()
        .nest(&fueling_path, fueling_routes::create_fueling_router())
        .merge(health_routes::create_health_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

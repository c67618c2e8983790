use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthServices {
    pub database: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub timestamp: String,
    pub services: HealthServices,
}

/// Estado del servicio. Siempre responde; la base caída se reporta como `degraded`.
pub async fn check(state: &AppState) -> HealthResponse {
    let database_ok = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("⚠️ Health check: base de datos no disponible: {}", e);
            false
        }
    };

    HealthResponse {
        status: if database_ok { "healthy" } else { "degraded" },
        version: state.config.api_version.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        services: HealthServices {
            database: if database_ok { "healthy" } else { "unhealthy" },
        },
    }
}

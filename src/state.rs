//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::fueling_repository::FuelingStore;
use crate::services::fueling_service::FuelingService;
use crate::services::reference_price::ReferencePriceProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn FuelingStore>,
    pub fueling: Arc<FuelingService>,
}

impl AppState {
    pub fn new(
        config: EnvironmentConfig,
        store: Arc<dyn FuelingStore>,
        prices: Arc<dyn ReferencePriceProvider>,
    ) -> Self {
        let fueling = Arc::new(FuelingService::new(
            store.clone(),
            prices,
            config.anomaly_threshold,
        ));

        Self {
            config,
            store,
            fueling,
        }
    }
}

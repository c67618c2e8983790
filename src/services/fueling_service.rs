//! Pipeline de admisión de abastecimientos
//!
//! Clasifica cada registro nuevo contra el precio de referencia de su
//! combustible y lo entrega al almacenamiento. Sin estado entre requests.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::models::fueling::{
    FuelingFilter, FuelingInput, FuelingRecord, NewFuelingRecord, Page, PageRequest,
};
use crate::repositories::fueling_repository::FuelingStore;
use crate::services::reference_price::ReferencePriceProvider;
use crate::utils::errors::AppResult;

/// Regla de anomalía: `price > reference * threshold`, estricto.
/// Sin referencia nunca es anómalo.
pub fn exceeds_reference(price: Decimal, reference: Option<Decimal>, threshold: Decimal) -> bool {
    match reference {
        Some(reference) => price > reference * threshold,
        None => false,
    }
}

pub struct FuelingService {
    store: Arc<dyn FuelingStore>,
    prices: Arc<dyn ReferencePriceProvider>,
    anomaly_threshold: Decimal,
}

impl FuelingService {
    pub fn new(
        store: Arc<dyn FuelingStore>,
        prices: Arc<dyn ReferencePriceProvider>,
        anomaly_threshold: Decimal,
    ) -> Self {
        Self {
            store,
            prices,
            anomaly_threshold,
        }
    }

    /// Admite un abastecimiento ya validado y devuelve el registro guardado.
    ///
    /// Los errores de persistencia se propagan tal cual, sin reintentos.
    pub async fn admit(&self, input: FuelingInput) -> AppResult<FuelingRecord> {
        let reference = self.prices.reference_price(input.fuel_type).await?;
        let is_anomalous =
            exceeds_reference(input.price_per_liter, reference, self.anomaly_threshold);

        let station_id = input.station_id;
        let fuel_type = input.fuel_type;
        let price = input.price_per_liter;

        let record = self
            .store
            .save(NewFuelingRecord::from_input(input, is_anomalous))
            .await?;

        match reference {
            Some(reference) if is_anomalous => warn!(
                "🚩 Abastecimiento {} marcado como anómalo: posto {}, {} a {} (referencia {})",
                record.id, station_id, fuel_type, price, reference
            ),
            Some(reference) => info!(
                "⛽ Abastecimiento {} registrado: posto {}, {} a {} (referencia {})",
                record.id, station_id, fuel_type, price, reference
            ),
            None => info!(
                "⛽ Abastecimiento {} registrado sin precio de referencia para {}",
                record.id, fuel_type
            ),
        }

        Ok(record)
    }

    /// Historial del motorista; vacío si no tiene registros.
    pub async fn driver_history(&self, driver_tax_id: &str) -> AppResult<Vec<FuelingRecord>> {
        let records = self.store.find_by_driver_tax_id(driver_tax_id).await?;
        debug!("🔍 Historial de motorista: {} registros", records.len());
        Ok(records)
    }

    pub async fn list(
        &self,
        filter: &FuelingFilter,
        page: PageRequest,
    ) -> AppResult<Page<FuelingRecord>> {
        let (items, total) = self.store.find_page(filter, page).await?;
        Ok(Page {
            items,
            total,
            page: page.page,
            size: page.size,
        })
    }
}

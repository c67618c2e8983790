//! Precio de referencia por tipo de combustible
//!
//! Hoy es una tabla fija. El trait permite sustituirla por una media
//! histórica calculada en base de datos sin tocar el pipeline de admisión.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::fueling::FuelType;
use crate::utils::errors::AppResult;

#[async_trait]
pub trait ReferencePriceProvider: Send + Sync {
    /// `None` significa "sin referencia": el registro no se puede marcar como anómalo.
    async fn reference_price(&self, fuel_type: FuelType) -> AppResult<Option<Decimal>>;
}

/// Precio de referencia por defecto (R$/litro)
pub fn default_reference_price(fuel_type: FuelType) -> Decimal {
    match fuel_type {
        FuelType::Gasoline => Decimal::new(500, 2),
        FuelType::Ethanol => Decimal::new(350, 2),
        FuelType::Diesel => Decimal::new(480, 2),
    }
}

/// Tabla estática de precios de referencia
#[derive(Debug, Clone)]
pub struct StaticReferencePrices {
    prices: HashMap<FuelType, Decimal>,
}

impl StaticReferencePrices {
    pub fn from_prices(prices: impl IntoIterator<Item = (FuelType, Decimal)>) -> Self {
        Self {
            prices: prices.into_iter().collect(),
        }
    }
}

impl Default for StaticReferencePrices {
    fn default() -> Self {
        Self::from_prices(
            FuelType::ALL
                .into_iter()
                .map(|fuel| (fuel, default_reference_price(fuel))),
        )
    }
}

#[async_trait]
impl ReferencePriceProvider for StaticReferencePrices {
    async fn reference_price(&self, fuel_type: FuelType) -> AppResult<Option<Decimal>> {
        Ok(self.prices.get(&fuel_type).copied())
    }
}

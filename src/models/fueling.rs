//! Modelo de Abastecimiento
//!
//! Registro de una carga de combustible. Mapea a la tabla `abastecimentos`
//! y al ENUM `tipocombustivel` del schema PostgreSQL.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Decimales con los que se persisten precio y volumen
pub const STORAGE_DECIMAL_PLACES: u32 = 2;

/// Tipo de combustible - mapea al ENUM tipocombustivel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "tipocombustivel")]
pub enum FuelType {
    #[serde(rename = "GASOLINA")]
    #[sqlx(rename = "GASOLINA")]
    Gasoline,
    #[serde(rename = "ETANOL")]
    #[sqlx(rename = "ETANOL")]
    Ethanol,
    #[serde(rename = "DIESEL")]
    #[sqlx(rename = "DIESEL")]
    Diesel,
}

impl FuelType {
    pub const ALL: [FuelType; 3] = [FuelType::Gasoline, FuelType::Ethanol, FuelType::Diesel];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "GASOLINA",
            FuelType::Ethanol => "ETANOL",
            FuelType::Diesel => "DIESEL",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abastecimiento persistido - `id` y `created_at` los asigna el almacenamiento
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct FuelingRecord {
    pub id: i32,
    #[sqlx(rename = "id_posto")]
    pub station_id: i32,
    #[sqlx(rename = "data_hora")]
    pub timestamp: DateTime<Utc>,
    #[sqlx(rename = "tipo_combustivel")]
    pub fuel_type: FuelType,
    #[sqlx(rename = "preco_por_litro")]
    pub price_per_liter: Decimal,
    #[sqlx(rename = "volume_abastecido")]
    pub volume_dispensed: Decimal,
    #[sqlx(rename = "cpf_motorista")]
    pub driver_tax_id: String,
    #[sqlx(rename = "improper_data")]
    pub is_anomalous: bool,
    pub created_at: DateTime<Utc>,
}

/// Entrada ya validada por la frontera HTTP (CPF normalizado)
#[derive(Debug, Clone, PartialEq)]
pub struct FuelingInput {
    pub station_id: i32,
    pub timestamp: DateTime<Utc>,
    pub fuel_type: FuelType,
    pub price_per_liter: Decimal,
    pub volume_dispensed: Decimal,
    pub driver_tax_id: String,
}

/// Registro listo para insertar, sin `id` ni `created_at`
#[derive(Debug, Clone, PartialEq)]
pub struct NewFuelingRecord {
    pub station_id: i32,
    pub timestamp: DateTime<Utc>,
    pub fuel_type: FuelType,
    pub price_per_liter: Decimal,
    pub volume_dispensed: Decimal,
    pub driver_tax_id: String,
    pub is_anomalous: bool,
}

impl NewFuelingRecord {
    /// Construye el registro a persistir con precio y volumen a escala de almacenamiento.
    pub fn from_input(input: FuelingInput, is_anomalous: bool) -> Self {
        Self {
            station_id: input.station_id,
            timestamp: input.timestamp,
            fuel_type: input.fuel_type,
            price_per_liter: to_storage_scale(input.price_per_liter),
            volume_dispensed: to_storage_scale(input.volume_dispensed),
            driver_tax_id: input.driver_tax_id,
            is_anomalous,
        }
    }

    pub fn into_record(self, id: i32, created_at: DateTime<Utc>) -> FuelingRecord {
        FuelingRecord {
            id,
            station_id: self.station_id,
            timestamp: self.timestamp,
            fuel_type: self.fuel_type,
            price_per_liter: self.price_per_liter,
            volume_dispensed: self.volume_dispensed,
            driver_tax_id: self.driver_tax_id,
            is_anomalous: self.is_anomalous,
            created_at,
        }
    }
}

/// Redondeo de NUMERIC(10,2): mitad lejos de cero
pub fn to_storage_scale(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(
        STORAGE_DECIMAL_PLACES,
        RoundingStrategy::MidpointAwayFromZero,
    );
    rounded.rescale(STORAGE_DECIMAL_PLACES);
    rounded
}

/// Filtros del listado paginado
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelingFilter {
    pub fuel_type: Option<FuelType>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl FuelingFilter {
    pub fn matches(&self, record: &FuelingRecord) -> bool {
        self.fuel_type.map_or(true, |fuel| record.fuel_type == fuel)
            && self.start.map_or(true, |start| record.timestamp >= start)
            && self.end.map_or(true, |end| record.timestamp <= end)
    }
}

/// Página solicitada, ambos índices empiezan en 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const MAX_SIZE: u32 = 100;

    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page: page.max(1),
            size: size.clamp(1, Self::MAX_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

/// Resultado paginado
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
}

impl<T> Page<T> {
    pub fn pages(&self) -> i64 {
        let size = i64::from(self.size.max(1));
        (self.total + size - 1) / size
    }
}

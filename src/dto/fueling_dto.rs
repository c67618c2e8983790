use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::fueling::{
    FuelType, FuelingFilter, FuelingInput, FuelingRecord, Page, PageRequest,
};
use crate::utils::cpf::normalize_cpf;
use crate::utils::validation::{
    deserialize_optional_timestamp, deserialize_timestamp, validate_cpf, validate_quantity,
};

// Request para registrar un abastecimiento (nombres de campo del cliente)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFuelingRequest {
    #[serde(rename = "id_posto")]
    #[validate(range(min = 1))]
    pub station_id: i32,

    #[serde(rename = "data_hora", deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "tipo_combustivel")]
    pub fuel_type: FuelType,

    #[serde(rename = "preco_por_litro")]
    #[validate(custom = "validate_quantity")]
    pub price_per_liter: Decimal,

    #[serde(rename = "volume_abastecido")]
    #[validate(custom = "validate_quantity")]
    pub volume_dispensed: Decimal,

    #[serde(rename = "cpf_motorista")]
    #[validate(length(min = 11, max = 14), custom = "validate_cpf")]
    pub driver_tax_id: String,
}

impl CreateFuelingRequest {
    /// Convierte a la entrada del pipeline. Llamar solo después de `validate()`.
    pub fn into_input(self) -> FuelingInput {
        FuelingInput {
            station_id: self.station_id,
            timestamp: self.timestamp,
            fuel_type: self.fuel_type,
            price_per_liter: self.price_per_liter,
            volume_dispensed: self.volume_dispensed,
            driver_tax_id: normalize_cpf(&self.driver_tax_id),
        }
    }
}

// Response de abastecimiento
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelingResponse {
    pub id: i32,
    #[serde(rename = "id_posto")]
    pub station_id: i32,
    #[serde(rename = "data_hora")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "tipo_combustivel")]
    pub fuel_type: FuelType,
    #[serde(rename = "preco_por_litro")]
    pub price_per_liter: Decimal,
    #[serde(rename = "volume_abastecido")]
    pub volume_dispensed: Decimal,
    #[serde(rename = "cpf_motorista")]
    pub driver_tax_id: String,
    #[serde(rename = "improper_data")]
    pub is_anomalous: bool,
    pub created_at: DateTime<Utc>,
}

impl From<FuelingRecord> for FuelingResponse {
    fn from(record: FuelingRecord) -> Self {
        Self {
            id: record.id,
            station_id: record.station_id,
            timestamp: record.timestamp,
            fuel_type: record.fuel_type,
            price_per_liter: record.price_per_liter,
            volume_dispensed: record.volume_dispensed,
            driver_tax_id: record.driver_tax_id,
            is_anomalous: record.is_anomalous,
            created_at: record.created_at,
        }
    }
}

// Historial de un motorista
#[derive(Debug, Serialize, Deserialize)]
pub struct DriverHistoryResponse {
    pub cpf_motorista: String,
    pub total_abastecimentos: usize,
    pub abastecimentos: Vec<FuelingResponse>,
}

// Listado paginado
#[derive(Debug, Serialize, Deserialize)]
pub struct FuelingPageResponse {
    pub items: Vec<FuelingResponse>,
    pub total: i64,
    pub page: u32,
    pub size: u32,
    pub pages: i64,
}

impl From<Page<FuelingRecord>> for FuelingPageResponse {
    fn from(page: Page<FuelingRecord>) -> Self {
        let pages = page.pages();
        Self {
            items: page.items.into_iter().map(FuelingResponse::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
            pages,
        }
    }
}

// Filtros del listado (query string)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ListFuelingQuery {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100))]
    pub size: Option<u32>,

    pub tipo_combustivel: Option<FuelType>,

    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub data_inicio: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub data_fim: Option<DateTime<Utc>>,
}

impl ListFuelingQuery {
    pub fn filter(&self) -> FuelingFilter {
        FuelingFilter {
            fuel_type: self.tipo_combustivel,
            start: self.data_inicio,
            end: self.data_fim,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.size.unwrap_or(PageRequest::DEFAULT_SIZE),
        )
    }
}

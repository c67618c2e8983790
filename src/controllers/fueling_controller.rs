use std::sync::Arc;

use tracing::debug;
use validator::Validate;

use crate::dto::fueling_dto::{
    CreateFuelingRequest, DriverHistoryResponse, FuelingPageResponse, FuelingResponse,
    ListFuelingQuery,
};
use crate::services::fueling_service::FuelingService;
use crate::utils::cpf::normalize_cpf;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::validation::validate_cpf;

pub struct FuelingController {
    service: Arc<FuelingService>,
}

impl FuelingController {
    pub fn new(service: Arc<FuelingService>) -> Self {
        Self { service }
    }

    pub async fn create(&self, request: CreateFuelingRequest) -> AppResult<FuelingResponse> {
        // Un request inválido nunca llega al almacenamiento
        request.validate()?;

        let record = self.service.admit(request.into_input()).await?;
        Ok(FuelingResponse::from(record))
    }

    pub async fn driver_history(&self, cpf: &str) -> AppResult<DriverHistoryResponse> {
        validate_cpf(cpf).map_err(|_| AppError::BadRequest(format!("CPF inválido: {}", cpf)))?;

        let cpf = normalize_cpf(cpf);
        let records = self.service.driver_history(&cpf).await?;

        if records.is_empty() {
            return Err(AppError::NotFound(format!(
                "Nenhum abastecimento encontrado para o CPF {}",
                cpf
            )));
        }

        Ok(DriverHistoryResponse {
            cpf_motorista: cpf,
            total_abastecimentos: records.len(),
            abastecimentos: records.into_iter().map(FuelingResponse::from).collect(),
        })
    }

    pub async fn list(&self, query: ListFuelingQuery) -> AppResult<FuelingPageResponse> {
        query.validate()?;

        if let (Some(start), Some(end)) = (query.data_inicio, query.data_fim) {
            if start > end {
                return Err(validation_error(
                    "data_inicio",
                    "data_inicio must not be after data_fim",
                ));
            }
        }

        let filter = query.filter();
        let page_request = query.page_request();
        debug!("📋 Listando abastecimientos: {:?}, {:?}", filter, page_request);

        let page = self.service.list(&filter, page_request).await?;
        Ok(FuelingPageResponse::from(page))
    }
}

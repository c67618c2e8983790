use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::fueling_controller::FuelingController;
use crate::dto::fueling_dto::{
    CreateFuelingRequest, DriverHistoryResponse, FuelingPageResponse, FuelingResponse,
    ListFuelingQuery,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fueling_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_fueling))
        .route("/", get(list_fuelings))
        .route("/motorista/:cpf", get(driver_history))
}

async fn create_fueling(
    State(state): State<AppState>,
    request: Result<Json<CreateFuelingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FuelingResponse>), AppError> {
    let Json(request) = request?;
    let controller = FuelingController::new(state.fueling.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_fuelings(
    State(state): State<AppState>,
    query: Result<Query<ListFuelingQuery>, QueryRejection>,
) -> Result<Json<FuelingPageResponse>, AppError> {
    let Query(query) = query?;
    let controller = FuelingController::new(state.fueling.clone());
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn driver_history(
    State(state): State<AppState>,
    cpf: Result<Path<String>, PathRejection>,
) -> Result<Json<DriverHistoryResponse>, AppError> {
    let Path(cpf) = cpf?;
    let controller = FuelingController::new(state.fueling.clone());
    let response = controller.driver_history(&cpf).await?;
    Ok(Json(response))
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::investments::{CreateInvestmentPayload, Investment, UpdateInvestmentPayload},
};

#[utoipa::path(
    post,
    path = "/api/investments",
    request_body = CreateInvestmentPayload,
    responses((status = 201, description = "Aporte registrado", body = Investment))
)]
pub async fn add_investment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateInvestmentPayload>,
) -> Result<(StatusCode, Json<Investment>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let investment = app_state.investment_service.add_investment(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(investment)))
}

#[utoipa::path(
    get,
    path = "/api/investments",
    responses((status = 200, description = "Todos os aportes", body = [Investment]))
)]
pub async fn list_investments(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Investment>>, AppError> {
    Ok(Json(app_state.investment_service.list_investments().await?))
}

#[utoipa::path(
    put,
    path = "/api/investments/{id}",
    request_body = UpdateInvestmentPayload,
    responses((status = 204, description = "Aporte atualizado"))
)]
pub async fn update_investment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvestmentPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.investment_service.update_investment(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/investments/{id}",
    responses((status = 204, description = "Aporte excluído"))
)]
pub async fn delete_investment(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.investment_service.delete_investment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

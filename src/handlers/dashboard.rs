use axum::{Json, extract::State};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::dashboard::{CashBalance, InvestmentSummary, MonthlyBucket, PartnerShare},
};

#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses((status = 200, description = "Totais de investimento do usuário logado", body = InvestmentSummary))
)]
pub async fn investment_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<InvestmentSummary>, AppError> {
    Ok(Json(app_state.dashboard_service.investment_summary(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/distribution",
    responses((status = 200, description = "Participação de cada sócio no total", body = [PartnerShare]))
)]
pub async fn distribution(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<PartnerShare>>, AppError> {
    Ok(Json(app_state.dashboard_service.distribution().await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/cash",
    responses((status = 200, description = "Saldo de caixa e saldo líquido", body = CashBalance))
)]
pub async fn cash(State(app_state): State<AppState>) -> Result<Json<CashBalance>, AppError> {
    Ok(Json(app_state.dashboard_service.cash().await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/monthly",
    responses((status = 200, description = "Série mensal para os gráficos", body = [MonthlyBucket]))
)]
pub async fn monthly(State(app_state): State<AppState>) -> Result<Json<Vec<MonthlyBucket>>, AppError> {
    Ok(Json(app_state.dashboard_service.monthly().await?))
}

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::sales::{RegisterSalePayload, Sale},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentParams {
    // Janela em dias; a tela de vendas usa 7.
    pub days: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/sales",
    request_body = RegisterSalePayload,
    responses((status = 201, description = "Venda registrada com débito de estoque", body = Sale))
)]
pub async fn register_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<RegisterSalePayload>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let sale = app_state.sales_service.register_sale(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

#[utoipa::path(
    get,
    path = "/api/sales",
    params(RecentParams),
    responses((status = 200, description = "Vendas registradas", body = [Sale]))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<Vec<Sale>>, AppError> {
    let sales = match params.days {
        Some(days) => app_state.sales_service.list_recent_sales(days).await?,
        None => app_state.sales_service.list_sales().await?,
    };
    Ok(Json(sales))
}

// Estorno: exclusão física + crédito de estoque. Idempotente.
#[utoipa::path(
    post,
    path = "/api/sales/{id}/undo",
    responses((status = 204, description = "Venda estornada (ou já estornada)"))
)]
pub async fn undo_sale(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.sales_service.undo_sale(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

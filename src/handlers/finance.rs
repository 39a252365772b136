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
    models::finance::{
        CashMovement, CreateDatedRecordPayload, CreateDebtPayload, CreateMovementPayload, Debt,
        Entry, UnplannedExpense, UpdateDatedRecordPayload, UpdateDebtPayload,
        UpdateMovementPayload,
    },
};

// =========================================================================
//  DÍVIDAS
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/debts",
    request_body = CreateDebtPayload,
    responses((status = 201, description = "Dívida cadastrada", body = Debt))
)]
pub async fn add_debt(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateDebtPayload>,
) -> Result<(StatusCode, Json<Debt>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let debt = app_state.finance_service.add_debt(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(debt)))
}

#[utoipa::path(
    get,
    path = "/api/debts",
    responses((status = 200, description = "Todas as dívidas", body = [Debt]))
)]
pub async fn list_debts(State(app_state): State<AppState>) -> Result<Json<Vec<Debt>>, AppError> {
    Ok(Json(app_state.finance_service.list_debts().await?))
}

#[utoipa::path(
    put,
    path = "/api/debts/{id}",
    request_body = UpdateDebtPayload,
    responses((status = 200, description = "Dívida atualizada", body = Debt))
)]
pub async fn update_debt(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDebtPayload>,
) -> Result<Json<Debt>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.finance_service.update_debt(id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/debts/{id}/pay",
    responses((status = 204, description = "Dívida marcada como paga"))
)]
pub async fn mark_debt_paid(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.mark_debt_paid(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/debts/{id}/unpay",
    responses((status = 204, description = "Dívida marcada como não paga"))
)]
pub async fn mark_debt_unpaid(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.mark_debt_unpaid(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/debts/{id}",
    responses((status = 204, description = "Dívida excluída"))
)]
pub async fn delete_debt(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_debt(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  MOVIMENTAÇÕES DE CAIXA
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/cash-movements",
    request_body = CreateMovementPayload,
    responses((status = 201, description = "Movimentação registrada", body = CashMovement))
)]
pub async fn add_movement(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateMovementPayload>,
) -> Result<(StatusCode, Json<CashMovement>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movement = app_state.finance_service.add_movement(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

#[utoipa::path(
    get,
    path = "/api/cash-movements",
    responses((status = 200, description = "Movimentações do caixa", body = [CashMovement]))
)]
pub async fn list_movements(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<CashMovement>>, AppError> {
    Ok(Json(app_state.finance_service.list_movements().await?))
}

#[utoipa::path(
    put,
    path = "/api/cash-movements/{id}",
    request_body = UpdateMovementPayload,
    responses((status = 204, description = "Movimentação atualizada"))
)]
pub async fn update_movement(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovementPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.finance_service.update_movement(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/cash-movements/{id}",
    responses((status = 204, description = "Movimentação excluída"))
)]
pub async fn delete_movement(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_movement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  ENTRADAS
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = CreateDatedRecordPayload,
    responses((status = 201, description = "Entrada registrada", body = Entry))
)]
pub async fn add_entry(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateDatedRecordPayload>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entry = app_state.finance_service.add_entry(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/entries",
    responses((status = 200, description = "Todas as entradas", body = [Entry]))
)]
pub async fn list_entries(State(app_state): State<AppState>) -> Result<Json<Vec<Entry>>, AppError> {
    Ok(Json(app_state.finance_service.list_entries().await?))
}

#[utoipa::path(
    put,
    path = "/api/entries/{id}",
    request_body = UpdateDatedRecordPayload,
    responses((status = 204, description = "Entrada atualizada"))
)]
pub async fn update_entry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDatedRecordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.finance_service.update_entry(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    responses((status = 204, description = "Entrada excluída"))
)]
pub async fn delete_entry(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =========================================================================
//  GASTOS NÃO PLANEJADOS
// =========================================================================

#[utoipa::path(
    post,
    path = "/api/unplanned-expenses",
    request_body = CreateDatedRecordPayload,
    responses((status = 201, description = "Gasto registrado", body = UnplannedExpense))
)]
pub async fn add_expense(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateDatedRecordPayload>,
) -> Result<(StatusCode, Json<UnplannedExpense>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let expense = app_state.finance_service.add_expense(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/unplanned-expenses",
    responses((status = 200, description = "Todos os gastos não planejados", body = [UnplannedExpense]))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<UnplannedExpense>>, AppError> {
    Ok(Json(app_state.finance_service.list_expenses().await?))
}

#[utoipa::path(
    put,
    path = "/api/unplanned-expenses/{id}",
    request_body = UpdateDatedRecordPayload,
    responses((status = 204, description = "Gasto atualizado"))
)]
pub async fn update_expense(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDatedRecordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state.finance_service.update_expense(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/unplanned-expenses/{id}",
    responses((status = 204, description = "Gasto excluído"))
)]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.finance_service.delete_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

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
    models::{
        auth::{UpdateUserPayload, User},
        finance::{CloseMonthPayload, MonthlySummary},
    },
};

// Todas as rotas deste módulo passam pelo admin_guard antes de chegar aqui.

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses((status = 200, description = "Todos os usuários", body = [User]))
)]
pub async fn list_users(State(app_state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(app_state.auth_service.list_users().await?))
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    request_body = UpdateUserPayload,
    responses((status = 200, description = "Usuário atualizado", body = User))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.auth_service.update_user(id, payload).await?))
}

// Exclui o usuário e, em cascata, os investimentos, sessões de tempo e
// dívidas dele, tudo na mesma transação.
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    responses((status = 204, description = "Usuário e registros associados excluídos"))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.auth_service.delete_user_cascade(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/summaries",
    request_body = CloseMonthPayload,
    responses((status = 200, description = "Mês fechado", body = MonthlySummary))
)]
pub async fn close_month(
    State(app_state): State<AppState>,
    Json(payload): Json<CloseMonthPayload>,
) -> Result<Json<MonthlySummary>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    Ok(Json(app_state.finance_service.close_month(payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/summaries",
    responses((status = 200, description = "Fechamentos mensais gravados", body = [MonthlySummary]))
)]
pub async fn list_summaries(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<MonthlySummary>>, AppError> {
    Ok(Json(app_state.finance_service.list_summaries().await?))
}

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
    models::timesheet::{
        StartSessionPayload, StopSessionPayload, TimeSession, UpdateSessionPayload,
    },
};

#[utoipa::path(
    post,
    path = "/api/sessions/start",
    request_body = StartSessionPayload,
    responses((status = 201, description = "Sessão de trabalho aberta", body = TimeSession))
)]
pub async fn start_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<StartSessionPayload>,
) -> Result<(StatusCode, Json<TimeSession>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let session = app_state.timesheet_service.start_session(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/stop",
    request_body = StopSessionPayload,
    responses((status = 200, description = "Sessão encerrada; tempo investido vira aporte", body = TimeSession))
)]
pub async fn stop_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StopSessionPayload>,
) -> Result<Json<TimeSession>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let session = app_state.timesheet_service.stop_session(id, payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/sessions/current",
    responses((status = 200, description = "Sessão aberta do usuário, ou null", body = TimeSession))
)]
pub async fn current_session(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Option<TimeSession>>, AppError> {
    Ok(Json(app_state.timesheet_service.current_session(&user).await?))
}

#[utoipa::path(
    get,
    path = "/api/sessions",
    responses((status = 200, description = "Sessões do usuário", body = [TimeSession]))
)]
pub async fn list_sessions(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<TimeSession>>, AppError> {
    Ok(Json(app_state.timesheet_service.list_sessions(&user).await?))
}

// Edição retroativa; o aporte derivado é reconciliado na mesma transação.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}",
    request_body = UpdateSessionPayload,
    responses((status = 200, description = "Sessão editada e investimento reconciliado", body = TimeSession))
)]
pub async fn update_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSessionPayload>,
) -> Result<Json<TimeSession>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let session = app_state.timesheet_service.update_session(id, payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    responses((status = 204, description = "Sessão e aporte derivado excluídos"))
)]
pub async fn delete_session(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.timesheet_service.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

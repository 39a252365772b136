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
    models::catalog::{CatalogValue, CreateProductPayload, Product, UpdateProductPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    // Seq exato ou prefixo da descrição.
    pub term: String,
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto cadastrado", body = Product))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProductPayload>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.catalog_service.create_product(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses((status = 200, description = "Todos os produtos", body = [Product]))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.catalog_service.list_products().await?))
}

#[utoipa::path(
    get,
    path = "/api/products/search",
    params(SearchParams),
    responses((status = 200, description = "Produtos encontrados", body = [Product]))
)]
pub async fn search_products(
    State(app_state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(app_state.catalog_service.search_products(&params.term).await?))
}

#[utoipa::path(
    get,
    path = "/api/products/total-value",
    responses((status = 200, description = "Soma dos preços de venda cadastrados", body = CatalogValue))
)]
pub async fn total_value(State(app_state): State<AppState>) -> Result<Json<CatalogValue>, AppError> {
    let total_value = app_state.catalog_service.total_catalog_value().await?;
    Ok(Json(CatalogValue { total_value }))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    request_body = UpdateProductPayload,
    responses((status = 200, description = "Produto atualizado", body = Product))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .catalog_service
        .update_product(&user, id, payload)
        .await?;
    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    responses((status = 204, description = "Produto excluído"))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.catalog_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

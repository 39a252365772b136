use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Uma venda registrada contra um produto. Os campos de preço são um
// "snapshot" da economia da venda no momento da transação: se o produto
// mudar de preço depois, o histórico não muda junto.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,

    #[schema(example = 1)]
    pub seq: i64,

    pub product_id: Uuid,

    // Descrição do produto no momento da venda.
    pub description: String,

    #[schema(example = 15.0)]
    pub unit_price: f64,

    #[schema(example = 0.0)]
    pub discount_percent: f64,

    #[schema(example = 15.0)]
    pub final_unit_price: f64,

    pub quantity: i64,

    #[schema(example = 75.0)]
    pub total_price: f64,

    pub sold_at: DateTime<Utc>,
    pub sold_by: Uuid,

    // Persistido em toda venda; o estorno não passa por aqui (é exclusão
    // física + crédito de estoque).
    pub canceled: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSalePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i64,

    #[validate(range(min = 0.0, message = "O preço unitário não pode ser negativo."))]
    pub unit_price: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "O desconto deve estar entre 0 e 100."))]
    #[serde(default)]
    pub discount_percent: f64,
}

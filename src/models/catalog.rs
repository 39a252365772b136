use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um item vendável do estoque. `sale_price` é derivado de custo + margem no
// momento da escrita e nunca recalculado na leitura.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,

    // Número sequencial denso, visível ao usuário (distinto do id).
    #[schema(example = 12)]
    pub seq: i64,

    #[schema(example = "Óculos de sol modelo X")]
    pub description: String,

    #[schema(example = 10.0)]
    pub cost_price: f64,

    // Em % (ex: 50 para 50%).
    #[schema(example = 50.0)]
    pub profit_margin: f64,

    #[schema(example = 15.0)]
    pub sale_price: f64,

    pub quantity: i64,

    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(range(min = 0.0, message = "O preço de compra não pode ser negativo."))]
    pub cost_price: f64,

    #[validate(range(min = 0.0, message = "A margem de lucro não pode ser negativa."))]
    pub profit_margin: f64,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[serde(default)]
    pub quantity: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "A descrição não pode ficar vazia."))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "O preço de compra não pode ser negativo."))]
    pub cost_price: Option<f64>,

    #[validate(range(min = 0.0, message = "A margem de lucro não pode ser negativa."))]
    pub profit_margin: Option<f64>,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogValue {
    // Soma dos preços de venda unitários cadastrados (não multiplica pelo
    // estoque; é o mesmo número que a tela de produtos sempre exibiu).
    pub total_value: f64,
}

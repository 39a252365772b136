use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um aporte de capital (ou de tempo convertido em capital) de um sócio.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: Uuid,

    #[schema(example = "Compra de mostruário")]
    pub description: String,

    #[schema(example = 500.0)]
    pub amount: f64,

    pub user_id: Uuid,
    pub user_name: String,
    pub date: DateTime<Utc>,

    // true quando o aporte foi derivado de uma sessão de tempo.
    pub is_time_investment: bool,

    // Referência de volta à sessão que originou o aporte, se houver.
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestmentPayload {
    #[validate(length(min = 1, message = "A descrição não pode ficar vazia."))]
    pub description: Option<String>,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: Option<f64>,
}

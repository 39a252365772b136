use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DebtKind {
    Unico, // Gasto único
    Fixo,  // Gasto fixo mensal
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Entrada,
    Saida,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementSource {
    Manual,
    Sale,
    DebtPayment,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub id: Uuid,

    #[schema(example = "Aluguel da loja")]
    pub description: String,

    #[schema(example = "1200.00")]
    pub amount: f64,

    pub kind: DebtKind,

    #[schema(value_type = String, format = Date, example = "2026-09-05")]
    pub due_date: NaiveDate,

    // Apenas para gastos fixos: por quantos meses se repete.
    pub duration_months: Option<i64>,

    pub paid: bool,

    pub user_id: Uuid,
    pub user_name: String,
}

impl Debt {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.paid && self.due_date < today
    }
}

// Lançamento manual do caixa. Saldo = soma(entrada) - soma(saida).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashMovement {
    pub id: Uuid,
    pub kind: MovementKind,

    #[schema(example = "250.00")]
    pub amount: f64,

    pub description: String,
    pub date: DateTime<Utc>,

    pub user_id: Uuid,
    pub user_name: String,

    pub source: MovementSource,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub user_id: Uuid,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnplannedExpense {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,

    pub user_id: Uuid,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
}

// Fechamento mensal do caixa, gravado pelo painel administrativo.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i64,
    pub month: i64,
    pub total_in: f64,
    pub total_out: f64,
    pub balance: f64,
    pub closed_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebtPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: f64,

    pub kind: DebtKind,

    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,

    #[validate(range(min = 1, message = "A duração deve ser de ao menos um mês."))]
    pub duration_months: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDebtPayload {
    #[validate(length(min = 1, message = "A descrição não pode ficar vazia."))]
    pub description: Option<String>,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: Option<f64>,

    pub kind: Option<DebtKind>,

    #[schema(value_type = String, format = Date)]
    pub due_date: Option<NaiveDate>,

    #[validate(range(min = 1, message = "A duração deve ser de ao menos um mês."))]
    pub duration_months: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementPayload {
    pub kind: MovementKind,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: f64,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
}

// Edição em linha: apenas descrição e valor, como na tela de caixa.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovementPayload {
    #[validate(length(min = 1, message = "A descrição não pode ficar vazia."))]
    pub description: Option<String>,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatedRecordPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: f64,

    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDatedRecordPayload {
    #[validate(length(min = 1, message = "A descrição não pode ficar vazia."))]
    pub description: Option<String>,

    #[validate(range(min = 0.01, message = "O valor deve ser maior que zero."))]
    pub amount: Option<f64>,

    #[schema(value_type = String, format = Date)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseMonthPayload {
    #[validate(range(min = 2000, max = 2200, message = "Ano fora do intervalo esperado."))]
    pub year: i64,

    #[validate(range(min = 1, max = 12, message = "Mês deve estar entre 1 e 12."))]
    pub month: i64,
}

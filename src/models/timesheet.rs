use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um intervalo de trabalho cronometrado. O tempo pausado é acumulado pelo
// cliente e só chega ao servidor no stop (ou numa edição explícita).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeSession {
    pub id: Uuid,
    pub user_id: Uuid,

    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,

    // Milissegundos acumulados em pausa.
    #[schema(example = 0)]
    pub paused_ms: i64,

    #[schema(example = 25.0)]
    pub hourly_rate: f64,

    pub is_paid: bool,
    pub is_completed: bool,
}

impl TimeSession {
    // Horas efetivamente trabalhadas: (fim - início - pausas) / 3600000.
    pub fn worked_hours(&self) -> Option<f64> {
        let end = self.end_time?;
        let elapsed_ms = (end - self.start_time).num_milliseconds() - self.paused_ms;
        Some(elapsed_ms as f64 / 3_600_000.0)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionPayload {
    #[validate(range(min = 0.01, message = "O valor/hora deve ser maior que zero."))]
    pub hourly_rate: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StopSessionPayload {
    // true = tempo pago em dinheiro; false = tempo vira investimento.
    pub is_paid: bool,

    // Total de pausas acumulado no cliente até o stop.
    #[validate(range(min = 0, message = "O tempo pausado não pode ser negativo."))]
    #[serde(default)]
    pub paused_ms: i64,
}

// Edição retroativa: recalcula horas/valor e reconcilia o investimento
// derivado dentro da mesma transação.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionPayload {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,

    #[validate(range(min = 0.01, message = "O valor/hora deve ser maior que zero."))]
    pub hourly_rate: Option<f64>,

    pub is_paid: Option<bool>,

    #[validate(range(min = 0, message = "O tempo pausado não pode ser negativo."))]
    pub paused_ms: Option<i64>,
}

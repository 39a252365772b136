use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InvestmentRepository,
    models::{
        auth::User,
        investments::{CreateInvestmentPayload, Investment, UpdateInvestmentPayload},
    },
};

#[derive(Clone)]
pub struct InvestmentService {
    investment_repo: InvestmentRepository,
    pool: SqlitePool,
}

impl InvestmentService {
    pub fn new(investment_repo: InvestmentRepository, pool: SqlitePool) -> Self {
        Self {
            investment_repo,
            pool,
        }
    }

    /// Aporte direto de capital, estampado com o sócio logado.
    pub async fn add_investment(
        &self,
        user: &User,
        payload: CreateInvestmentPayload,
    ) -> Result<Investment, AppError> {
        let investment = Investment {
            id: Uuid::new_v4(),
            description: payload.description,
            amount: payload.amount,
            user_id: user.id,
            user_name: user.username.clone(),
            date: Utc::now(),
            is_time_investment: false,
            session_id: None,
        };

        self.investment_repo.insert(&self.pool, &investment).await?;
        Ok(investment)
    }

    pub async fn update_investment(
        &self,
        id: Uuid,
        payload: UpdateInvestmentPayload,
    ) -> Result<(), AppError> {
        let current = self
            .investment_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::RecordNotFound("investimento"))?;

        let description = payload.description.unwrap_or(current.description);
        let amount = payload.amount.unwrap_or(current.amount);

        self.investment_repo
            .update(&self.pool, id, &description, amount)
            .await
    }

    pub async fn delete_investment(&self, id: Uuid) -> Result<(), AppError> {
        self.investment_repo.delete(&self.pool, id).await
    }

    pub async fn list_investments(&self) -> Result<Vec<Investment>, AppError> {
        self.investment_repo.list_all().await
    }
}

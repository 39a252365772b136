use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{common::error::AppError, models::investments::Investment};

#[derive(Clone)]
pub struct InvestmentRepository {
    pool: SqlitePool,
}

impl InvestmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn list_all(&self) -> Result<Vec<Investment>, AppError> {
        let investments =
            sqlx::query_as::<_, Investment>("SELECT * FROM investments ORDER BY date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(investments)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Investment>, AppError> {
        let investment = sqlx::query_as::<_, Investment>("SELECT * FROM investments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(investment)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Investment>, AppError> {
        let investments = sqlx::query_as::<_, Investment>(
            "SELECT * FROM investments WHERE user_id = ? ORDER BY date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(investments)
    }

    // ---
    // Escritas (transacionais)
    // ---

    /// O investimento derivado de uma sessão, se existir. O invariante de
    /// sincronização garante no máximo um por sessão.
    pub async fn find_by_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
    ) -> Result<Option<Investment>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let investment =
            sqlx::query_as::<_, Investment>("SELECT * FROM investments WHERE session_id = ?")
                .bind(session_id)
                .fetch_optional(executor)
                .await?;
        Ok(investment)
    }

    pub async fn insert<'e, E>(&self, executor: E, investment: &Investment) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO investments (id, description, amount, user_id, user_name,
                                     date, is_time_investment, session_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(investment.id)
        .bind(&investment.description)
        .bind(investment.amount)
        .bind(investment.user_id)
        .bind(&investment.user_name)
        .bind(investment.date)
        .bind(investment.is_time_investment)
        .bind(investment.session_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Atualização em lugar: descrição e valor (reconciliação de sessão e
    /// edição manual usam o mesmo caminho).
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        description: &str,
        amount: f64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE investments SET description = ?, amount = ? WHERE id = ?")
            .bind(description)
            .bind(amount)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("investimento"));
        }
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM investments WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("investimento"));
        }
        Ok(())
    }

    /// Remove o investimento derivado de uma sessão (0 ou 1 linha).
    pub async fn delete_by_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM investments WHERE session_id = ?")
            .bind(session_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remoção em cascata usada pela exclusão de usuário no painel admin.
    pub async fn delete_by_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM investments WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{common::error::AppError, models::timesheet::TimeSession};

#[derive(Clone)]
pub struct TimesheetRepository {
    pool: SqlitePool,
}

impl TimesheetRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn list_all(&self) -> Result<Vec<TimeSession>, AppError> {
        let sessions =
            sqlx::query_as::<_, TimeSession>("SELECT * FROM time_sessions ORDER BY start_time DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(sessions)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<TimeSession>, AppError> {
        let sessions = sqlx::query_as::<_, TimeSession>(
            "SELECT * FROM time_sessions WHERE user_id = ? ORDER BY start_time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    /// A sessão aberta do usuário, se houver (no máximo uma por vez).
    pub async fn find_open_for_user(&self, user_id: Uuid) -> Result<Option<TimeSession>, AppError> {
        let session = sqlx::query_as::<_, TimeSession>(
            "SELECT * FROM time_sessions WHERE user_id = ? AND is_completed = FALSE",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    // ---
    // Escritas (transacionais)
    // ---

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<TimeSession>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let session = sqlx::query_as::<_, TimeSession>("SELECT * FROM time_sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(session)
    }

    pub async fn insert<'e, E>(&self, executor: E, session: &TimeSession) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO time_sessions (id, user_id, start_time, end_time, paused_ms,
                                       hourly_rate, is_paid, is_completed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.paused_ms)
        .bind(session.hourly_rate)
        .bind(session.is_paid)
        .bind(session.is_completed)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Regrava a sessão inteira (stop e edições retroativas).
    pub async fn update<'e, E>(&self, executor: E, session: &TimeSession) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE time_sessions
            SET start_time = ?, end_time = ?, paused_ms = ?, hourly_rate = ?,
                is_paid = ?, is_completed = ?
            WHERE id = ?
            "#,
        )
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.paused_ms)
        .bind(session.hourly_rate)
        .bind(session.is_paid)
        .bind(session.is_completed)
        .bind(session.id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::SessionNotFound);
        }
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM time_sessions WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::SessionNotFound);
        }
        Ok(())
    }

    /// Remoção em cascata usada pela exclusão de usuário no painel admin.
    pub async fn delete_by_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM time_sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

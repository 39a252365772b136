use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::finance::{CashMovement, Debt, Entry, MonthlySummary, UnplannedExpense},
};

#[derive(Clone)]
pub struct FinanceRepository {
    pool: SqlitePool,
}

impl FinanceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  DÍVIDAS
    // =========================================================================

    pub async fn list_debts(&self) -> Result<Vec<Debt>, AppError> {
        let debts = sqlx::query_as::<_, Debt>("SELECT * FROM debts ORDER BY due_date ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(debts)
    }

    pub async fn find_debt(&self, id: Uuid) -> Result<Option<Debt>, AppError> {
        let debt = sqlx::query_as::<_, Debt>("SELECT * FROM debts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(debt)
    }

    pub async fn insert_debt<'e, E>(&self, executor: E, debt: &Debt) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO debts (id, description, amount, kind, due_date,
                               duration_months, paid, user_id, user_name)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(debt.id)
        .bind(&debt.description)
        .bind(debt.amount)
        .bind(debt.kind)
        .bind(debt.due_date)
        .bind(debt.duration_months)
        .bind(debt.paid)
        .bind(debt.user_id)
        .bind(&debt.user_name)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn update_debt<'e, E>(&self, executor: E, debt: &Debt) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE debts
            SET description = ?, amount = ?, kind = ?, due_date = ?, duration_months = ?
            WHERE id = ?
            "#,
        )
        .bind(&debt.description)
        .bind(debt.amount)
        .bind(debt.kind)
        .bind(debt.due_date)
        .bind(debt.duration_months)
        .bind(debt.id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("dívida"));
        }
        Ok(())
    }

    /// Alterna a flag de pagamento, independente do restante do registro.
    pub async fn set_debt_paid<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        paid: bool,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE debts SET paid = ? WHERE id = ?")
            .bind(paid)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("dívida"));
        }
        Ok(())
    }

    pub async fn delete_debt<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM debts WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("dívida"));
        }
        Ok(())
    }

    pub async fn delete_debts_by_user<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM debts WHERE user_id = ?")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  MOVIMENTAÇÕES DE CAIXA
    // =========================================================================

    pub async fn list_movements(&self) -> Result<Vec<CashMovement>, AppError> {
        let movements =
            sqlx::query_as::<_, CashMovement>("SELECT * FROM cash_movements ORDER BY date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(movements)
    }

    pub async fn find_movement(&self, id: Uuid) -> Result<Option<CashMovement>, AppError> {
        let movement = sqlx::query_as::<_, CashMovement>("SELECT * FROM cash_movements WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(movement)
    }

    pub async fn insert_movement<'e, E>(
        &self,
        executor: E,
        movement: &CashMovement,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO cash_movements (id, kind, amount, description, date,
                                        user_id, user_name, source)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(movement.id)
        .bind(movement.kind)
        .bind(movement.amount)
        .bind(&movement.description)
        .bind(movement.date)
        .bind(movement.user_id)
        .bind(&movement.user_name)
        .bind(movement.source)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn update_movement<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        description: &str,
        amount: f64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result =
            sqlx::query("UPDATE cash_movements SET description = ?, amount = ? WHERE id = ?")
                .bind(description)
                .bind(amount)
                .bind(id)
                .execute(executor)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("movimentação"));
        }
        Ok(())
    }

    pub async fn delete_movement<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM cash_movements WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("movimentação"));
        }
        Ok(())
    }

    // =========================================================================
    //  ENTRADAS
    // =========================================================================

    pub async fn list_entries(&self) -> Result<Vec<Entry>, AppError> {
        let entries = sqlx::query_as::<_, Entry>("SELECT * FROM entries ORDER BY date ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    pub async fn insert_entry<'e, E>(&self, executor: E, entry: &Entry) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO entries (id, description, amount, date, user_id, user_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id)
        .bind(&entry.description)
        .bind(entry.amount)
        .bind(entry.date)
        .bind(entry.user_id)
        .bind(&entry.user_name)
        .bind(entry.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn update_entry<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        description: &str,
        amount: f64,
        date: chrono::NaiveDate,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result =
            sqlx::query("UPDATE entries SET description = ?, amount = ?, date = ? WHERE id = ?")
                .bind(description)
                .bind(amount)
                .bind(date)
                .bind(id)
                .execute(executor)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("entrada"));
        }
        Ok(())
    }

    pub async fn delete_entry<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("entrada"));
        }
        Ok(())
    }

    // =========================================================================
    //  GASTOS NÃO PLANEJADOS
    // =========================================================================

    pub async fn list_expenses(&self) -> Result<Vec<UnplannedExpense>, AppError> {
        let expenses = sqlx::query_as::<_, UnplannedExpense>(
            "SELECT * FROM unplanned_expenses ORDER BY date ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(expenses)
    }

    pub async fn insert_expense<'e, E>(
        &self,
        executor: E,
        expense: &UnplannedExpense,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO unplanned_expenses (id, description, amount, date,
                                            user_id, user_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(expense.id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.user_id)
        .bind(&expense.user_name)
        .bind(expense.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn update_expense<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        description: &str,
        amount: f64,
        date: chrono::NaiveDate,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE unplanned_expenses SET description = ?, amount = ?, date = ? WHERE id = ?",
        )
        .bind(description)
        .bind(amount)
        .bind(date)
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("gasto não planejado"));
        }
        Ok(())
    }

    pub async fn delete_expense<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM unplanned_expenses WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::RecordNotFound("gasto não planejado"));
        }
        Ok(())
    }

    // =========================================================================
    //  FECHAMENTOS MENSAIS
    // =========================================================================

    pub async fn list_summaries(&self) -> Result<Vec<MonthlySummary>, AppError> {
        let summaries = sqlx::query_as::<_, MonthlySummary>(
            "SELECT * FROM monthly_summaries ORDER BY year DESC, month DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(summaries)
    }

    /// Regrava o fechamento do mês se já existir (refechar é permitido).
    pub async fn upsert_summary<'e, E>(
        &self,
        executor: E,
        summary: &MonthlySummary,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO monthly_summaries (year, month, total_in, total_out, balance, closed_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (year, month) DO UPDATE SET
                total_in = excluded.total_in,
                total_out = excluded.total_out,
                balance = excluded.balance,
                closed_at = excluded.closed_at
            "#,
        )
        .bind(summary.year)
        .bind(summary.month)
        .bind(summary.total_in)
        .bind(summary.total_out)
        .bind(summary.balance)
        .bind(summary.closed_at)
        .execute(executor)
        .await?;
        Ok(())
    }
}

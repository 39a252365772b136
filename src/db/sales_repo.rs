use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{common::error::AppError, models::sales::Sale};

#[derive(Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn list_all(&self) -> Result<Vec<Sale>, AppError> {
        let sales = sqlx::query_as::<_, Sale>("SELECT * FROM vendas ORDER BY seq DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    /// Vendas a partir de um instante (a tela mostra os últimos 7 dias).
    pub async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Sale>, AppError> {
        let sales =
            sqlx::query_as::<_, Sale>("SELECT * FROM vendas WHERE sold_at >= ? ORDER BY seq DESC")
                .bind(since)
                .fetch_all(&self.pool)
                .await?;
        Ok(sales)
    }

    // ---
    // Escritas (transacionais)
    // ---

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM vendas WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn insert<'e, E>(&self, executor: E, sale: &Sale) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO vendas (id, seq, product_id, description, unit_price,
                                discount_percent, final_unit_price, quantity,
                                total_price, sold_at, sold_by, canceled)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sale.id)
        .bind(sale.seq)
        .bind(sale.product_id)
        .bind(&sale.description)
        .bind(sale.unit_price)
        .bind(sale.discount_percent)
        .bind(sale.final_unit_price)
        .bind(sale.quantity)
        .bind(sale.total_price)
        .bind(sale.sold_at)
        .bind(sale.sold_by)
        .bind(sale.canceled)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Exclusão física do registro de venda (estorno).
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM vendas WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

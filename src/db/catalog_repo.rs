use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::Product};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn list_all(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY seq ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_by_seq(&self, seq: i64) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE seq = ?")
            .bind(seq)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    /// Busca por prefixo de descrição (equivalente ao range `>= term` /
    /// `<= term + ` da tela de vendas).
    pub async fn search_by_description(&self, term: &str) -> Result<Vec<Product>, AppError> {
        let pattern = format!("{}%", term.replace('%', "\\%").replace('_', "\\_"));
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE description LIKE ? ESCAPE '\\' ORDER BY seq ASC",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    /// Soma dos preços de venda cadastrados (valor exibido em "Total em Estoque").
    pub async fn sum_sale_price(&self) -> Result<f64, AppError> {
        let total: Option<f64> = sqlx::query_scalar("SELECT SUM(sale_price) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.unwrap_or(0.0))
    }

    // ---
    // Escritas (transacionais)
    // ---

    /// Leitura dentro de transação: o estado do produto visto aqui é o que a
    /// venda/estorno vai debitar ou creditar.
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn insert<'e, E>(&self, executor: E, product: &Product) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO products (id, seq, description, cost_price, profit_margin,
                                  sale_price, quantity, created_at, created_by,
                                  updated_at, updated_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id)
        .bind(product.seq)
        .bind(&product.description)
        .bind(product.cost_price)
        .bind(product.profit_margin)
        .bind(product.sale_price)
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.created_by)
        .bind(product.updated_at)
        .bind(product.updated_by)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Regrava os campos editáveis + preço derivado (o serviço já fez o merge
    /// e o recálculo).
    pub async fn update<'e, E>(&self, executor: E, product: &Product) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET description = ?, cost_price = ?, profit_margin = ?, sale_price = ?,
                quantity = ?, updated_at = ?, updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.description)
        .bind(product.cost_price)
        .bind(product.profit_margin)
        .bind(product.sale_price)
        .bind(product.quantity)
        .bind(product.updated_at)
        .bind(product.updated_by)
        .bind(product.id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    /// Grava o saldo de estoque calculado pela transação de venda.
    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE products SET quantity = ? WHERE id = ?")
            .bind(quantity)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    /// Crédito compensatório do estorno: quantity += delta.
    pub async fn credit_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE products SET quantity = quantity + ? WHERE id = ?")
            .bind(delta)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }
}

use sqlx::{SqliteConnection, SqlitePool};

use crate::common::error::AppError;

// Domínios de sequência usados pela aplicação.
pub const DOMAIN_PRODUCTS: &str = "products";
pub const DOMAIN_VENDAS: &str = "vendas";

#[derive(Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Consome o próximo número da sequência de um domínio.
    ///
    /// Lê-modifica-escreve o documento do contador (ausente = 0) e devolve o
    /// novo valor. Deve rodar SEMPRE dentro da transação que grava o registro
    /// numerado: é o isolamento da transação que serializa consumidores
    /// concorrentos, este repositório não tem lock próprio.
    pub async fn next_seq(
        &self,
        conn: &mut SqliteConnection,
        domain: &str,
    ) -> Result<i64, AppError> {
        let last_seq: Option<i64> =
            sqlx::query_scalar("SELECT last_seq FROM counters WHERE domain = ?")
                .bind(domain)
                .fetch_optional(&mut *conn)
                .await?;

        let new_seq = last_seq.unwrap_or(0) + 1;

        sqlx::query(
            r#"
            INSERT INTO counters (domain, last_seq)
            VALUES (?, ?)
            ON CONFLICT (domain) DO UPDATE SET last_seq = excluded.last_seq
            "#,
        )
        .bind(domain)
        .bind(new_seq)
        .execute(&mut *conn)
        .await?;

        Ok(new_seq)
    }

    /// Último valor emitido (0 se o domínio nunca foi usado). Leitura simples,
    /// fora de transação.
    pub async fn current_seq(&self, domain: &str) -> Result<i64, AppError> {
        let last_seq: Option<i64> =
            sqlx::query_scalar("SELECT last_seq FROM counters WHERE domain = ?")
                .bind(domain)
                .fetch_optional(&self.pool)
                .await?;
        Ok(last_seq.unwrap_or(0))
    }
}

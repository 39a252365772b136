// Utilitários de banco compartilhados pelos testes: um pool SQLite em
// memória com as migrações embutidas já aplicadas.

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

// Uma única conexão: bancos `:memory:` são por conexão, e com uma conexão o
// pool serializa as transações concorrentes dos testes.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("falha ao abrir banco em memória");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("falha ao rodar migrações no banco de teste");

    pool
}

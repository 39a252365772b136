use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CounterRepository, counter_repo::DOMAIN_PRODUCTS},
    models::{
        auth::User,
        catalog::{CreateProductPayload, Product, UpdateProductPayload},
    },
};

// Preço de venda derivado: custo * (1 + margem/100). Recalculado em toda
// escrita, nunca na leitura.
pub fn sale_price(cost_price: f64, profit_margin: f64) -> f64 {
    cost_price * (1.0 + profit_margin / 100.0)
}

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    counter_repo: CounterRepository,
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(
        catalog_repo: CatalogRepository,
        counter_repo: CounterRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            catalog_repo,
            counter_repo,
            pool,
        }
    }

    /// Cria o produto junto com o incremento do contador, na mesma transação:
    /// ou o produto entra numerado, ou o contador não anda.
    pub async fn create_product(
        &self,
        user: &User,
        payload: CreateProductPayload,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let seq = self.counter_repo.next_seq(&mut tx, DOMAIN_PRODUCTS).await?;

        let product = Product {
            id: Uuid::new_v4(),
            seq,
            description: payload.description,
            cost_price: payload.cost_price,
            profit_margin: payload.profit_margin,
            sale_price: sale_price(payload.cost_price, payload.profit_margin),
            quantity: payload.quantity,
            created_at: Utc::now(),
            created_by: user.id,
            updated_at: None,
            updated_by: None,
        };

        self.catalog_repo.insert(&mut *tx, &product).await?;

        tx.commit().await?;

        tracing::info!("📦 Produto #{} cadastrado: {}", product.seq, product.description);
        Ok(product)
    }

    /// Edição de produto: faz o merge dos campos enviados e recalcula o
    /// preço de venda a partir do custo/margem resultantes.
    pub async fn update_product(
        &self,
        user: &User,
        id: Uuid,
        payload: UpdateProductPayload,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut product = self
            .catalog_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        if let Some(description) = payload.description {
            product.description = description;
        }
        if let Some(cost_price) = payload.cost_price {
            product.cost_price = cost_price;
        }
        if let Some(profit_margin) = payload.profit_margin {
            product.profit_margin = profit_margin;
        }
        if let Some(quantity) = payload.quantity {
            product.quantity = quantity;
        }

        product.sale_price = sale_price(product.cost_price, product.profit_margin);
        product.updated_at = Some(Utc::now());
        product.updated_by = Some(user.id);

        self.catalog_repo.update(&mut *tx, &product).await?;

        tx.commit().await?;
        Ok(product)
    }

    /// Exclusão física, sem lápide.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        self.catalog_repo.delete(&self.pool, id).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.list_all().await
    }

    /// Busca: primeiro tenta o seq exato; senão, prefixo de descrição.
    pub async fn search_products(&self, term: &str) -> Result<Vec<Product>, AppError> {
        if let Ok(seq) = term.trim().parse::<i64>() {
            if let Some(product) = self.catalog_repo.find_by_seq(seq).await? {
                return Ok(vec![product]);
            }
        }
        self.catalog_repo.search_by_description(term.trim()).await
    }

    pub async fn total_catalog_value(&self) -> Result<f64, AppError> {
        self.catalog_repo.sum_sale_price().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::db_utils::test_pool;

    fn service(pool: SqlitePool) -> CatalogService {
        CatalogService::new(
            CatalogRepository::new(pool.clone()),
            CounterRepository::new(pool.clone()),
            pool,
        )
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "sócio".into(),
            email: "socio@example.com".into(),
            first_name: "Sócio".into(),
            last_name: "Teste".into(),
            password_hash: String::new(),
            is_admin: false,
            role: Some("partner".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(description: &str, cost: f64, margin: f64, quantity: i64) -> CreateProductPayload {
        CreateProductPayload {
            description: description.into(),
            cost_price: cost,
            profit_margin: margin,
            quantity,
        }
    }

    #[test]
    fn sale_price_is_cost_plus_margin() {
        assert_eq!(sale_price(10.0, 50.0), 15.0);
        assert_eq!(sale_price(100.0, 0.0), 100.0);
        assert_eq!(sale_price(0.0, 30.0), 0.0);
    }

    #[tokio::test]
    async fn create_derives_sale_price_and_numbers_sequentially() {
        let pool = test_pool().await;
        let svc = service(pool);
        let user = test_user();

        let p1 = svc
            .create_product(&user, payload("Armação A", 10.0, 50.0, 20))
            .await
            .unwrap();
        let p2 = svc
            .create_product(&user, payload("Armação B", 20.0, 25.0, 5))
            .await
            .unwrap();

        assert_eq!(p1.seq, 1);
        assert_eq!(p2.seq, 2);
        assert_eq!(p1.sale_price, 15.0);
        assert_eq!(p2.sale_price, 25.0);
    }

    #[tokio::test]
    async fn concurrent_creates_yield_distinct_dense_seqs() {
        let pool = test_pool().await;
        let svc = service(pool);
        let user = test_user();

        let mut handles = Vec::new();
        for i in 0..10 {
            let svc = svc.clone();
            let user = user.clone();
            handles.push(tokio::spawn(async move {
                svc.create_product(&user, payload(&format!("Produto {i}"), 1.0, 10.0, 1))
                    .await
                    .unwrap()
                    .seq
            }));
        }

        let mut seqs = Vec::new();
        for handle in handles {
            seqs.push(handle.await.unwrap());
        }
        seqs.sort_unstable();

        assert_eq!(seqs, (1..=10).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn counter_only_advances_with_committed_products() {
        let pool = test_pool().await;
        let counter_repo = CounterRepository::new(pool.clone());
        let svc = service(pool);
        let user = test_user();

        assert_eq!(counter_repo.current_seq(DOMAIN_PRODUCTS).await.unwrap(), 0);

        svc.create_product(&user, payload("Cordão", 3.0, 10.0, 2))
            .await
            .unwrap();

        assert_eq!(counter_repo.current_seq(DOMAIN_PRODUCTS).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_recomputes_sale_price_from_merged_fields() {
        let pool = test_pool().await;
        let svc = service(pool);
        let user = test_user();

        let product = svc
            .create_product(&user, payload("Lente", 10.0, 50.0, 3))
            .await
            .unwrap();

        let updated = svc
            .update_product(
                &user,
                product.id,
                UpdateProductPayload {
                    description: None,
                    cost_price: Some(20.0),
                    profit_margin: None,
                    quantity: None,
                },
            )
            .await
            .unwrap();

        // Margem antiga (50%) sobre o custo novo.
        assert_eq!(updated.sale_price, 30.0);
        assert_eq!(updated.seq, product.seq);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn search_prefers_exact_seq_match() {
        let pool = test_pool().await;
        let svc = service(pool);
        let user = test_user();

        svc.create_product(&user, payload("12 graus", 5.0, 10.0, 1))
            .await
            .unwrap();
        let second = svc
            .create_product(&user, payload("Estojo", 2.0, 10.0, 1))
            .await
            .unwrap();

        let by_seq = svc.search_products("2").await.unwrap();
        assert_eq!(by_seq.len(), 1);
        assert_eq!(by_seq[0].id, second.id);

        let by_description = svc.search_products("Est").await.unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, second.id);
    }

    #[tokio::test]
    async fn total_value_sums_unit_sale_prices() {
        let pool = test_pool().await;
        let svc = service(pool);
        let user = test_user();

        svc.create_product(&user, payload("A", 10.0, 50.0, 99))
            .await
            .unwrap();
        svc.create_product(&user, payload("B", 20.0, 0.0, 1))
            .await
            .unwrap();

        // Soma dos preços unitários, sem multiplicar pelo estoque.
        assert_eq!(svc.total_catalog_value().await.unwrap(), 35.0);
    }
}

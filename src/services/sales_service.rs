use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CatalogRepository, CounterRepository, SalesRepository, counter_repo::DOMAIN_VENDAS,
    },
    models::{
        auth::User,
        catalog::Product,
        sales::{RegisterSalePayload, Sale},
    },
};

// Preço unitário com desconto aplicado.
pub fn final_unit_price(unit_price: f64, discount_percent: f64) -> f64 {
    unit_price * (1.0 - discount_percent / 100.0)
}

#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    catalog_repo: CatalogRepository,
    counter_repo: CounterRepository,
    pool: SqlitePool,
}

impl SalesService {
    pub fn new(
        sales_repo: SalesRepository,
        catalog_repo: CatalogRepository,
        counter_repo: CounterRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            sales_repo,
            catalog_repo,
            counter_repo,
            pool,
        }
    }

    /// Registra uma venda. Tudo em uma transação: numeração, gravação da
    /// venda e débito do estoque entram juntos ou não entram.
    ///
    /// O estoque NÃO tem checagem de piso aqui; o saldo pode ficar negativo
    /// se dois caixas venderem a mesma última unidade. A tela limita a
    /// quantidade ao estoque visível, o livro registra o que foi vendido.
    pub async fn register_sale(
        &self,
        user: &User,
        payload: RegisterSalePayload,
    ) -> Result<Sale, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Estado atual do produto dentro da transação.
        let product = self
            .catalog_repo
            .find_by_id(&mut *tx, payload.product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        // 2. Próximo número de venda.
        let seq = self.counter_repo.next_seq(&mut tx, DOMAIN_VENDAS).await?;

        // 3. Economia da venda, congelada no registro.
        let final_price = final_unit_price(payload.unit_price, payload.discount_percent);
        let sale = Sale {
            id: Uuid::new_v4(),
            seq,
            product_id: product.id,
            description: product.description.clone(),
            unit_price: payload.unit_price,
            discount_percent: payload.discount_percent,
            final_unit_price: final_price,
            quantity: payload.quantity,
            total_price: final_price * payload.quantity as f64,
            sold_at: Utc::now(),
            sold_by: user.id,
            canceled: false,
        };

        // 4. Grava a venda e 5. debita o estoque.
        self.sales_repo.insert(&mut *tx, &sale).await?;
        self.catalog_repo
            .set_quantity(&mut *tx, product.id, product.quantity - payload.quantity)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🛒 Venda #{} registrada: {} x{} = {:.2}",
            sale.seq,
            sale.description,
            sale.quantity,
            sale.total_price
        );
        Ok(sale)
    }

    /// Estorna uma venda: exclusão física do registro + crédito compensatório
    /// do estoque, em uma transação.
    ///
    /// Venda inexistente é tratada como já estornada (no-op), então chamar
    /// duas vezes não credita em dobro. Se o produto foi excluído no meio
    /// tempo, um esqueleto do produto é recriado carregando a quantidade e o
    /// preço da venda, com custo/margem zerados (restauração de melhor
    /// esforço; o histórico de custo se perde).
    pub async fn undo_sale(&self, user: &User, sale_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(sale) = self.sales_repo.find_by_id(&mut *tx, sale_id).await? else {
            return Ok(());
        };

        self.sales_repo.delete(&mut *tx, sale.id).await?;

        match self.catalog_repo.find_by_id(&mut *tx, sale.product_id).await? {
            Some(product) => {
                self.catalog_repo
                    .credit_quantity(&mut *tx, product.id, sale.quantity)
                    .await?;
            }
            None => {
                let stub = Product {
                    id: sale.product_id,
                    seq: 0, // fora da sequência viva, que começa em 1
                    description: sale.description.clone(),
                    cost_price: 0.0,
                    profit_margin: 0.0,
                    sale_price: sale.unit_price,
                    quantity: sale.quantity,
                    created_at: Utc::now(),
                    created_by: user.id,
                    updated_at: None,
                    updated_by: None,
                };
                self.catalog_repo.insert(&mut *tx, &stub).await?;
                tracing::warn!(
                    "⚠️ Estorno da venda #{} recriou o produto excluído {}",
                    sale.seq,
                    sale.product_id
                );
            }
        }

        tx.commit().await?;

        tracing::info!("↩️ Venda #{} estornada.", sale.seq);
        Ok(())
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        self.sales_repo.list_all().await
    }

    /// Vendas dos últimos `days` dias (a tela usa 7).
    pub async fn list_recent_sales(&self, days: i64) -> Result<Vec<Sale>, AppError> {
        let since = Utc::now() - chrono::Duration::days(days);
        self.sales_repo.list_since(since).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::db_utils::test_pool,
        models::catalog::CreateProductPayload,
        services::catalog_service::CatalogService,
    };

    struct Fixture {
        sales: SalesService,
        catalog: CatalogService,
        user: User,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let catalog_repo = CatalogRepository::new(pool.clone());
        let counter_repo = CounterRepository::new(pool.clone());
        Fixture {
            sales: SalesService::new(
                SalesRepository::new(pool.clone()),
                catalog_repo.clone(),
                counter_repo.clone(),
                pool.clone(),
            ),
            catalog: CatalogService::new(catalog_repo, counter_repo, pool),
            user: User {
                id: Uuid::new_v4(),
                username: "caixa".into(),
                email: "caixa@example.com".into(),
                first_name: "Caixa".into(),
                last_name: "Um".into(),
                password_hash: String::new(),
                is_admin: false,
                role: Some("partner".into()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        }
    }

    async fn seed_product(fx: &Fixture, cost: f64, margin: f64, quantity: i64) -> Product {
        fx.catalog
            .create_product(
                &fx.user,
                CreateProductPayload {
                    description: "Óculos de sol".into(),
                    cost_price: cost,
                    profit_margin: margin,
                    quantity,
                },
            )
            .await
            .unwrap()
    }

    fn sale_payload(product_id: Uuid, quantity: i64, unit_price: f64, discount: f64) -> RegisterSalePayload {
        RegisterSalePayload {
            product_id,
            quantity,
            unit_price,
            discount_percent: discount,
        }
    }

    #[test]
    fn discount_applies_over_unit_price() {
        assert_eq!(final_unit_price(100.0, 0.0), 100.0);
        assert_eq!(final_unit_price(100.0, 25.0), 75.0);
        assert_eq!(final_unit_price(100.0, 100.0), 0.0);
    }

    #[tokio::test]
    async fn sale_debits_stock_and_freezes_prices() {
        let fx = fixture().await;
        let product = seed_product(&fx, 10.0, 50.0, 20).await;

        let sale = fx
            .sales
            .register_sale(&fx.user, sale_payload(product.id, 5, product.sale_price, 50.0))
            .await
            .unwrap();

        assert_eq!(sale.seq, 1);
        assert_eq!(sale.final_unit_price, 7.5);
        assert_eq!(sale.total_price, 37.5);
        assert!(!sale.canceled);

        let after = fx.catalog.list_products().await.unwrap();
        assert_eq!(after[0].quantity, 15);
    }

    #[tokio::test]
    async fn sale_on_missing_product_is_rejected_without_side_effects() {
        let fx = fixture().await;

        let err = fx
            .sales
            .register_sale(&fx.user, sale_payload(Uuid::new_v4(), 1, 10.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProductNotFound));

        // A transação não deixou rastro: nenhuma venda e contador parado.
        assert!(fx.sales.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn undo_round_trips_stock_and_removes_the_sale() {
        let fx = fixture().await;
        let product = seed_product(&fx, 10.0, 50.0, 20).await;

        let sale = fx
            .sales
            .register_sale(&fx.user, sale_payload(product.id, 5, 15.0, 0.0))
            .await
            .unwrap();

        fx.sales.undo_sale(&fx.user, sale.id).await.unwrap();

        let products = fx.catalog.list_products().await.unwrap();
        assert_eq!(products[0].quantity, 20);
        assert!(fx.sales.list_sales().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn undo_twice_does_not_double_credit() {
        let fx = fixture().await;
        let product = seed_product(&fx, 10.0, 50.0, 20).await;

        let sale = fx
            .sales
            .register_sale(&fx.user, sale_payload(product.id, 5, 15.0, 0.0))
            .await
            .unwrap();

        fx.sales.undo_sale(&fx.user, sale.id).await.unwrap();
        // Segunda chamada: venda já não existe, vira no-op silencioso.
        fx.sales.undo_sale(&fx.user, sale.id).await.unwrap();

        let products = fx.catalog.list_products().await.unwrap();
        assert_eq!(products[0].quantity, 20);
    }

    #[tokio::test]
    async fn undo_after_product_deletion_recreates_a_stub() {
        let fx = fixture().await;
        let product = seed_product(&fx, 10.0, 50.0, 20).await;

        let sale = fx
            .sales
            .register_sale(&fx.user, sale_payload(product.id, 3, 15.0, 0.0))
            .await
            .unwrap();

        fx.catalog.delete_product(product.id).await.unwrap();
        fx.sales.undo_sale(&fx.user, sale.id).await.unwrap();

        let products = fx.catalog.list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        let stub = &products[0];
        assert_eq!(stub.id, product.id);
        assert_eq!(stub.seq, 0);
        assert_eq!(stub.quantity, 3);
        assert_eq!(stub.cost_price, 0.0);
        assert_eq!(stub.sale_price, 15.0);
    }

    #[tokio::test]
    async fn sales_are_numbered_independently_from_products() {
        let fx = fixture().await;
        let product = seed_product(&fx, 10.0, 50.0, 20).await;

        let s1 = fx
            .sales
            .register_sale(&fx.user, sale_payload(product.id, 1, 15.0, 0.0))
            .await
            .unwrap();
        let s2 = fx
            .sales
            .register_sale(&fx.user, sale_payload(product.id, 1, 15.0, 0.0))
            .await
            .unwrap();

        // Sequência de vendas começa do 1 mesmo com produtos já numerados.
        assert_eq!((s1.seq, s2.seq), (1, 2));
    }

    // Cenário completo da operação de loja: cadastra, vende, estorna.
    #[tokio::test]
    async fn end_to_end_sale_lifecycle() {
        let fx = fixture().await;
        let product = seed_product(&fx, 10.0, 50.0, 20).await;
        assert_eq!(product.sale_price, 15.0);

        let sale = fx
            .sales
            .register_sale(&fx.user, sale_payload(product.id, 5, product.sale_price, 0.0))
            .await
            .unwrap();
        assert_eq!(sale.total_price, 75.0);
        assert_eq!(sale.seq, 1);
        assert_eq!(fx.catalog.list_products().await.unwrap()[0].quantity, 15);

        fx.sales.undo_sale(&fx.user, sale.id).await.unwrap();
        assert_eq!(fx.catalog.list_products().await.unwrap()[0].quantity, 20);
        assert!(fx.sales.list_sales().await.unwrap().is_empty());
    }
}

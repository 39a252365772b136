use std::{env, str::FromStr, time::Duration};

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{
    db::{
        CatalogRepository, CounterRepository, FinanceRepository, InvestmentRepository,
        SalesRepository, TimesheetRepository, UserRepository,
    },
    services::{
        auth::AuthService, catalog_service::CatalogService, dashboard_service::DashboardService,
        finance_service::FinanceService, investment_service::InvestmentService,
        sales_service::SalesService, timesheet_service::TimesheetService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub sales_service: SalesService,
    pub timesheet_service: TimesheetService,
    pub investment_service: InvestmentService,
    pub finance_service: FinanceService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://avila.db".to_string());
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
        let db_pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let counter_repo = CounterRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let timesheet_repo = TimesheetRepository::new(db_pool.clone());
        let investment_repo = InvestmentRepository::new(db_pool.clone());
        let finance_repo = FinanceRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            investment_repo.clone(),
            timesheet_repo.clone(),
            finance_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let catalog_service = CatalogService::new(
            catalog_repo.clone(),
            counter_repo.clone(),
            db_pool.clone(),
        );
        let sales_service = SalesService::new(
            sales_repo,
            catalog_repo,
            counter_repo,
            db_pool.clone(),
        );
        let timesheet_service = TimesheetService::new(
            timesheet_repo,
            investment_repo.clone(),
            user_repo,
            db_pool.clone(),
        );
        let investment_service = InvestmentService::new(investment_repo.clone(), db_pool.clone());
        let finance_service = FinanceService::new(finance_repo.clone(), db_pool.clone());
        let dashboard_service = DashboardService::new(investment_repo, finance_repo);

        Ok(Self {
            db_pool,
            auth_service,
            catalog_service,
            sales_service,
            timesheet_service,
            investment_service,
            finance_service,
            dashboard_service,
        })
    }
}

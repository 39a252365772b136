use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante o usuário administrador padrão na primeira subida.
    app_state
        .auth_service
        .ensure_admin()
        .await
        .expect("Falha ao garantir o usuário administrador.");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route("/search", get(handlers::catalog::search_products))
        .route("/total-value", get(handlers::catalog::total_value))
        .route(
            "/{id}",
            axum::routing::put(handlers::catalog::update_product)
                .delete(handlers::catalog::delete_product),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let sale_routes = Router::new()
        .route(
            "/",
            post(handlers::sales::register_sale).get(handlers::sales::list_sales),
        )
        .route("/{id}/undo", post(handlers::sales::undo_sale))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let session_routes = Router::new()
        .route("/", get(handlers::timesheet::list_sessions))
        .route("/start", post(handlers::timesheet::start_session))
        .route("/current", get(handlers::timesheet::current_session))
        .route("/{id}/stop", post(handlers::timesheet::stop_session))
        .route(
            "/{id}",
            axum::routing::put(handlers::timesheet::update_session)
                .delete(handlers::timesheet::delete_session),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let investment_routes = Router::new()
        .route(
            "/",
            post(handlers::investments::add_investment).get(handlers::investments::list_investments),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::investments::update_investment)
                .delete(handlers::investments::delete_investment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let debt_routes = Router::new()
        .route(
            "/",
            post(handlers::finance::add_debt).get(handlers::finance::list_debts),
        )
        .route("/{id}/pay", post(handlers::finance::mark_debt_paid))
        .route("/{id}/unpay", post(handlers::finance::mark_debt_unpaid))
        .route(
            "/{id}",
            axum::routing::put(handlers::finance::update_debt)
                .delete(handlers::finance::delete_debt),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let cash_routes = Router::new()
        .route(
            "/",
            post(handlers::finance::add_movement).get(handlers::finance::list_movements),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::finance::update_movement)
                .delete(handlers::finance::delete_movement),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let entry_routes = Router::new()
        .route(
            "/",
            post(handlers::finance::add_entry).get(handlers::finance::list_entries),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::finance::update_entry)
                .delete(handlers::finance::delete_entry),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let expense_routes = Router::new()
        .route(
            "/",
            post(handlers::finance::add_expense).get(handlers::finance::list_expenses),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::finance::update_expense)
                .delete(handlers::finance::delete_expense),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::investment_summary))
        .route("/distribution", get(handlers::dashboard::distribution))
        .route("/cash", get(handlers::dashboard::cash))
        .route("/monthly", get(handlers::dashboard::monthly))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas administrativas: auth_guard roda primeiro, admin_guard depois.
    let admin_routes = Router::new()
        .route("/users", get(handlers::admin::list_users))
        .route(
            "/users/{id}",
            axum::routing::put(handlers::admin::update_user).delete(handlers::admin::delete_user),
        )
        .route(
            "/summaries",
            post(handlers::admin::close_month).get(handlers::admin::list_summaries),
        )
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/products", product_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/investments", investment_routes)
        .nest("/api/debts", debt_routes)
        .nest("/api/cash-movements", cash_routes)
        .nest("/api/entries", entry_routes)
        .nest("/api/unplanned-expenses", expense_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/admin", admin_routes)
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAuth),
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Produtos ---
        handlers::catalog::create_product,
        handlers::catalog::list_products,
        handlers::catalog::search_products,
        handlers::catalog::total_value,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,

        // --- Vendas ---
        handlers::sales::register_sale,
        handlers::sales::list_sales,
        handlers::sales::undo_sale,

        // --- Sessões de tempo ---
        handlers::timesheet::start_session,
        handlers::timesheet::stop_session,
        handlers::timesheet::current_session,
        handlers::timesheet::list_sessions,
        handlers::timesheet::update_session,
        handlers::timesheet::delete_session,

        // --- Investimentos ---
        handlers::investments::add_investment,
        handlers::investments::list_investments,
        handlers::investments::update_investment,
        handlers::investments::delete_investment,

        // --- Finanças ---
        handlers::finance::add_debt,
        handlers::finance::list_debts,
        handlers::finance::update_debt,
        handlers::finance::mark_debt_paid,
        handlers::finance::mark_debt_unpaid,
        handlers::finance::delete_debt,
        handlers::finance::add_movement,
        handlers::finance::list_movements,
        handlers::finance::update_movement,
        handlers::finance::delete_movement,
        handlers::finance::add_entry,
        handlers::finance::list_entries,
        handlers::finance::update_entry,
        handlers::finance::delete_entry,
        handlers::finance::add_expense,
        handlers::finance::list_expenses,
        handlers::finance::update_expense,
        handlers::finance::delete_expense,

        // --- Dashboard ---
        handlers::dashboard::investment_summary,
        handlers::dashboard::distribution,
        handlers::dashboard::cash,
        handlers::dashboard::monthly,

        // --- Admin ---
        handlers::admin::list_users,
        handlers::admin::update_user,
        handlers::admin::delete_user,
        handlers::admin::close_month,
        handlers::admin::list_summaries,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::AuthResponse,

            // --- Produtos ---
            models::catalog::Product,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,
            models::catalog::CatalogValue,

            // --- Vendas ---
            models::sales::Sale,
            models::sales::RegisterSalePayload,

            // --- Sessões de tempo ---
            models::timesheet::TimeSession,
            models::timesheet::StartSessionPayload,
            models::timesheet::StopSessionPayload,
            models::timesheet::UpdateSessionPayload,

            // --- Investimentos ---
            models::investments::Investment,
            models::investments::CreateInvestmentPayload,
            models::investments::UpdateInvestmentPayload,

            // --- Finanças ---
            models::finance::DebtKind,
            models::finance::MovementKind,
            models::finance::MovementSource,
            models::finance::Debt,
            models::finance::CashMovement,
            models::finance::Entry,
            models::finance::UnplannedExpense,
            models::finance::MonthlySummary,
            models::finance::CreateDebtPayload,
            models::finance::UpdateDebtPayload,
            models::finance::CreateMovementPayload,
            models::finance::UpdateMovementPayload,
            models::finance::CreateDatedRecordPayload,
            models::finance::UpdateDatedRecordPayload,
            models::finance::CloseMonthPayload,

            // --- Dashboard ---
            models::dashboard::InvestmentSummary,
            models::dashboard::PartnerShare,
            models::dashboard::CashBalance,
            models::dashboard::MonthlyBucket,
        )
    ),
    info(
        title = "Óticas Ávila - Backend",
        description = "API de gestão da sociedade: estoque, vendas, horas e caixa."
    )
)]
pub struct ApiDoc;

// Adiciona o esquema Bearer/JWT na documentação.
struct BearerAuth;

impl utoipa::Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod counter_repo;
pub use counter_repo::CounterRepository;
pub mod finance_repo;
pub use finance_repo::FinanceRepository;
pub mod investment_repo;
pub use investment_repo::InvestmentRepository;
pub mod sales_repo;
pub use sales_repo::SalesRepository;
pub mod timesheet_repo;
pub use timesheet_repo::TimesheetRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

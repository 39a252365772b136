pub mod auth;
pub mod catalog_service;
pub mod dashboard_service;
pub mod finance_service;
pub mod investment_service;
pub mod sales_service;
pub mod timesheet_service;

use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FinanceRepository, InvestmentRepository},
    models::{
        auth::User,
        dashboard::{CashBalance, InvestmentSummary, MonthlyBucket, PartnerShare},
        finance::{CashMovement, Debt, Entry, MovementKind, UnplannedExpense},
        investments::Investment,
    },
};

// ---
// Funções puras de agregação. Operam sobre o snapshot das coleções em
// memória, sem efeito colateral; podem ser recalculadas a qualquer momento.
// ---

pub fn total_investment(investments: &[Investment]) -> f64 {
    investments.iter().map(|i| i.amount).sum()
}

pub fn user_contribution(investments: &[Investment], user_id: Uuid) -> f64 {
    investments
        .iter()
        .filter(|i| i.user_id == user_id)
        .map(|i| i.amount)
        .sum()
}

pub fn user_percentage(investments: &[Investment], user_id: Uuid) -> f64 {
    let total = total_investment(investments);
    if total > 0.0 {
        user_contribution(investments, user_id) / total * 100.0
    } else {
        0.0
    }
}

/// Participação de cada sócio no total aportado, na ordem do primeiro
/// aporte de cada um.
pub fn per_user_distribution(investments: &[Investment]) -> Vec<PartnerShare> {
    let total = total_investment(investments);
    let mut shares: Vec<(Uuid, PartnerShare)> = Vec::new();

    for investment in investments {
        match shares.iter_mut().find(|(id, _)| *id == investment.user_id) {
            Some((_, share)) => share.amount += investment.amount,
            None => shares.push((
                investment.user_id,
                PartnerShare {
                    name: investment.user_name.clone(),
                    amount: investment.amount,
                    percentage: 0.0,
                },
            )),
        }
    }

    shares
        .into_iter()
        .map(|(_, mut share)| {
            share.percentage = if total > 0.0 {
                share.amount / total * 100.0
            } else {
                0.0
            };
            share
        })
        .collect()
}

/// Saldo = soma(entrada) - soma(saida); a variante líquida ainda desconta
/// dívidas pagas e gastos não planejados (as telas de controle alternam
/// entre as duas).
pub fn cash_balance(
    movements: &[CashMovement],
    paid_debts: &[Debt],
    expenses: &[UnplannedExpense],
) -> CashBalance {
    let total_in: f64 = movements
        .iter()
        .filter(|m| m.kind == MovementKind::Entrada)
        .map(|m| m.amount)
        .sum();
    let total_out: f64 = movements
        .iter()
        .filter(|m| m.kind == MovementKind::Saida)
        .map(|m| m.amount)
        .sum();

    let balance = total_in - total_out;
    let debts_paid: f64 = paid_debts.iter().filter(|d| d.paid).map(|d| d.amount).sum();
    let unplanned: f64 = expenses.iter().map(|e| e.amount).sum();

    CashBalance {
        total_in,
        total_out,
        balance,
        net_balance: balance - debts_paid - unplanned,
    }
}

/// Particiona entradas, gastos e dívidas por mês-calendário para a série de
/// barras. O intervalo vai do registro mais antigo até hoje, esticado além
/// se houver dívidas com vencimento futuro.
pub fn monthly_buckets(
    entries: &[Entry],
    expenses: &[UnplannedExpense],
    debts: &[Debt],
    today: NaiveDate,
) -> Vec<MonthlyBucket> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    dates.extend(entries.iter().map(|e| e.date));
    dates.extend(expenses.iter().map(|e| e.date));
    dates.extend(debts.iter().map(|d| d.due_date));

    let Some(first) = dates.iter().min().copied() else {
        return Vec::new();
    };
    let last = dates.iter().max().copied().unwrap_or(today).max(today);

    let mut buckets = Vec::new();
    let (mut year, mut month) = (first.year(), first.month());
    loop {
        let in_bucket =
            |date: NaiveDate| date.year() == year && date.month() == month;

        buckets.push(MonthlyBucket {
            year,
            month,
            entries_total: entries.iter().filter(|e| in_bucket(e.date)).map(|e| e.amount).sum(),
            expenses_total: expenses.iter().filter(|e| in_bucket(e.date)).map(|e| e.amount).sum(),
            debts_total: debts.iter().filter(|d| in_bucket(d.due_date)).map(|d| d.amount).sum(),
        });

        if year == last.year() && month == last.month() {
            break;
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    buckets
}

// ---
// O serviço apenas tira o snapshot das coleções e delega às funções puras.
// ---

#[derive(Clone)]
pub struct DashboardService {
    investment_repo: InvestmentRepository,
    finance_repo: FinanceRepository,
}

impl DashboardService {
    pub fn new(investment_repo: InvestmentRepository, finance_repo: FinanceRepository) -> Self {
        Self {
            investment_repo,
            finance_repo,
        }
    }

    pub async fn investment_summary(&self, user: &User) -> Result<InvestmentSummary, AppError> {
        let investments = self.investment_repo.list_all().await?;
        Ok(InvestmentSummary {
            total_investment: total_investment(&investments),
            user_contribution: user_contribution(&investments, user.id),
            user_percentage: user_percentage(&investments, user.id),
        })
    }

    pub async fn distribution(&self) -> Result<Vec<PartnerShare>, AppError> {
        let investments = self.investment_repo.list_all().await?;
        Ok(per_user_distribution(&investments))
    }

    pub async fn cash(&self) -> Result<CashBalance, AppError> {
        let movements = self.finance_repo.list_movements().await?;
        let debts = self.finance_repo.list_debts().await?;
        let expenses = self.finance_repo.list_expenses().await?;
        Ok(cash_balance(&movements, &debts, &expenses))
    }

    pub async fn monthly(&self) -> Result<Vec<MonthlyBucket>, AppError> {
        let entries = self.finance_repo.list_entries().await?;
        let expenses = self.finance_repo.list_expenses().await?;
        let debts = self.finance_repo.list_debts().await?;
        Ok(monthly_buckets(
            &entries,
            &expenses,
            &debts,
            Utc::now().date_naive(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::models::finance::{DebtKind, MovementSource};

    fn investment(user_id: Uuid, name: &str, amount: f64) -> Investment {
        Investment {
            id: Uuid::new_v4(),
            description: "aporte".into(),
            amount,
            user_id,
            user_name: name.into(),
            date: Utc::now(),
            is_time_investment: false,
            session_id: None,
        }
    }

    fn movement(kind: MovementKind, amount: f64) -> CashMovement {
        CashMovement {
            id: Uuid::new_v4(),
            kind,
            amount,
            description: "ajuste".into(),
            date: Utc::now(),
            user_id: Uuid::new_v4(),
            user_name: "Sócio".into(),
            source: MovementSource::Manual,
        }
    }

    fn debt(amount: f64, due: NaiveDate, paid: bool) -> Debt {
        Debt {
            id: Uuid::new_v4(),
            description: "conta".into(),
            amount,
            kind: DebtKind::Unico,
            due_date: due,
            duration_months: None,
            paid,
            user_id: Uuid::new_v4(),
            user_name: "Sócio".into(),
        }
    }

    fn entry(amount: f64, date: NaiveDate) -> Entry {
        Entry {
            id: Uuid::new_v4(),
            description: "entrada".into(),
            amount,
            date,
            user_id: Uuid::new_v4(),
            user_name: "Sócio".into(),
            created_at: Utc::now(),
        }
    }

    fn expense(amount: f64, date: NaiveDate) -> UnplannedExpense {
        UnplannedExpense {
            id: Uuid::new_v4(),
            description: "gasto".into(),
            amount,
            date,
            user_id: Uuid::new_v4(),
            user_name: "Sócio".into(),
            created_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn totals_and_percentages() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let investments = vec![investment(a, "Ana", 100.0), investment(b, "Bia", 300.0)];

        assert_eq!(total_investment(&investments), 400.0);
        assert_eq!(user_contribution(&investments, a), 100.0);
        assert_eq!(user_percentage(&investments, a), 25.0);
        assert_eq!(user_percentage(&investments, b), 75.0);
    }

    #[test]
    fn percentage_is_zero_without_investments() {
        assert_eq!(user_percentage(&[], Uuid::new_v4()), 0.0);
    }

    #[test]
    fn distribution_groups_by_user() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let investments = vec![
            investment(a, "Ana", 100.0),
            investment(b, "Bia", 200.0),
            investment(a, "Ana", 100.0),
        ];

        let shares = per_user_distribution(&investments);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].name, "Ana");
        assert_eq!(shares[0].amount, 200.0);
        assert_eq!(shares[0].percentage, 50.0);
        assert_eq!(shares[1].amount, 200.0);
    }

    #[test]
    fn balance_and_net_balance() {
        let movements = vec![
            movement(MovementKind::Entrada, 1000.0),
            movement(MovementKind::Entrada, 500.0),
            movement(MovementKind::Saida, 300.0),
        ];
        let debts = vec![
            debt(100.0, date(2026, 1, 10), true),
            debt(999.0, date(2026, 1, 20), false), // não paga: não desconta
        ];
        let expenses = vec![expense(50.0, date(2026, 1, 15))];

        let balance = cash_balance(&movements, &debts, &expenses);
        assert_eq!(balance.total_in, 1500.0);
        assert_eq!(balance.total_out, 300.0);
        assert_eq!(balance.balance, 1200.0);
        assert_eq!(balance.net_balance, 1050.0);
    }

    #[test]
    fn buckets_span_from_earliest_record_to_today() {
        let entries = vec![entry(100.0, date(2026, 1, 5))];
        let expenses = vec![expense(30.0, date(2026, 2, 10))];
        let today = date(2026, 3, 15);

        let buckets = monthly_buckets(&entries, &expenses, &[], today);
        assert_eq!(buckets.len(), 3); // jan, fev, mar
        assert_eq!(buckets[0].entries_total, 100.0);
        assert_eq!(buckets[1].expenses_total, 30.0);
        assert_eq!(buckets[2].entries_total, 0.0);
    }

    #[test]
    fn future_debts_stretch_the_range() {
        let entries = vec![entry(100.0, date(2026, 3, 1))];
        let debts = vec![debt(40.0, date(2026, 6, 1), false)];
        let today = date(2026, 3, 15);

        let buckets = monthly_buckets(&entries, &[], &debts, today);
        assert_eq!(buckets.len(), 4); // mar..jun
        assert_eq!(buckets[3].debts_total, 40.0);
    }

    #[test]
    fn bucket_range_crosses_year_boundary() {
        let entries = vec![entry(10.0, date(2025, 11, 20))];
        let today = date(2026, 1, 10);

        let buckets = monthly_buckets(&entries, &[], &[], today);
        assert_eq!(buckets.len(), 3); // nov, dez, jan
        assert_eq!((buckets[2].year, buckets[2].month), (2026, 1));
    }

    #[test]
    fn no_records_no_buckets() {
        assert!(monthly_buckets(&[], &[], &[], date(2026, 3, 15)).is_empty());
    }
}

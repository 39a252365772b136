use chrono::{Datelike, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FinanceRepository,
    models::{
        auth::User,
        finance::{
            CashMovement, CloseMonthPayload, CreateDatedRecordPayload, CreateDebtPayload,
            CreateMovementPayload, Debt, Entry, MonthlySummary, MovementKind, MovementSource,
            UnplannedExpense, UpdateDatedRecordPayload, UpdateDebtPayload, UpdateMovementPayload,
        },
    },
};

#[derive(Clone)]
pub struct FinanceService {
    finance_repo: FinanceRepository,
    pool: SqlitePool,
}

impl FinanceService {
    pub fn new(finance_repo: FinanceRepository, pool: SqlitePool) -> Self {
        Self { finance_repo, pool }
    }

    // =========================================================================
    //  DÍVIDAS
    // =========================================================================

    pub async fn add_debt(&self, user: &User, payload: CreateDebtPayload) -> Result<Debt, AppError> {
        let debt = Debt {
            id: Uuid::new_v4(),
            description: payload.description,
            amount: payload.amount,
            kind: payload.kind,
            due_date: payload.due_date,
            duration_months: payload.duration_months,
            paid: false,
            user_id: user.id,
            user_name: user.username.clone(),
        };

        self.finance_repo.insert_debt(&self.pool, &debt).await?;
        Ok(debt)
    }

    pub async fn update_debt(&self, id: Uuid, payload: UpdateDebtPayload) -> Result<Debt, AppError> {
        let mut debt = self
            .finance_repo
            .find_debt(id)
            .await?
            .ok_or(AppError::RecordNotFound("dívida"))?;

        if let Some(description) = payload.description {
            debt.description = description;
        }
        if let Some(amount) = payload.amount {
            debt.amount = amount;
        }
        if let Some(kind) = payload.kind {
            debt.kind = kind;
        }
        if let Some(due_date) = payload.due_date {
            debt.due_date = due_date;
        }
        if payload.duration_months.is_some() {
            debt.duration_months = payload.duration_months;
        }

        self.finance_repo.update_debt(&self.pool, &debt).await?;
        Ok(debt)
    }

    pub async fn mark_debt_paid(&self, id: Uuid) -> Result<(), AppError> {
        self.finance_repo.set_debt_paid(&self.pool, id, true).await
    }

    pub async fn mark_debt_unpaid(&self, id: Uuid) -> Result<(), AppError> {
        self.finance_repo.set_debt_paid(&self.pool, id, false).await
    }

    pub async fn delete_debt(&self, id: Uuid) -> Result<(), AppError> {
        self.finance_repo.delete_debt(&self.pool, id).await
    }

    pub async fn list_debts(&self) -> Result<Vec<Debt>, AppError> {
        self.finance_repo.list_debts().await
    }

    // =========================================================================
    //  MOVIMENTAÇÕES DE CAIXA
    // =========================================================================

    pub async fn add_movement(
        &self,
        user: &User,
        payload: CreateMovementPayload,
    ) -> Result<CashMovement, AppError> {
        let movement = CashMovement {
            id: Uuid::new_v4(),
            kind: payload.kind,
            amount: payload.amount,
            description: payload.description,
            date: Utc::now(),
            user_id: user.id,
            user_name: user.first_name.clone(),
            source: MovementSource::Manual,
        };

        self.finance_repo.insert_movement(&self.pool, &movement).await?;
        Ok(movement)
    }

    pub async fn update_movement(
        &self,
        id: Uuid,
        payload: UpdateMovementPayload,
    ) -> Result<(), AppError> {
        let current = self
            .finance_repo
            .find_movement(id)
            .await?
            .ok_or(AppError::RecordNotFound("movimentação"))?;

        let description = payload.description.unwrap_or(current.description);
        let amount = payload.amount.unwrap_or(current.amount);

        self.finance_repo
            .update_movement(&self.pool, id, &description, amount)
            .await
    }

    pub async fn delete_movement(&self, id: Uuid) -> Result<(), AppError> {
        self.finance_repo.delete_movement(&self.pool, id).await
    }

    pub async fn list_movements(&self) -> Result<Vec<CashMovement>, AppError> {
        self.finance_repo.list_movements().await
    }

    // =========================================================================
    //  ENTRADAS E GASTOS NÃO PLANEJADOS
    // =========================================================================

    pub async fn add_entry(
        &self,
        user: &User,
        payload: CreateDatedRecordPayload,
    ) -> Result<Entry, AppError> {
        let entry = Entry {
            id: Uuid::new_v4(),
            description: payload.description,
            amount: payload.amount,
            date: payload.date,
            user_id: user.id,
            user_name: user.username.clone(),
            created_at: Utc::now(),
        };

        self.finance_repo.insert_entry(&self.pool, &entry).await?;
        Ok(entry)
    }

    pub async fn update_entry(
        &self,
        id: Uuid,
        payload: UpdateDatedRecordPayload,
    ) -> Result<(), AppError> {
        let current = self
            .finance_repo
            .list_entries()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(AppError::RecordNotFound("entrada"))?;

        let description = payload.description.unwrap_or(current.description);
        let amount = payload.amount.unwrap_or(current.amount);
        let date = payload.date.unwrap_or(current.date);

        self.finance_repo
            .update_entry(&self.pool, id, &description, amount, date)
            .await
    }

    pub async fn delete_entry(&self, id: Uuid) -> Result<(), AppError> {
        self.finance_repo.delete_entry(&self.pool, id).await
    }

    pub async fn list_entries(&self) -> Result<Vec<Entry>, AppError> {
        self.finance_repo.list_entries().await
    }

    pub async fn add_expense(
        &self,
        user: &User,
        payload: CreateDatedRecordPayload,
    ) -> Result<UnplannedExpense, AppError> {
        let expense = UnplannedExpense {
            id: Uuid::new_v4(),
            description: payload.description,
            amount: payload.amount,
            date: payload.date,
            user_id: user.id,
            user_name: user.username.clone(),
            created_at: Utc::now(),
        };

        self.finance_repo.insert_expense(&self.pool, &expense).await?;
        Ok(expense)
    }

    pub async fn update_expense(
        &self,
        id: Uuid,
        payload: UpdateDatedRecordPayload,
    ) -> Result<(), AppError> {
        let current = self
            .finance_repo
            .list_expenses()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(AppError::RecordNotFound("gasto não planejado"))?;

        let description = payload.description.unwrap_or(current.description);
        let amount = payload.amount.unwrap_or(current.amount);
        let date = payload.date.unwrap_or(current.date);

        self.finance_repo
            .update_expense(&self.pool, id, &description, amount, date)
            .await
    }

    pub async fn delete_expense(&self, id: Uuid) -> Result<(), AppError> {
        self.finance_repo.delete_expense(&self.pool, id).await
    }

    pub async fn list_expenses(&self) -> Result<Vec<UnplannedExpense>, AppError> {
        self.finance_repo.list_expenses().await
    }

    // =========================================================================
    //  FECHAMENTO MENSAL
    // =========================================================================

    /// Congela as somas de caixa de um mês em `monthly_summaries`. Refechar
    /// o mesmo mês regrava o snapshot.
    pub async fn close_month(&self, payload: CloseMonthPayload) -> Result<MonthlySummary, AppError> {
        let movements = self.finance_repo.list_movements().await?;

        let in_month = |m: &&CashMovement| {
            i64::from(m.date.year()) == payload.year && i64::from(m.date.month()) == payload.month
        };
        let total_in: f64 = movements
            .iter()
            .filter(in_month)
            .filter(|m| m.kind == MovementKind::Entrada)
            .map(|m| m.amount)
            .sum();
        let total_out: f64 = movements
            .iter()
            .filter(in_month)
            .filter(|m| m.kind == MovementKind::Saida)
            .map(|m| m.amount)
            .sum();

        let summary = MonthlySummary {
            year: payload.year,
            month: payload.month,
            total_in,
            total_out,
            balance: total_in - total_out,
            closed_at: Utc::now(),
        };

        self.finance_repo.upsert_summary(&self.pool, &summary).await?;

        tracing::info!(
            "📅 Mês {}/{} fechado: saldo {:.2}",
            summary.month,
            summary.year,
            summary.balance
        );
        Ok(summary)
    }

    pub async fn list_summaries(&self) -> Result<Vec<MonthlySummary>, AppError> {
        self.finance_repo.list_summaries().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::db_utils::test_pool;
    use crate::models::finance::DebtKind;

    async fn fixture() -> (FinanceService, User) {
        let pool = test_pool().await;
        let svc = FinanceService::new(FinanceRepository::new(pool.clone()), pool);
        let user = User {
            id: Uuid::new_v4(),
            username: "ana".into(),
            email: "ana@example.com".into(),
            first_name: "Ana".into(),
            last_name: "Ávila".into(),
            password_hash: String::new(),
            is_admin: false,
            role: Some("partner".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        (svc, user)
    }

    #[tokio::test]
    async fn debt_paid_flag_toggles_independently() {
        let (svc, user) = fixture().await;

        let debt = svc
            .add_debt(
                &user,
                CreateDebtPayload {
                    description: "Aluguel".into(),
                    amount: 1200.0,
                    kind: DebtKind::Fixo,
                    due_date: Utc::now().date_naive(),
                    duration_months: Some(12),
                },
            )
            .await
            .unwrap();
        assert!(!debt.paid);

        svc.mark_debt_paid(debt.id).await.unwrap();
        assert!(svc.list_debts().await.unwrap()[0].paid);

        svc.mark_debt_unpaid(debt.id).await.unwrap();
        assert!(!svc.list_debts().await.unwrap()[0].paid);
    }

    #[tokio::test]
    async fn overdue_means_unpaid_and_past_due() {
        let (svc, user) = fixture().await;
        let yesterday = Utc::now().date_naive() - chrono::Duration::days(1);

        let debt = svc
            .add_debt(
                &user,
                CreateDebtPayload {
                    description: "Conta de luz".into(),
                    amount: 80.0,
                    kind: DebtKind::Unico,
                    due_date: yesterday,
                    duration_months: None,
                },
            )
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        assert!(debt.is_overdue(today));

        svc.mark_debt_paid(debt.id).await.unwrap();
        assert!(!svc.list_debts().await.unwrap()[0].is_overdue(today));
    }

    #[tokio::test]
    async fn close_month_snapshots_only_that_months_movements() {
        let (svc, user) = fixture().await;

        let this_month = Utc::now();
        svc.add_movement(
            &user,
            CreateMovementPayload {
                kind: MovementKind::Entrada,
                amount: 1000.0,
                description: "Caixa inicial".into(),
            },
        )
        .await
        .unwrap();
        svc.add_movement(
            &user,
            CreateMovementPayload {
                kind: MovementKind::Saida,
                amount: 250.0,
                description: "Compra de insumos".into(),
            },
        )
        .await
        .unwrap();

        let summary = svc
            .close_month(CloseMonthPayload {
                year: i64::from(this_month.year()),
                month: i64::from(this_month.month()),
            })
            .await
            .unwrap();

        assert_eq!(summary.total_in, 1000.0);
        assert_eq!(summary.total_out, 250.0);
        assert_eq!(summary.balance, 750.0);

        // Mês sem movimento fecha zerado; refechar regrava em vez de duplicar.
        let empty = svc
            .close_month(CloseMonthPayload { year: 1999, month: 1 })
            .await
            .unwrap();
        assert_eq!(empty.balance, 0.0);
        assert_eq!(svc.list_summaries().await.unwrap().len(), 2);

        svc.close_month(CloseMonthPayload {
            year: i64::from(this_month.year()),
            month: i64::from(this_month.month()),
        })
        .await
        .unwrap();
        assert_eq!(svc.list_summaries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn movement_edit_keeps_kind_and_stamp() {
        let (svc, user) = fixture().await;

        let movement = svc
            .add_movement(
                &user,
                CreateMovementPayload {
                    kind: MovementKind::Saida,
                    amount: 100.0,
                    description: "Ajuste".into(),
                },
            )
            .await
            .unwrap();

        svc.update_movement(
            movement.id,
            UpdateMovementPayload {
                description: Some("Ajuste corrigido".into()),
                amount: Some(120.0),
            },
        )
        .await
        .unwrap();

        let after = svc.list_movements().await.unwrap();
        assert_eq!(after[0].amount, 120.0);
        assert_eq!(after[0].kind, MovementKind::Saida);
        assert_eq!(after[0].user_name, user.first_name);
    }
}

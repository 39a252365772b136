use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InvestmentRepository, TimesheetRepository, UserRepository},
    models::{
        auth::User,
        investments::Investment,
        timesheet::{StartSessionPayload, StopSessionPayload, TimeSession, UpdateSessionPayload},
    },
};

fn time_investment_description(hours: f64) -> String {
    format!("Investimento de Tempo ({:.2}h)", hours)
}

#[derive(Clone)]
pub struct TimesheetService {
    timesheet_repo: TimesheetRepository,
    investment_repo: InvestmentRepository,
    user_repo: UserRepository,
    pool: SqlitePool,
}

impl TimesheetService {
    pub fn new(
        timesheet_repo: TimesheetRepository,
        investment_repo: InvestmentRepository,
        user_repo: UserRepository,
        pool: SqlitePool,
    ) -> Self {
        Self {
            timesheet_repo,
            investment_repo,
            user_repo,
            pool,
        }
    }

    /// Abre uma sessão de trabalho. Uma por usuário de cada vez.
    pub async fn start_session(
        &self,
        user: &User,
        payload: StartSessionPayload,
    ) -> Result<TimeSession, AppError> {
        if self.timesheet_repo.find_open_for_user(user.id).await?.is_some() {
            return Err(AppError::SessionAlreadyRunning);
        }

        let session = TimeSession {
            id: Uuid::new_v4(),
            user_id: user.id,
            start_time: Utc::now(),
            end_time: None,
            paused_ms: 0,
            hourly_rate: payload.hourly_rate,
            is_paid: false,
            is_completed: false,
        };

        self.timesheet_repo.insert(&self.pool, &session).await?;

        tracing::info!("⏱️ Sessão iniciada para {} a {:.2}/h", user.username, session.hourly_rate);
        Ok(session)
    }

    /// Encerra a sessão. O total pausado acumulado no cliente é persistido
    /// aqui; pausas em andamento que nunca chegaram se perdem.
    ///
    /// Sessão "investida" (não paga) gera o aporte derivado na MESMA
    /// transação do encerramento: sessão e investimento nunca ficam fora de
    /// sincronia por falha no meio do caminho.
    pub async fn stop_session(
        &self,
        id: Uuid,
        payload: StopSessionPayload,
    ) -> Result<TimeSession, AppError> {
        let mut session = self
            .timesheet_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        let owner_name = self.owner_name(&session).await?;

        session.end_time = Some(Utc::now());
        session.paused_ms = payload.paused_ms;
        session.is_paid = payload.is_paid;
        session.is_completed = true;

        let mut tx = self.pool.begin().await?;
        self.timesheet_repo.update(&mut *tx, &session).await?;
        self.reconcile_investment(&mut tx, &session, &owner_name).await?;
        tx.commit().await?;

        if let Some(hours) = session.worked_hours() {
            tracing::info!("⏹️ Sessão {} encerrada: {:.2}h trabalhadas.", session.id, hours);
        }
        Ok(session)
    }

    /// Edição retroativa de início/fim/valor-hora/pausas/classificação.
    /// Recalcula horas e valor e reconcilia o aporte derivado em uma única
    /// transação (cria, atualiza em lugar ou remove, conforme o caso).
    pub async fn update_session(
        &self,
        id: Uuid,
        payload: UpdateSessionPayload,
    ) -> Result<TimeSession, AppError> {
        let mut session = self
            .timesheet_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        let owner_name = self.owner_name(&session).await?;

        if let Some(start_time) = payload.start_time {
            session.start_time = start_time;
        }
        if let Some(end_time) = payload.end_time {
            session.end_time = Some(end_time);
            session.is_completed = true;
        }
        if let Some(hourly_rate) = payload.hourly_rate {
            session.hourly_rate = hourly_rate;
        }
        if let Some(is_paid) = payload.is_paid {
            session.is_paid = is_paid;
        }
        if let Some(paused_ms) = payload.paused_ms {
            session.paused_ms = paused_ms;
        }

        let mut tx = self.pool.begin().await?;
        self.timesheet_repo.update(&mut *tx, &session).await?;
        self.reconcile_investment(&mut tx, &session, &owner_name).await?;
        tx.commit().await?;

        Ok(session)
    }

    /// Exclui a sessão e o aporte derivado dela (se houver) juntos.
    pub async fn delete_session(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        self.investment_repo.delete_by_session(&mut *tx, id).await?;
        self.timesheet_repo.delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(())
    }

    /// A sessão aberta do usuário logado, se houver.
    pub async fn current_session(&self, user: &User) -> Result<Option<TimeSession>, AppError> {
        self.timesheet_repo.find_open_for_user(user.id).await
    }

    pub async fn list_sessions(&self, user: &User) -> Result<Vec<TimeSession>, AppError> {
        self.timesheet_repo.list_for_user(user.id).await
    }

    // Nome do dono da sessão para estampar no aporte derivado. Buscado fora
    // da transação de escrita.
    async fn owner_name(&self, session: &TimeSession) -> Result<String, AppError> {
        Ok(self
            .user_repo
            .find_by_id(session.user_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_else(|| "Usuário".to_string()))
    }

    /// Invariante de sincronização sessão ⇄ investimento:
    /// - investida e encerrada  ⇒ exatamente um aporte com o session_id;
    /// - paga (ou em andamento) ⇒ nenhum aporte com o session_id.
    async fn reconcile_investment(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        session: &TimeSession,
        owner_name: &str,
    ) -> Result<(), AppError> {
        let existing = self.investment_repo.find_by_session(&mut **tx, session.id).await?;
        let invested = !session.is_paid && session.is_completed;

        match (invested, session.worked_hours()) {
            (true, Some(hours)) => {
                let amount = hours * session.hourly_rate;
                let description = time_investment_description(hours);
                match existing {
                    Some(investment) => {
                        self.investment_repo
                            .update(&mut **tx, investment.id, &description, amount)
                            .await?;
                    }
                    None => {
                        let investment = Investment {
                            id: Uuid::new_v4(),
                            description,
                            amount,
                            user_id: session.user_id,
                            user_name: owner_name.to_string(),
                            date: Utc::now(),
                            is_time_investment: true,
                            session_id: Some(session.id),
                        };
                        self.investment_repo.insert(&mut **tx, &investment).await?;
                    }
                }
            }
            _ => {
                if existing.is_some() {
                    self.investment_repo.delete_by_session(&mut **tx, session.id).await?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crate::common::db_utils::test_pool;

    struct Fixture {
        svc: TimesheetService,
        investment_repo: InvestmentRepository,
        user: User,
    }

    async fn fixture() -> Fixture {
        let pool = test_pool().await;
        let user_repo = UserRepository::new(pool.clone());
        let user = user_repo
            .create_user(
                &pool,
                "socia",
                "socia@example.com",
                "Sócia",
                "Teste",
                "hash",
                false,
                Some("partner"),
            )
            .await
            .unwrap();

        let investment_repo = InvestmentRepository::new(pool.clone());
        Fixture {
            svc: TimesheetService::new(
                TimesheetRepository::new(pool.clone()),
                investment_repo.clone(),
                user_repo,
                pool,
            ),
            investment_repo,
            user,
        }
    }

    // Leva a sessão para um intervalo conhecido no passado, para que as
    // horas trabalhadas sejam exatas.
    async fn pin_interval(fx: &Fixture, id: Uuid, hours_ago_start: i64, hours_ago_end: i64) {
        fx.svc
            .update_session(
                id,
                UpdateSessionPayload {
                    start_time: Some(Utc::now() - Duration::hours(hours_ago_start)),
                    end_time: Some(Utc::now() - Duration::hours(hours_ago_end)),
                    hourly_rate: None,
                    is_paid: None,
                    paused_ms: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn only_one_open_session_per_user() {
        let fx = fixture().await;
        fx.svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 25.0 })
            .await
            .unwrap();

        let err = fx
            .svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 30.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SessionAlreadyRunning));
    }

    #[tokio::test]
    async fn paid_session_leaves_no_investment() {
        let fx = fixture().await;
        let session = fx
            .svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 25.0 })
            .await
            .unwrap();

        let stopped = fx
            .svc
            .stop_session(session.id, StopSessionPayload { is_paid: true, paused_ms: 0 })
            .await
            .unwrap();

        assert!(stopped.is_completed);
        assert!(fx.investment_repo.list_all().await.unwrap().is_empty());
        assert!(fx.svc.current_session(&fx.user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invested_session_yields_exactly_one_matching_investment() {
        let fx = fixture().await;
        let session = fx
            .svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 25.0 })
            .await
            .unwrap();

        fx.svc
            .stop_session(session.id, StopSessionPayload { is_paid: false, paused_ms: 0 })
            .await
            .unwrap();
        // Fixa 2h exatas de trabalho, reconciliando o aporte junto.
        pin_interval(&fx, session.id, 3, 1).await;

        let investments = fx.investment_repo.list_all().await.unwrap();
        assert_eq!(investments.len(), 1);
        let investment = &investments[0];
        assert_eq!(investment.session_id, Some(session.id));
        assert!(investment.is_time_investment);
        assert_eq!(investment.user_id, fx.user.id);
        assert!((investment.amount - 50.0).abs() < 0.01);
        assert!(investment.description.starts_with("Investimento de Tempo"));
    }

    #[tokio::test]
    async fn pause_time_is_discounted_from_earnings() {
        let fx = fixture().await;
        let session = fx
            .svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 100.0 })
            .await
            .unwrap();

        fx.svc
            .stop_session(
                session.id,
                StopSessionPayload { is_paid: false, paused_ms: 30 * 60 * 1000 },
            )
            .await
            .unwrap();
        pin_interval(&fx, session.id, 2, 0).await;

        // 2h corridas - 30min de pausa = 1.5h a 100/h.
        let investments = fx.investment_repo.list_all().await.unwrap();
        assert_eq!(investments.len(), 1);
        assert!((investments[0].amount - 150.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn flipping_paid_flag_removes_and_recreates_the_investment() {
        let fx = fixture().await;
        let session = fx
            .svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 25.0 })
            .await
            .unwrap();
        fx.svc
            .stop_session(session.id, StopSessionPayload { is_paid: false, paused_ms: 0 })
            .await
            .unwrap();
        pin_interval(&fx, session.id, 2, 0).await;
        assert_eq!(fx.investment_repo.list_all().await.unwrap().len(), 1);

        // Investida -> paga: o aporte derivado some.
        fx.svc
            .update_session(
                session.id,
                UpdateSessionPayload {
                    start_time: None,
                    end_time: None,
                    hourly_rate: None,
                    is_paid: Some(true),
                    paused_ms: None,
                },
            )
            .await
            .unwrap();
        assert!(fx.investment_repo.list_all().await.unwrap().is_empty());

        // Paga -> investida de novo, com valor-hora maior: recriado e recalculado.
        fx.svc
            .update_session(
                session.id,
                UpdateSessionPayload {
                    start_time: None,
                    end_time: None,
                    hourly_rate: Some(50.0),
                    is_paid: Some(false),
                    paused_ms: None,
                },
            )
            .await
            .unwrap();

        let investments = fx.investment_repo.list_all().await.unwrap();
        assert_eq!(investments.len(), 1);
        assert!((investments[0].amount - 100.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn editing_an_invested_session_updates_in_place() {
        let fx = fixture().await;
        let session = fx
            .svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 25.0 })
            .await
            .unwrap();
        fx.svc
            .stop_session(session.id, StopSessionPayload { is_paid: false, paused_ms: 0 })
            .await
            .unwrap();
        pin_interval(&fx, session.id, 2, 0).await;

        let before = fx.investment_repo.list_all().await.unwrap();
        assert_eq!(before.len(), 1);
        let original_id = before[0].id;

        // Dobra o intervalo: mesmo registro, valor novo, sem duplicar.
        pin_interval(&fx, session.id, 4, 0).await;

        let after = fx.investment_repo.list_all().await.unwrap();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].id, original_id);
        assert!((after[0].amount - 100.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn deleting_a_session_takes_its_investment_along() {
        let fx = fixture().await;
        let session = fx
            .svc
            .start_session(&fx.user, StartSessionPayload { hourly_rate: 25.0 })
            .await
            .unwrap();
        fx.svc
            .stop_session(session.id, StopSessionPayload { is_paid: false, paused_ms: 0 })
            .await
            .unwrap();
        pin_interval(&fx, session.id, 2, 0).await;
        assert_eq!(fx.investment_repo.list_all().await.unwrap().len(), 1);

        fx.svc.delete_session(session.id).await.unwrap();

        assert!(fx.investment_repo.list_all().await.unwrap().is_empty());
        assert!(fx.svc.list_sessions(&fx.user).await.unwrap().is_empty());
    }
}

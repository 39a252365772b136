use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FinanceRepository, InvestmentRepository, TimesheetRepository, UserRepository},
    models::auth::{Claims, UpdateUserPayload, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    investment_repo: InvestmentRepository,
    timesheet_repo: TimesheetRepository,
    finance_repo: FinanceRepository,
    jwt_secret: String,
    pool: SqlitePool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        investment_repo: InvestmentRepository,
        timesheet_repo: TimesheetRepository,
        finance_repo: FinanceRepository,
        jwt_secret: String,
        pool: SqlitePool,
    ) -> Self {
        Self {
            user_repo,
            investment_repo,
            timesheet_repo,
            finance_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn register_user(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        email: &str,
        password: &str,
        role: Option<&str>,
    ) -> Result<String, AppError> {
        // Verificação amigável antes do INSERT; a constraint UNIQUE cobre a
        // corrida entre a checagem e a escrita.
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::UsernameAlreadyExists);
        }

        // Hashing fora do executor async (bcrypt é CPU-bound).
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self
            .user_repo
            .create_user(
                &self.pool,
                username,
                email,
                first_name,
                last_name,
                &hashed_password,
                false,
                role.or(Some("partner")),
            )
            .await?;

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em uma thread separada
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Garante o usuário administrador padrão na primeira subida.
    pub async fn ensure_admin(&self) -> Result<(), AppError> {
        if self.user_repo.admin_exists().await? {
            return Ok(());
        }

        let hashed = tokio::task::spawn_blocking(|| hash("admin", bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create_user(
                &self.pool,
                "admin",
                "admin@example.com",
                "Administrador",
                "",
                &hashed,
                true,
                Some("admin"),
            )
            .await?;

        tracing::info!("👤 Usuário administrador padrão criado (admin/admin).");
        Ok(())
    }

    // ---
    // Operações do painel administrativo
    // ---

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list_all().await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        let current = self
            .user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let email = payload.email.unwrap_or(current.email);
        let first_name = payload.first_name.unwrap_or(current.first_name);
        let last_name = payload.last_name.unwrap_or(current.last_name);
        let is_admin = payload.is_admin.unwrap_or(current.is_admin);
        let role = payload.role.or(current.role);

        self.user_repo
            .update_user(
                &self.pool,
                id,
                &email,
                &first_name,
                &last_name,
                is_admin,
                role.as_deref(),
            )
            .await?;

        self.user_repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    /// Exclui o usuário e tudo que ele possui (investimentos, sessões de
    /// tempo e dívidas) em uma única transação.
    pub async fn delete_user_cascade(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let investments = self.investment_repo.delete_by_user(&mut *tx, id).await?;
        let sessions = self.timesheet_repo.delete_by_user(&mut *tx, id).await?;
        let debts = self.finance_repo.delete_debts_by_user(&mut *tx, id).await?;
        self.user_repo.delete_user(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            "🗑️ Usuário {} removido ({} investimentos, {} sessões, {} dívidas).",
            id,
            investments,
            sessions,
            debts
        );
        Ok(())
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::db_utils::test_pool;

    async fn service() -> (AuthService, SqlitePool) {
        let pool = test_pool().await;
        let svc = AuthService::new(
            UserRepository::new(pool.clone()),
            InvestmentRepository::new(pool.clone()),
            TimesheetRepository::new(pool.clone()),
            FinanceRepository::new(pool.clone()),
            "segredo-de-teste".to_string(),
            pool.clone(),
        );
        (svc, pool)
    }

    #[tokio::test]
    async fn register_login_and_token_round_trip() {
        let (svc, _pool) = service().await;

        svc.register_user("Ana", "Ávila", "ana", "ana@example.com", "senha123", None)
            .await
            .unwrap();

        let token = svc.login_user("ana", "senha123").await.unwrap();
        let user = svc.validate_token(&token).await.unwrap();
        assert_eq!(user.username, "ana");
        assert!(!user.is_admin);
        assert_eq!(user.role.as_deref(), Some("partner"));
    }

    #[tokio::test]
    async fn wrong_password_and_duplicate_username_are_rejected() {
        let (svc, _pool) = service().await;

        svc.register_user("Ana", "Ávila", "ana", "ana@example.com", "senha123", None)
            .await
            .unwrap();

        let err = svc.login_user("ana", "errada").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));

        let err = svc
            .register_user("Outra", "Ana", "ana", "outra@example.com", "senha123", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UsernameAlreadyExists));
    }

    #[tokio::test]
    async fn ensure_admin_is_idempotent() {
        let (svc, _pool) = service().await;

        svc.ensure_admin().await.unwrap();
        svc.ensure_admin().await.unwrap();

        let admins: Vec<_> = svc
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .filter(|u| u.is_admin)
            .collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].username, "admin");
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_over_their_records() {
        let (svc, pool) = service().await;

        let token = svc
            .register_user("Ana", "Ávila", "ana", "ana@example.com", "senha123", None)
            .await
            .unwrap();
        let user = svc.validate_token(&token).await.unwrap();

        // Semeia registros do usuário em três coleções.
        let investment_repo = InvestmentRepository::new(pool.clone());
        investment_repo
            .insert(
                &pool,
                &crate::models::investments::Investment {
                    id: Uuid::new_v4(),
                    description: "aporte".into(),
                    amount: 100.0,
                    user_id: user.id,
                    user_name: user.username.clone(),
                    date: Utc::now(),
                    is_time_investment: false,
                    session_id: None,
                },
            )
            .await
            .unwrap();

        let timesheet_repo = TimesheetRepository::new(pool.clone());
        timesheet_repo
            .insert(
                &pool,
                &crate::models::timesheet::TimeSession {
                    id: Uuid::new_v4(),
                    user_id: user.id,
                    start_time: Utc::now(),
                    end_time: None,
                    paused_ms: 0,
                    hourly_rate: 25.0,
                    is_paid: false,
                    is_completed: false,
                },
            )
            .await
            .unwrap();

        let finance_repo = FinanceRepository::new(pool.clone());
        finance_repo
            .insert_debt(
                &pool,
                &crate::models::finance::Debt {
                    id: Uuid::new_v4(),
                    description: "conta".into(),
                    amount: 10.0,
                    kind: crate::models::finance::DebtKind::Unico,
                    due_date: Utc::now().date_naive(),
                    duration_months: None,
                    paid: false,
                    user_id: user.id,
                    user_name: user.username.clone(),
                },
            )
            .await
            .unwrap();

        svc.delete_user_cascade(user.id).await.unwrap();

        assert!(investment_repo.list_all().await.unwrap().is_empty());
        assert!(timesheet_repo.list_for_user(user.id).await.unwrap().is_empty());
        assert!(finance_repo.list_debts().await.unwrap().is_empty());
        assert!(matches!(
            svc.validate_token(&token).await.unwrap_err(),
            AppError::UserNotFound
        ));
    }
}

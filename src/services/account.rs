use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::services::instructor_profile::InstructorProfile;
use crate::session::provider::{AdminAuth, AdminError};
use crate::session::{CallerIdentity, UserType};

#[derive(Debug, Error)]
pub enum AccountSyncError {
    /// The caller has a session but no matching user at the auth provider.
    #[error("{0}")]
    Identity(String),

    /// Admin API transport or server-side failure.
    #[error("Falha no provedor de autenticação: {0}")]
    Provider(String),

    /// Admin credentials were never configured for this process.
    #[error("Provedor de autenticação não configurado (defina {0})")]
    Unconfigured(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Outcome of an account sync: the effective role plus the profile the
/// client should render.
#[derive(Debug, Clone, Serialize)]
pub struct SyncedAccount {
    pub role: UserType,
    pub profile: Value,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Mirror the provider user into the local accounts table and resolve
    /// the caller's role. `requested` comes from the `userType` query
    /// parameter and only applies to accounts that never picked a role.
    async fn sync_account(
        &self,
        caller: &CallerIdentity,
        requested: Option<UserType>,
    ) -> Result<SyncedAccount, AccountSyncError>;
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    email: Option<String>,
    role: String,
}

pub struct PgAccountService {
    db: Arc<Database>,
    admin: AdminAuth,
}

impl PgAccountService {
    pub fn new(db: Arc<Database>, admin: AdminAuth) -> Self {
        Self { db, admin }
    }
}

#[async_trait]
impl AccountService for PgAccountService {
    async fn sync_account(
        &self,
        caller: &CallerIdentity,
        requested: Option<UserType>,
    ) -> Result<SyncedAccount, AccountSyncError> {
        let api = match &self.admin {
            AdminAuth::Configured(api) => api,
            AdminAuth::Unconfigured { missing } => {
                return Err(AccountSyncError::Unconfigured(missing.join(", ")));
            }
        };

        // The provider is the source of truth for the user's existence.
        let provider_user = match api.fetch_user(caller.id).await {
            Ok(user) => user,
            Err(AdminError::UserNotFound(id)) => {
                return Err(AccountSyncError::Identity(format!(
                    "usuário {} não existe no provedor",
                    id
                )));
            }
            Err(e) => return Err(AccountSyncError::Provider(e.to_string())),
        };

        let email = provider_user.email.or_else(|| caller.email.clone());
        let requested_role = requested
            .or(caller.user_type)
            .unwrap_or(UserType::Student);

        let pool = self.db.pool().await?;

        // First sync picks the requested role; later syncs keep the stored one.
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (user_id, email, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET email = COALESCE(EXCLUDED.email, accounts.email)
            RETURNING email, role
            "#,
        )
        .bind(caller.id)
        .bind(&email)
        .bind(requested_role.to_string())
        .fetch_one(&pool)
        .await?;

        let role: UserType = row.role.parse().unwrap_or(UserType::Student);

        let profile = match role {
            UserType::Instructor => {
                let display_name = row
                    .email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .unwrap_or("instrutor")
                    .to_string();

                let profile: InstructorProfile = sqlx::query_as(
                    r#"
                    INSERT INTO instructor_profiles (user_id, display_name)
                    VALUES ($1, $2)
                    ON CONFLICT (user_id)
                    DO UPDATE SET user_id = instructor_profiles.user_id
                    RETURNING user_id, display_name, headline, bio, updated_at
                    "#,
                )
                .bind(caller.id)
                .bind(display_name)
                .fetch_one(&pool)
                .await?;

                serde_json::to_value(&profile).unwrap_or(Value::Null)
            }
            UserType::Student => json!({
                "userId": caller.id,
                "email": row.email,
            }),
        };

        Ok(SyncedAccount { role, profile })
    }
}

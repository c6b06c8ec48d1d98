use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::{Database, DbError};
use crate::session::CallerIdentity;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Public instructor profile basics, as stored and as returned on the wire.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InstructorProfile {
    pub user_id: Uuid,
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for the update-basics operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBasics {
    pub display_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

#[async_trait]
pub trait InstructorProfileService: Send + Sync {
    async fn update_basics(
        &self,
        caller: &CallerIdentity,
        basics: ProfileBasics,
    ) -> Result<InstructorProfile, ProfileError>;
}

pub struct PgInstructorProfileService {
    db: Arc<Database>,
}

impl PgInstructorProfileService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InstructorProfileService for PgInstructorProfileService {
    async fn update_basics(
        &self,
        caller: &CallerIdentity,
        basics: ProfileBasics,
    ) -> Result<InstructorProfile, ProfileError> {
        let basics = validate(basics)?;
        let pool = self.db.pool().await?;

        let profile: InstructorProfile = sqlx::query_as(
            r#"
            INSERT INTO instructor_profiles (user_id, display_name, headline, bio, updated_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (user_id)
            DO UPDATE SET
                display_name = EXCLUDED.display_name,
                headline = EXCLUDED.headline,
                bio = EXCLUDED.bio,
                updated_at = now()
            RETURNING user_id, display_name, headline, bio, updated_at
            "#,
        )
        .bind(caller.id)
        .bind(&basics.display_name)
        .bind(&basics.headline)
        .bind(&basics.bio)
        .fetch_one(&pool)
        .await?;

        Ok(profile)
    }
}

fn validate(basics: ProfileBasics) -> Result<ProfileBasics, ProfileError> {
    let display_name = basics.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ProfileError::Invalid(
            "Nome de exibição é obrigatório".to_string(),
        ));
    }
    if display_name.chars().count() > 120 {
        return Err(ProfileError::Invalid(
            "Nome de exibição muito longo".to_string(),
        ));
    }
    if basics
        .headline
        .as_deref()
        .is_some_and(|h| h.chars().count() > 200)
    {
        return Err(ProfileError::Invalid("Título muito longo".to_string()));
    }

    Ok(ProfileBasics {
        display_name,
        headline: basics.headline.map(|h| h.trim().to_string()),
        bio: basics.bio,
    })
}

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{Database, DbError};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Subscription plan projection for the public pricing page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub billing_interval: String,
    pub features: Vec<String>,
}

#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Plan>, PlanError>;
}

pub struct PgPlanStore {
    db: Arc<Database>,
}

impl PgPlanStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlanStore for PgPlanStore {
    async fn list_active(&self) -> Result<Vec<Plan>, PlanError> {
        let pool = self.db.pool().await?;

        let plans: Vec<Plan> = sqlx::query_as(
            r#"
            SELECT id, name, description, price_cents, billing_interval, features
            FROM plans
            WHERE is_active
            ORDER BY price_cents ASC
            "#,
        )
        .fetch_all(&pool)
        .await?;

        Ok(plans)
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::db::{Database, DbError};
use crate::session::CallerIdentity;

#[derive(Debug, Error)]
pub enum ChatUsageError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

/// Chat inbox metering for the current billing cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUsage {
    pub used: i64,
    pub limit: i64,
    pub renews_at: DateTime<Utc>,
}

#[async_trait]
pub trait ChatUsageService: Send + Sync {
    async fn usage_for(&self, caller: &CallerIdentity) -> Result<ChatUsage, ChatUsageError>;
}

pub struct PgChatUsageService {
    db: Arc<Database>,
    monthly_limit: i64,
}

impl PgChatUsageService {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            monthly_limit: config::config().chat.monthly_message_limit,
        }
    }
}

#[async_trait]
impl ChatUsageService for PgChatUsageService {
    async fn usage_for(&self, caller: &CallerIdentity) -> Result<ChatUsage, ChatUsageError> {
        let pool = self.db.pool().await?;

        let (used,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM chat_messages
            WHERE sender_id = $1
              AND created_at >= date_trunc('month', now())
            "#,
        )
        .bind(caller.id)
        .fetch_one(&pool)
        .await?;

        Ok(ChatUsage {
            used,
            limit: self.monthly_limit,
            renews_at: next_renewal(Utc::now()),
        })
    }
}

/// First instant of the month after `now`, when the message counter resets.
pub fn next_renewal(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

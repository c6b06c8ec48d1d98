use serde::Deserialize;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::runtime::{Capability, RuntimeEnv};

/// Errors from the auth provider's admin API
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Provider user not found: {0}")]
    UserNotFound(Uuid),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// User record as the auth provider reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Service-role client for the auth provider's admin API.
///
/// Construction is explicit about configuration: either the credentials are
/// present and you get a usable [`AdminApi`], or you get `Unconfigured` with
/// the variable names that are missing. Callers must handle the unconfigured
/// case; nothing here defers the failure to first use.
pub enum AdminAuth {
    Configured(AdminApi),
    Unconfigured { missing: Vec<&'static str> },
}

impl AdminAuth {
    pub fn from_env(env: &RuntimeEnv) -> Self {
        if !env.has(Capability::AdminApi) {
            let mut missing = Vec::new();
            if std::env::var("SUPABASE_URL").is_err() {
                missing.push("SUPABASE_URL");
            }
            if std::env::var("SUPABASE_SERVICE_ROLE_KEY").is_err() {
                missing.push("SUPABASE_SERVICE_ROLE_KEY");
            }
            return AdminAuth::Unconfigured { missing };
        }

        match (
            std::env::var("SUPABASE_URL"),
            std::env::var("SUPABASE_SERVICE_ROLE_KEY"),
        ) {
            (Ok(base), Ok(key)) => match Url::parse(&base) {
                Ok(base) => AdminAuth::Configured(AdminApi::new(base, key)),
                Err(e) => {
                    tracing::error!(error = %e, "SUPABASE_URL is not a valid URL");
                    AdminAuth::Unconfigured {
                        missing: vec!["SUPABASE_URL"],
                    }
                }
            },
            _ => AdminAuth::Unconfigured {
                missing: vec!["SUPABASE_URL", "SUPABASE_SERVICE_ROLE_KEY"],
            },
        }
    }
}

pub struct AdminApi {
    http: reqwest::Client,
    base: Url,
    service_key: String,
}

impl AdminApi {
    pub fn new(base: Url, service_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            service_key,
        }
    }

    /// Fetch a user by id through the admin endpoint.
    pub async fn fetch_user(&self, id: Uuid) -> Result<ProviderUser, AdminError> {
        let url = self.base.join(&format!("auth/v1/admin/users/{}", id))?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AdminError::UserNotFound(id));
        }

        let response = response.error_for_status()?;
        Ok(response.json::<ProviderUser>().await?)
    }
}

pub mod middleware;
pub mod provider;

use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config;

/// Account role discriminator carried in tokens and query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Instructor,
}

impl std::str::FromStr for UserType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(UserType::Student),
            "instructor" => Ok(UserType::Instructor),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserType::Student => write!(f, "student"),
            UserType::Instructor => write!(f, "instructor"),
        }
    }
}

/// Claims carried in the auth provider's access tokens (HS256).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub user_metadata: Option<Value>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    fn user_type(&self) -> Option<UserType> {
        self.user_metadata
            .as_ref()?
            .get("userType")?
            .as_str()?
            .parse()
            .ok()
    }
}

/// Authenticated caller context, resolved once per request.
///
/// Request-scoped and read-only: delegates receive it by reference and
/// nothing here is ever persisted by the handler layer.
#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub id: Uuid,
    pub email: Option<String>,
    pub user_type: Option<UserType>,
}

/// Outcome of session resolution.
///
/// "No session" is a valid, expected outcome, not an error: both a missing
/// token and a token that fails validation resolve to [`Resolution::Anonymous`]
/// with a reason for the diagnostic log. Nothing in here panics or throws.
#[derive(Debug)]
pub enum Resolution {
    Authenticated(CallerIdentity),
    Anonymous { reason: String },
}

/// Answers "who is the current caller" for a request.
pub struct SessionResolver {
    secret: String,
}

impl SessionResolver {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    pub fn from_config() -> Self {
        Self::new(config::config().security.jwt_secret.clone())
    }

    pub fn resolve(&self, headers: &HeaderMap) -> Resolution {
        let token = match bearer_token(headers) {
            Ok(token) => token,
            Err(reason) => return Resolution::Anonymous { reason },
        };

        if self.secret.is_empty() {
            // Resolver error; downstream treats it the same as no session.
            return Resolution::Anonymous {
                reason: "JWT secret not configured".to_string(),
            };
        }

        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let data = match decode::<Claims>(&token, &decoding_key, &Validation::default()) {
            Ok(data) => data,
            Err(e) => {
                return Resolution::Anonymous {
                    reason: format!("invalid session token: {}", e),
                }
            }
        };

        let id = match Uuid::parse_str(&data.claims.sub) {
            Ok(id) => id,
            Err(_) => {
                return Resolution::Anonymous {
                    reason: "session subject is not a UUID".to_string(),
                }
            }
        };

        Resolution::Authenticated(CallerIdentity {
            id,
            user_type: data.claims.user_type(),
            email: data.claims.email,
        })
    }
}

/// Extract the bearer token from the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

use std::env;

/// Optional integrations this process may or may not be able to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// A Postgres database is reachable (DATABASE_URL is set).
    Database,
    /// The auth provider's admin API is usable (SUPABASE_URL and
    /// SUPABASE_SERVICE_ROLE_KEY are set).
    AdminApi,
}

/// Snapshot of which capabilities are available to this process.
///
/// Taken once at construction so that no use-site branches on `std::env`
/// directly. Tests grant arbitrary capability sets via [`RuntimeEnv::with`].
#[derive(Debug, Clone, Default)]
pub struct RuntimeEnv {
    granted: Vec<Capability>,
}

impl RuntimeEnv {
    /// Detect capabilities from process environment variables.
    pub fn from_process_env() -> Self {
        let mut granted = Vec::new();
        if env::var("DATABASE_URL").is_ok() {
            granted.push(Capability::Database);
        }
        if env::var("SUPABASE_URL").is_ok() && env::var("SUPABASE_SERVICE_ROLE_KEY").is_ok() {
            granted.push(Capability::AdminApi);
        }
        Self { granted }
    }

    /// An environment with an explicit capability set.
    pub fn with(granted: impl Into<Vec<Capability>>) -> Self {
        Self { granted: granted.into() }
    }

    /// An environment with no capabilities at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}

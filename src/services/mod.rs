// Data-access delegates. Each owns its own validation and persistence rules;
// route handlers call exactly one of these per request and only map the
// outcome. Trait seams keep them substitutable in tests.
pub mod account;
pub mod chat_usage;
pub mod instructor_profile;
pub mod plans;

pub use account::{AccountService, AccountSyncError, PgAccountService, SyncedAccount};
pub use chat_usage::{ChatUsage, ChatUsageError, ChatUsageService, PgChatUsageService};
pub use instructor_profile::{
    InstructorProfile, InstructorProfileService, PgInstructorProfileService, ProfileBasics,
    ProfileError,
};
pub use plans::{PgPlanStore, Plan, PlanError, PlanStore};

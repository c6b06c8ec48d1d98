// Environment-adaptive building blocks: capability detection, live boolean
// watchers, and one-shot deferred module loading.
pub mod deferred;
pub mod env;
pub mod flag;

pub use deferred::{DeferredModule, LoadState};
pub use env::{Capability, RuntimeEnv};
pub use flag::{FlagSource, FlagWatcher};

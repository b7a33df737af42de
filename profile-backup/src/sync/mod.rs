//! Moving profile data with bounded retries.

pub mod retry;
pub mod syncer;

pub use retry::{RetryExecutor, RetryPolicy};
pub use syncer::{Direction, OutcomeStatus, ProfileSyncer, SyncOutcome};

//! Session state for SkyCast: the screen state machine, the loading/error
//! flags, and the persisted list of recent searches.

pub mod error_mapping;
pub mod recent;
pub mod session;

pub use error_mapping::{ActionError, FailureKind};
pub use recent::{RecentSearches, MAX_RECENT, RECENT_SEARCHES_KEY};
pub use session::{Dashboard, FetchCompletion, Outcome, PendingFetch, Session, View};

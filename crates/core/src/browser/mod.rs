//! Browse session - the state-holding component the page renders from.
//!
//! The page sends [`BrowseCommand`]s through a single dispatch entry point
//! and re-renders from [`BrowseSession::snapshot`]. Every state-changing
//! command recomputes the filtered view and the pagination before it
//! returns.

mod command;
mod session;
mod snapshot;

pub use command::{BrowseCommand, CommandOutcome, DownloadRequest, FilterChange};
pub use session::BrowseSession;
pub use snapshot::{BrowseSnapshot, EntryCard, FilterOptions, SessionPhase};

//! Exam catalog - entries, the catalog document and the in-memory store the
//! browsing engine works on.

mod payload;
mod store;
mod types;

pub use payload::parse_payload;
pub use store::CatalogStore;
pub use types::*;

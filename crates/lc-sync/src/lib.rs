pub mod error;
pub mod reconcile;
pub mod source;

pub use error::SyncError;
pub use reconcile::{fetch_candidates, reconcile, select_longest, Candidate};
pub use source::{ChainSource, MemorySource};

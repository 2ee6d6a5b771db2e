//! Persisted history of placed markers.
//!
//! The history lets a later session re-resolve markers without walking the
//! route again, and stops the placement engine from stacking a second marker
//! on a spot that already has one.

mod entry;
pub mod error;
mod snapshot;
mod store;

pub use entry::{AnchorHistoryEntry, MarkerKind, ResolutionMode};
pub use error::HistoryError;
pub use snapshot::{HistorySnapshot, HISTORY_VERSION};
pub use store::AnchorHistory;

//! flowchef-storage
//!
//! Recipe persistence over a pluggable key-value store: CRUD, import
//! reconciliation, and user preferences.

pub mod clock;
pub mod error;
pub mod file;
pub mod import;
pub mod objects;
pub mod preferences;
pub mod recipes;

pub use clock::{Clock, FixedClock, SystemClock};
pub use file::FileStore;
pub use import::{ImportOutcome, ImportSummary};
pub use objects::{KeyValueStore, MemoryStore};
pub use recipes::RecipeStore;

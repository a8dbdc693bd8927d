//! flowchef-core
//!
//! Pure domain types, slug and timestamp conventions, boundary validation,
//! and storage key names. No I/O — this is the shared vocabulary of the
//! flowchef workspace.

pub mod error;
pub mod models;
pub mod slug;
pub mod storage_keys;
pub mod time;
pub mod validate;

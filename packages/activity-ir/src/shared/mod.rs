//! Shared module - Common types used by every feature
//!
//! Identifiers, locations and memory-reference shapes. No analysis logic.

pub mod models;

pub use models::*;

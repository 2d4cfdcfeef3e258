//! Graph model types.
//!
//! This module contains:
//! - Identifiers (UserId, KeywordId)
//! - Relationship edges and keyword time windows
//! - Geographic locations

mod types;
#[cfg(test)]
mod types_proptest;

pub use types::*;

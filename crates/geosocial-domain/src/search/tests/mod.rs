//! Tests for the community search module.
//!
//! Organized by functionality:
//! - Scenario tests for both query modes
//! - Traversal safety (hop limits, cycles, visit policies)
//! - Error propagation
//! - Property tests over random graphs

mod mocks;

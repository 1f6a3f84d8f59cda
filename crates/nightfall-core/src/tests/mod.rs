//! Cross-module tests for the combat pipeline.
//!
//! # Test Structure
//!
//! - `scenarios.rs`: End-to-end combat scenarios through `CombatSystem`
//! - `determinism.rs`: Identical inputs give identical worlds and events
//! - `properties.rs`: Property tests for component and lifecycle invariants
//! - `helpers.rs`: Factory functions and run loops

mod helpers;

pub use helpers::*;

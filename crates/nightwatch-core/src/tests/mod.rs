//! Session-level tests for the frame pipeline.
//!
//! - **Determinism tests**: the same seed and inputs give the same session
//! - **Integration tests**: whole frames through [`Simulation::step`]
//! - **Helper functions**: utilities for test setup
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the simulation
//! - `helpers.rs`: Test setup utilities and factory functions
//!
//! [`Simulation::step`]: crate::simulation::Simulation::step

mod helpers;
mod integration;

// Re-export for convenience
pub use helpers::*;

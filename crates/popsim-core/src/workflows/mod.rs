//! # Workflows Module
//!
//! High-level entry points that combine catalog lookups, genetic-map loading and
//! the engine into complete operations.
//!
//! - **Simulation Workflow** ([`simulate`]) - Resolve a species, model, chromosome
//!   and sample configuration, then run the external simulator on it.

pub mod simulate;

//! # Engine Module
//!
//! The delegation layer between the catalog and an external coalescent simulator.
//! Nothing here simulates anything: the engine assembles the contig to simulate,
//! translates a demographic model into the simulator's parameters and runs the
//! simulator as a child process.
//!
//! - **Configuration** ([`config`]) - What to simulate, with a validating builder
//! - **Contig** ([`contig`]) - The chromosome stretch, its recombination map and mutation rate
//! - **Translation** ([`ms`]) - Model, contig and samples to an ms-compatible argument list
//! - **Execution** ([`simulator`]) - The [`simulator::Simulator`] seam and the process driver
//! - **Progress Monitoring** ([`progress`]) - Callbacks for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types and error propagation

pub mod config;
pub mod contig;
pub mod error;
pub mod ms;
pub mod progress;
pub mod simulator;

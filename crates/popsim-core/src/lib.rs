//! # stdpopsim Core Library
//!
//! A catalog of standard population-genetic reference data (genomes, chromosomes,
//! genetic maps and demographic models) used to configure an external coalescent
//! simulation engine.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same strict layering throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models: [`core::genome::Genome`],
//!   [`core::maps::GeneticMap`], [`core::maps::RecombinationMap`] and the demographic
//!   [`core::models::Model`] with its equality checks and epoch debugger.
//!
//! - **[`catalog`]: The Reference Data.** The static species registry. Each species
//!   contributes a genome, its genetic maps and its published demographic models.
//!
//! - **[`engine`]: The Delegation Layer.** Turns a model, a contig and a sample
//!   configuration into the parameter bundle of an ms-compatible simulator and
//!   drives that simulator as an external process.
//!
//! - **[`workflows`]: The Public API.** Ties catalog lookups, genetic-map loading and
//!   the engine together into a single simulate call.

pub mod catalog;
pub mod core;
pub mod engine;
pub mod workflows;

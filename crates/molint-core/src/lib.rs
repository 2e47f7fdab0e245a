//! # Molint Core Library
//!
//! Detection of non-covalent interactions in molecular structures: hydrogen
//! and weak hydrogen bonds, ionic contacts, pi-stacking, cation-pi, halogen
//! bonds, hydrophobic contacts and metal coordination.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Model`, `Unit`,
//!   `Structure`), chemistry perception (valence, aromatic rings, residue
//!   names), spatial indexing and geometry helpers.
//!
//! - **[`engine`]: The Logic Core.** Feature providers and link testers for
//!   each interaction family, columnar feature storage, compact link graphs,
//!   refinement, result caching, progress reporting and configuration.
//!
//! - **[`workflows`]: The Public API.** Runs a complete interaction
//!   computation over a structure with caching and cancellation.

pub mod core;
pub mod engine;
pub mod workflows;

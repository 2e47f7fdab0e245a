//! Computational phases of interaction detection.
//!
//! Each submodule runs one phase over the whole structure, reporting progress
//! and honoring cancellation between units of work. [`interactions`] chains
//! them into a complete run.

pub mod features;
pub mod interactions;
pub mod links;

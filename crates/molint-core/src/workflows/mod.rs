//! # Workflows Module
//!
//! High-level entry points that run a complete interaction computation.
//!
//! ## Overview
//!
//! Workflows are the top-level API of the library. They accept a structure
//! and a parameter set, consult the optional result cache, drive the engine
//! phases with progress reporting and cancellation, and hand back a shared,
//! immutable result.
//!
//! - **Interactions Workflow** ([`interactions`]) - Non-covalent interaction detection

pub mod interactions;

//! # Core Module
//!
//! Stateless building blocks consumed by the interaction engine.
//!
//! ## Overview
//!
//! The core module holds the read-only structural data model, the chemistry
//! perceived from it, spatial indexing, and the geometry helpers shared by all
//! interaction testers. Nothing in this layer keeps state between calls.
//!
//! ## Architecture
//!
//! - **Structural Model** ([`models`]) - Atoms, residues, bonds, units, symmetry operators
//! - **Chemistry Perception** ([`chemistry`]) - Name tables, valence model, aromatic rings
//! - **Spatial Indexing** ([`spatial`]) - k-d tree lookups, bounding spheres, nearby unit pairs
//! - **Geometry** ([`utils`]) - Angles and plane measures across unit boundaries

pub mod chemistry;
pub mod models;
pub mod spatial;
pub mod utils;

//! # Core Models Module
//!
//! Read-only structural data consumed by the interaction engine.
//!
//! ## Overview
//!
//! A [`model::Model`] holds atoms, residues and covalent bonds. A
//! [`structure::Structure`] views that model through one or more
//! [`unit::Unit`]s, each selecting a subset of the atoms and placing them with
//! a [`operator::SymmetryOperator`]. Every per-atom query of the engine goes
//! through a unit using unit-local atom indices.
//!
//! ## Key Components
//!
//! - [`element`] - Chemical element table with metal classification
//! - [`atom`] - Atom record with element, charge, altloc and position
//! - [`residue`] - Residue naming and atom membership
//! - [`topology`] - Bond orders and bond records
//! - [`model`] - The immutable model and its incremental builder
//! - [`operator`] - Named rigid symmetry operators
//! - [`unit`] - Symmetry-placed atom subsets
//! - [`structure`] - Units plus cross-unit bonding queries
//! - [`ids`] - Identifier and index types
//!
//! ## Usage
//!
//! ```ignore
//! use molint::core::models::{atom::Atom, element::Element, model::ModelBuilder};
//! use molint::core::models::structure::Structure;
//!
//! let mut builder = ModelBuilder::new();
//! builder.start_chain('A').start_residue(1, "SER")?;
//! let og = builder.add_atom(Atom::new("OG", Element::O, Point3::new(0.0, 0.0, 0.0)))?;
//! let structure = Structure::from_model(builder.build());
//! ```

pub mod atom;
pub mod element;
pub mod ids;
pub mod model;
pub mod operator;
pub mod residue;
pub mod structure;
pub mod topology;
pub mod unit;

//! # Engine Module
//!
//! This module implements the interaction perception engine: it turns a
//! [`Structure`](crate::core::models::structure::Structure) into typed
//! features and links them into interaction graphs.
//!
//! ## Overview
//!
//! Detection runs in phases. Feature providers scan each unit for chemical
//! sites (donors, acceptors, charged groups, rings, metals) and freeze them
//! into columnar [`features::Features`] with a spatial index. Link testers from
//! every enabled interaction family then classify nearby feature pairs, first
//! within each unit and then across unit pairs, possibly related by symmetry.
//! An optional refinement pass flags edges that a stronger or shorter
//! interaction supersedes.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Per-family parameters, validation and TOML loading
//! - **Families** ([`families`]) - Feature providers and link testers of each interaction family
//! - **Features** ([`features`]) - Columnar feature storage and its builder
//! - **Links** ([`links`]) - Intra-unit and inter-unit interaction graphs
//! - **Results** ([`interactions`]) - The immutable result with query accessors
//! - **Caching** ([`cache`]) - Memoized results keyed by structure and parameters
//! - **Progress Monitoring** ([`progress`]) - Progress events and cooperative cancellation
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod cache;
pub mod config;
pub mod error;
pub mod families;
pub mod features;
pub mod interactions;
pub mod links;
pub mod progress;
pub mod refine;
pub(crate) mod tasks;

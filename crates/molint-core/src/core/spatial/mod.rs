//! Spatial indexing: k-d tree radius lookups, bounding spheres and the
//! nearby unit pair finder.

pub mod lookup;
pub mod sphere;
pub mod unit_pairs;

pub mod families;
pub mod params;

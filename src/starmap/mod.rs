//! Star catalog and sky projection
//!
//! The catalog is plain read-only data; pass it by reference to whatever
//! needs it.

pub mod catalog;
pub mod projection;

pub use catalog::{CatalogError, CatalogVersion, Star, StarCatalog};
pub use projection::{
    PARSEC_TO_LY, angular_distance, galactic_lon_lat, gnomonic, tangent_to_screen, to_galactocentric,
};

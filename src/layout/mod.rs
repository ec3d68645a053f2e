//! Layout results consumed by input routing: the spatial hit-testing map.

pub mod spatial;

pub use spatial::SpatialMap;

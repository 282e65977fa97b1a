//! Spatial indexing utilities.
//!
//! A uniform grid over the square world, used to narrow food absorption
//! checks to nearby slots without changing their outcome.

mod grid;

pub use grid::{Bounds, GridItem, SpatialGrid};

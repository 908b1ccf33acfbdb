//! Container for gridded geomagnetic field data: the three vector
//! components, the total intensity and the magnetic potential, each sampled
//! on a Driscoll and Healy grid over a reference ellipsoid, with plotting
//! and labeled-dataset export conveniences. The grids themselves come from a
//! spherical harmonic expansion performed elsewhere.

pub mod cmap;
pub mod dataset;
pub mod error;
pub mod grid;
pub mod mag;
pub mod plot;

#[cfg(test)]
mod helpers;

pub use error::MagGridError;
pub use grid::{GridKind, LatLonGrid};
pub use mag::MagGrid;

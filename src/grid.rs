use crate::error::MagGridError;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude/longitude sampling scheme of a grid.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    /// Grid following the Driscoll and Healy sampling theorem.
    DriscollHealy,
}

impl fmt::Display for GridKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridKind::DriscollHealy => write!(f, "DH"),
        }
    }
}

/// A 2-D field sampled on a global Driscoll and Healy latitude/longitude grid.
///
/// Rows run from 90 N southwards, columns from 0 E eastwards. The shape alone
/// determines the sampling metadata: an even number of latitude bands is the
/// plain layout; an odd number carries the redundant 90 S row and 360 E
/// column of an extended grid. The number of longitude bands is either `n`
/// (equally sampled, `sampling = 1`) or `2n` (equally spaced in degrees,
/// `sampling = 2`), plus one when extended.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LatLonGrid {
    data: Array2<f64>,
    kind: GridKind,
    n: usize,
    sampling: usize,
    extend: bool,
}

impl LatLonGrid {
    /// Wrap a raw array, detecting `n`, `sampling` and `extend` from its shape.
    pub fn from_array(data: Array2<f64>) -> Result<Self, MagGridError> {
        let (nlat, nlon) = data.dim();
        let extend = nlat % 2 == 1;
        let n = if extend { nlat - 1 } else { nlat };
        if n == 0 || n % 2 != 0 {
            return Err(MagGridError::InvalidGridShape { nlat, nlon });
        }
        let Some(base) = nlon.checked_sub(extend as usize) else {
            return Err(MagGridError::InvalidGridShape { nlat, nlon });
        };
        let sampling = if base == n {
            1
        } else if base == 2 * n {
            2
        } else {
            return Err(MagGridError::InvalidGridShape { nlat, nlon });
        };
        Ok(Self {
            data,
            kind: GridKind::DriscollHealy,
            n,
            sampling,
            extend,
        })
    }

    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// The number of latitude samples driving the sampling scheme.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Longitudinal sampling: 1 for equally sampled grids (`nlon = nlat`),
    /// 2 for grids equally spaced in degrees.
    pub fn sampling(&self) -> usize {
        self.sampling
    }

    /// True if the grid contains the redundant column for 360 E and the
    /// unnecessary row for 90 S.
    pub fn extend(&self) -> bool {
        self.extend
    }

    pub fn nlat(&self) -> usize {
        self.data.nrows()
    }

    pub fn nlon(&self) -> usize {
        self.data.ncols()
    }

    /// Maximum spherical harmonic degree resolvable by this grid.
    pub fn lmax(&self) -> usize {
        self.n / 2 - 1
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn values_mut(&mut self) -> &mut Array2<f64> {
        &mut self.data
    }

    /// Latitudes of the grid rows in degrees, from 90 N southwards.
    pub fn lats(&self) -> Vec<f64> {
        let step = 180.0 / self.n as f64;
        (0..self.nlat()).map(|i| 90.0 - i as f64 * step).collect()
    }

    /// Longitudes of the grid columns in degrees, from 0 E eastwards.
    pub fn lons(&self) -> Vec<f64> {
        let step = 360.0 / (self.n * self.sampling) as f64;
        (0..self.nlon()).map(|j| j as f64 * step).collect()
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    #[test]
    fn test_from_array_equally_sampled() {
        let grid = LatLonGrid::from_array(Array2::zeros((4, 4))).unwrap();
        assert_eq!(grid.kind(), GridKind::DriscollHealy);
        assert_eq!(grid.n(), 4);
        assert_eq!(grid.sampling(), 1);
        assert!(!grid.extend());
        assert_eq!(grid.nlat(), 4);
        assert_eq!(grid.nlon(), 4);
        assert_eq!(grid.lmax(), 1);
    }

    #[test]
    fn test_from_array_equally_spaced() {
        let grid = LatLonGrid::from_array(Array2::zeros((4, 8))).unwrap();
        assert_eq!(grid.n(), 4);
        assert_eq!(grid.sampling(), 2);
        assert!(!grid.extend());
    }

    #[test]
    fn test_from_array_extended() {
        let grid = LatLonGrid::from_array(Array2::zeros((5, 5))).unwrap();
        assert_eq!(grid.n(), 4);
        assert_eq!(grid.sampling(), 1);
        assert!(grid.extend());

        let grid = LatLonGrid::from_array(Array2::zeros((5, 9))).unwrap();
        assert_eq!(grid.n(), 4);
        assert_eq!(grid.sampling(), 2);
        assert!(grid.extend());
    }

    #[test]
    fn test_from_array_rejects_bad_shapes() {
        for shape in [(3, 7), (4, 6), (0, 4), (1, 1), (6, 13)] {
            let err = LatLonGrid::from_array(Array2::zeros(shape)).unwrap_err();
            match err {
                MagGridError::InvalidGridShape { nlat, nlon } => {
                    assert_eq!((nlat, nlon), shape);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_coordinates() {
        let grid = LatLonGrid::from_array(Array2::zeros((4, 4))).unwrap();
        let lats = grid.lats();
        assert_relative_eq!(lats[0], 90.0);
        assert_relative_eq!(lats[3], -45.0);

        let grid = LatLonGrid::from_array(Array2::zeros((5, 9))).unwrap();
        let lats = grid.lats();
        let lons = grid.lons();
        assert_relative_eq!(lats[4], -90.0);
        assert_relative_eq!(lons[0], 0.0);
        assert_relative_eq!(lons[8], 360.0);
    }

    #[test]
    fn test_min_max() {
        let data = Array2::from_shape_fn((4, 8), |(i, j)| (i * 8 + j) as f64);
        let grid = LatLonGrid::from_array(data).unwrap();
        assert_relative_eq!(grid.min(), 0.0);
        assert_relative_eq!(grid.max(), 31.0);
    }
}

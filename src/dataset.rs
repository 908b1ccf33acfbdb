use crate::grid::LatLonGrid;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A single labeled 2-D variable with its coordinate vectors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DataArray {
    pub name: String,
    /// Display name, e.g. "Br".
    pub long_name: String,
    /// Physical unit, e.g. "nT".
    pub units: String,
    /// Latitudes of the rows in degrees.
    pub lats: Vec<f64>,
    /// Longitudes of the columns in degrees.
    pub lons: Vec<f64>,
    pub values: Array2<f64>,
}

impl DataArray {
    pub(crate) fn from_grid(grid: &LatLonGrid, name: &str, long_name: &str, units: &str) -> Self {
        Self {
            name: name.to_string(),
            long_name: long_name.to_string(),
            units: units.to_string(),
            lats: grid.lats(),
            lons: grid.lons(),
            values: grid.values().clone(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }
}

/// Attributes shared by every array of a [`Dataset`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatasetAttrs {
    pub title: String,
    pub description: String,
    pub comment: String,
    pub nlat: usize,
    pub nlon: usize,
    pub lmax: usize,
    /// Sampling scheme identifier, e.g. "DH".
    pub grid: String,
    /// Semimajor axis of the reference ellipsoid, in meters.
    pub a: f64,
    /// Flattening of the reference ellipsoid.
    pub f: f64,
    pub lmax_calc: usize,
    pub sampling: usize,
    pub n: usize,
    pub extend: bool,
}

/// Labeled multi-dimensional dataset: one data array per gridded field plus
/// the shared attribute set. The crate writes no file itself; everything is
/// serde-serializable so callers can persist it however they like.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dataset {
    pub attrs: DatasetAttrs,
    pub arrays: Vec<DataArray>,
}

impl Dataset {
    /// Look up a data array by name.
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name == name)
    }
}

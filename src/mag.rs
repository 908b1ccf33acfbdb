use crate::dataset::{DataArray, Dataset, DatasetAttrs};
use crate::error::MagGridError;
use crate::grid::{GridKind, LatLonGrid};
use crate::plot::{draw_err, layout_scale, render_grid, save_grid, PlotOptions, COMBINED_WIDTH};
use ndarray::Array2;
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default colorbar labels of the per-field plots.
pub const CB_LABEL_RAD: &str = "Br, nT";
pub const CB_LABEL_THETA: &str = "Bθ, nT";
pub const CB_LABEL_PHI: &str = "Bφ, nT";
pub const CB_LABEL_TOTAL: &str = "|B|, nT";
pub const CB_LABEL_POT: &str = "Potential, nT·m";

/// Grids of the magnetic potential, the three vector components of the
/// magnetic field, and the total magnetic intensity, evaluated on a
/// reference ellipsoid.
///
/// Built from the output of a spherical harmonic expansion: five raw arrays
/// of matching shape plus the ellipsoid and degree metadata. Shape metadata
/// is derived from `rad` alone; the remaining four arrays are trusted to
/// match it and are not cross-checked (each is still individually validated
/// against the Driscoll and Healy layouts by the grid wrapper).
///
/// Cloning yields a fully independent bundle; the grids share no storage
/// with the original.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MagGrid {
    /// Radial component of the magnetic field, in nT.
    pub rad: LatLonGrid,
    /// Theta (southward) component of the magnetic field, in nT.
    pub theta: LatLonGrid,
    /// Phi (eastward) component of the magnetic field, in nT.
    pub phi: LatLonGrid,
    /// Total magnetic intensity, in nT.
    pub total: LatLonGrid,
    /// Magnetic potential, in m nT.
    pub pot: LatLonGrid,
    /// Semimajor axis of the reference ellipsoid, in meters.
    pub a: f64,
    /// Flattening of the reference ellipsoid, f = (a - b) / a.
    pub f: f64,
    /// Maximum spherical harmonic degree resolvable by the grids.
    pub lmax: usize,
    /// Maximum degree of the potential used when creating the grids.
    pub lmax_calc: usize,
}

impl MagGrid {
    /// Wrap the five raw field arrays.
    ///
    /// `lmax_calc` is stored as given, never clamped against `lmax`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rad: Array2<f64>,
        theta: Array2<f64>,
        phi: Array2<f64>,
        total: Array2<f64>,
        pot: Array2<f64>,
        a: f64,
        f: f64,
        lmax: usize,
        lmax_calc: usize,
    ) -> Result<Self, MagGridError> {
        Ok(Self {
            rad: LatLonGrid::from_array(rad)?,
            theta: LatLonGrid::from_array(theta)?,
            phi: LatLonGrid::from_array(phi)?,
            total: LatLonGrid::from_array(total)?,
            pot: LatLonGrid::from_array(pot)?,
            a,
            f,
            lmax,
            lmax_calc,
        })
    }

    pub fn grid_kind(&self) -> GridKind {
        self.rad.kind()
    }

    pub fn sampling(&self) -> usize {
        self.rad.sampling()
    }

    pub fn nlat(&self) -> usize {
        self.rad.nlat()
    }

    pub fn nlon(&self) -> usize {
        self.rad.nlon()
    }

    pub fn n(&self) -> usize {
        self.rad.n()
    }

    pub fn extend(&self) -> bool {
        self.rad.extend()
    }

    /// Print the summary block to standard output.
    pub fn info(&self) {
        println!("{self}");
    }

    /// Plot the radial component of the magnetic field to an image file.
    pub fn plot_rad(&self, opts: &PlotOptions, fname: impl AsRef<Path>) -> Result<(), MagGridError> {
        save_grid(&self.rad, opts, fname.as_ref(), CB_LABEL_RAD)
    }

    /// Plot the radial component onto a caller-supplied drawing area.
    pub fn plot_rad_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        opts: &PlotOptions,
    ) -> Result<(), MagGridError> {
        render_grid(&self.rad, area, opts, CB_LABEL_RAD)
    }

    /// Plot the theta component of the magnetic field to an image file.
    pub fn plot_theta(
        &self,
        opts: &PlotOptions,
        fname: impl AsRef<Path>,
    ) -> Result<(), MagGridError> {
        save_grid(&self.theta, opts, fname.as_ref(), CB_LABEL_THETA)
    }

    /// Plot the theta component onto a caller-supplied drawing area.
    pub fn plot_theta_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        opts: &PlotOptions,
    ) -> Result<(), MagGridError> {
        render_grid(&self.theta, area, opts, CB_LABEL_THETA)
    }

    /// Plot the phi component of the magnetic field to an image file.
    pub fn plot_phi(&self, opts: &PlotOptions, fname: impl AsRef<Path>) -> Result<(), MagGridError> {
        save_grid(&self.phi, opts, fname.as_ref(), CB_LABEL_PHI)
    }

    /// Plot the phi component onto a caller-supplied drawing area.
    pub fn plot_phi_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        opts: &PlotOptions,
    ) -> Result<(), MagGridError> {
        render_grid(&self.phi, area, opts, CB_LABEL_PHI)
    }

    /// Plot the total magnetic intensity to an image file.
    pub fn plot_total(
        &self,
        opts: &PlotOptions,
        fname: impl AsRef<Path>,
    ) -> Result<(), MagGridError> {
        save_grid(&self.total, opts, fname.as_ref(), CB_LABEL_TOTAL)
    }

    /// Plot the total magnetic intensity onto a caller-supplied drawing area.
    pub fn plot_total_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        opts: &PlotOptions,
    ) -> Result<(), MagGridError> {
        render_grid(&self.total, area, opts, CB_LABEL_TOTAL)
    }

    /// Plot the magnetic potential to an image file.
    pub fn plot_pot(&self, opts: &PlotOptions, fname: impl AsRef<Path>) -> Result<(), MagGridError> {
        save_grid(&self.pot, opts, fname.as_ref(), CB_LABEL_POT)
    }

    /// Plot the magnetic potential onto a caller-supplied drawing area.
    pub fn plot_pot_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        opts: &PlotOptions,
    ) -> Result<(), MagGridError> {
        render_grid(&self.pot, area, opts, CB_LABEL_POT)
    }

    /// Plot the three vector components and the total intensity in a 2x2
    /// layout onto a caller-supplied drawing area, returning the four panel
    /// areas. The potential is not part of the combined view. Panel titles
    /// are suppressed; each panel keeps its own colorbar and default label.
    /// [`PlotOptions::combined`] carries the defaults suited to this denser
    /// layout (60 degree longitude ticks, horizontal colorbars).
    pub fn plot_on<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        opts: &PlotOptions,
    ) -> Result<Vec<DrawingArea<DB, Shift>>, MagGridError> {
        let panels = area.split_evenly((2, 2));
        let panel_opts = PlotOptions {
            title: None,
            ..opts.clone()
        };
        let fields = [
            (&self.rad, CB_LABEL_RAD),
            (&self.theta, CB_LABEL_THETA),
            (&self.phi, CB_LABEL_PHI),
            (&self.total, CB_LABEL_TOTAL),
        ];
        for (panel, (grid, label)) in panels.iter().zip(fields) {
            render_grid(grid, panel, &panel_opts, label)?;
        }
        Ok(panels)
    }

    /// Plot the combined 2x2 figure to an image file, with
    /// [`PlotOptions::combined`] as the usual configuration. The figure
    /// height follows the colorbar orientation: 0.8 of the width for
    /// horizontal, 0.5 for vertical, 0.6 without a colorbar.
    pub fn plot(&self, opts: &PlotOptions, fname: impl AsRef<Path>) -> Result<(), MagGridError> {
        let width = COMBINED_WIDTH;
        let height = (width as f64 * layout_scale(opts.colorbar)).round() as u32;
        let root = BitMapBackend::new(fname.as_ref(), (width, height)).into_drawing_area();
        self.plot_on(&root, opts)?;
        root.present().map_err(draw_err)
    }

    /// Export all gridded data as a labeled dataset.
    pub fn to_dataset(&self, title: &str, description: &str, comment: &str) -> Dataset {
        let attrs = DatasetAttrs {
            title: title.to_string(),
            description: description.to_string(),
            comment: comment.to_string(),
            nlat: self.nlat(),
            nlon: self.nlon(),
            lmax: self.lmax,
            grid: self.grid_kind().to_string(),
            a: self.a,
            f: self.f,
            lmax_calc: self.lmax_calc,
            sampling: self.sampling(),
            n: self.n(),
            extend: self.extend(),
        };
        let arrays = vec![
            DataArray::from_grid(&self.rad, "radial", "Br", "nT"),
            DataArray::from_grid(&self.theta, "theta", "Bθ", "nT"),
            DataArray::from_grid(&self.phi, "phi", "Bφ", "nT"),
            DataArray::from_grid(&self.total, "total", "|B|", "nT"),
            DataArray::from_grid(&self.pot, "potential", "potential", "m nT"),
        ];
        Dataset { attrs, arrays }
    }
}

impl fmt::Display for MagGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "grid = {}", self.grid_kind())?;
        writeln!(f, "nlat = {}", self.nlat())?;
        writeln!(f, "nlon = {}", self.nlon())?;
        writeln!(f, "n = {}", self.n())?;
        writeln!(f, "sampling = {}", self.sampling())?;
        writeln!(f, "extend = {}", self.extend())?;
        writeln!(f, "lmax = {}", self.lmax)?;
        writeln!(f, "lmax_calc = {}", self.lmax_calc)?;
        writeln!(f, "a (m) = {:e}", self.a)?;
        write!(f, "f = {:e}", self.f)
    }
}

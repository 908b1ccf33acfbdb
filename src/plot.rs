use crate::cmap::Colormap;
use crate::error::MagGridError;
use crate::grid::LatLonGrid;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Pixel size of single-field figures saved to file.
pub const SINGLE_FIGSIZE: (u32, u32) = (800, 500);

/// Pixel width of the combined four panel figure; its height follows from
/// [`layout_scale`].
pub const COMBINED_WIDTH: u32 = 1000;

const CB_WIDTH: i32 = 90;
const CB_HEIGHT: i32 = 70;

/// Orientation of the colorbar attached to a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Colorbar {
    Horizontal,
    Vertical,
}

impl FromStr for Colorbar {
    type Err = MagGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Colorbar::Horizontal),
            "vertical" => Ok(Colorbar::Vertical),
            other => Err(MagGridError::InvalidColorbar(other.to_string())),
        }
    }
}

impl fmt::Display for Colorbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colorbar::Horizontal => write!(f, "horizontal"),
            Colorbar::Vertical => write!(f, "vertical"),
        }
    }
}

/// Which ends of the colorbar are capped with out-of-range triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CbTriangles {
    #[default]
    Neither,
    Both,
    Min,
    Max,
}

/// Map projection applied to the gridded data before drawing. Only
/// meaningful for the global Driscoll and Healy grids this crate holds;
/// leaving the projection unset gives a plain rectangular plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Equal-area pseudocylindrical projection centered on 180 E.
    Mollweide,
}

/// Lower and upper limits of the data range used by the colormap, with an
/// optional interval. When the interval is set, the map is quantized into
/// `(upper - lower) / interval` discrete color bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CmapLimits {
    pub lower: f64,
    pub upper: f64,
    pub interval: Option<f64>,
}

/// Configuration for grid plots. Every field has a documented default;
/// `..Default::default()` keeps call sites short.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Map projection; `None` plots on rectangular lat/lon axes.
    pub projection: Option<Projection>,
    /// Major tick spacing in degrees for the (longitude, latitude) axes.
    /// `None` on either axis suppresses its ticks. Default `(30, 30)`.
    pub tick_interval: (Option<f64>, Option<f64>),
    /// Minor tick spacing in degrees; default none.
    pub minor_tick_interval: (Option<f64>, Option<f64>),
    /// Longitude axis label.
    pub xlabel: Option<String>,
    /// Latitude axis label.
    pub ylabel: Option<String>,
    /// Figure title.
    pub title: Option<String>,
    /// Colorbar orientation; default vertical, `None` for no colorbar.
    pub colorbar: Option<Colorbar>,
    /// Color map, default viridis.
    pub cmap: Colormap,
    /// Colormap limits; default is the data minimum and maximum.
    pub cmap_limits: Option<CmapLimits>,
    /// Reverse the sense of the color progression.
    pub cmap_reverse: bool,
    /// Out-of-range indicator triangles on the colorbar ends.
    pub cb_triangles: CbTriangles,
    /// Colorbar text label; each field plot supplies its own default.
    pub cb_label: Option<String>,
    /// Colorbar tick spacing in data units; default picks about 5 ticks.
    pub cb_tick_interval: Option<f64>,
    /// Overlay major grid lines.
    pub grid: bool,
    /// Font size of the title.
    pub titlesize: Option<u32>,
    /// Font size of the axis labels.
    pub axes_labelsize: Option<u32>,
    /// Font size of the tick labels.
    pub tick_labelsize: Option<u32>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            projection: None,
            tick_interval: (Some(30.0), Some(30.0)),
            minor_tick_interval: (None, None),
            xlabel: None,
            ylabel: None,
            title: None,
            colorbar: Some(Colorbar::Vertical),
            cmap: Colormap::default(),
            cmap_limits: None,
            cmap_reverse: false,
            cb_triangles: CbTriangles::default(),
            cb_label: None,
            cb_tick_interval: None,
            grid: false,
            titlesize: None,
            axes_labelsize: None,
            tick_labelsize: None,
        }
    }
}

impl PlotOptions {
    /// Defaults for the combined four panel figure: wider longitude tick
    /// spacing, shared axis labels, a horizontal colorbar and smaller fonts
    /// to suit the denser layout.
    pub fn combined() -> Self {
        Self {
            tick_interval: (Some(60.0), Some(30.0)),
            xlabel: Some("Longitude".to_string()),
            ylabel: Some("Latitude".to_string()),
            colorbar: Some(Colorbar::Horizontal),
            axes_labelsize: Some(9),
            tick_labelsize: Some(8),
            ..Default::default()
        }
    }
}

/// Height to width ratio of the combined four panel figure, sized so the
/// panels stay readable next to their colorbars.
pub fn layout_scale(colorbar: Option<Colorbar>) -> f64 {
    match colorbar {
        Some(Colorbar::Horizontal) => 0.8,
        Some(Colorbar::Vertical) => 0.5,
        None => 0.6,
    }
}

pub(crate) fn resolve_cb_label<'a>(opts: &'a PlotOptions, default: &'a str) -> &'a str {
    opts.cb_label.as_deref().unwrap_or(default)
}

pub(crate) fn draw_err<E: fmt::Display>(e: E) -> MagGridError {
    MagGridError::Plot(e.to_string())
}

/// Forward Mollweide projection of a grid coordinate, central meridian at
/// 180 E, unit sphere. Returns (x, y) with x in [-2*sqrt(2), 2*sqrt(2)] and
/// y in [-sqrt(2), sqrt(2)].
pub fn mollweide(lon: f64, lat: f64) -> (f64, f64) {
    let phi = lat.to_radians();
    let lam = (lon - 180.0).to_radians();
    let theta = if phi.abs() >= FRAC_PI_2 - 1e-12 {
        phi.signum() * FRAC_PI_2
    } else {
        // Solve 2*theta + sin(2*theta) = pi * sin(phi) by Newton iteration.
        let rhs = PI * phi.sin();
        let mut theta = phi;
        for _ in 0..25 {
            let f = 2.0 * theta + (2.0 * theta).sin() - rhs;
            let fp = 2.0 + 2.0 * (2.0 * theta).cos();
            if fp.abs() < 1e-12 {
                break;
            }
            let next = theta - f / fp;
            if (next - theta).abs() < 1e-12 {
                theta = next;
                break;
            }
            theta = next;
        }
        theta
    };
    let x = 2.0 * SQRT_2 / PI * lam * theta.cos();
    let y = SQRT_2 * theta.sin();
    (x, y)
}

/// Render one grid, with optional colorbar and projection, into the given
/// drawing area.
pub(crate) fn render_grid<DB: DrawingBackend>(
    grid: &LatLonGrid,
    area: &DrawingArea<DB, Shift>,
    opts: &PlotOptions,
    default_cb_label: &str,
) -> Result<(), MagGridError> {
    area.fill(&WHITE).map_err(draw_err)?;

    let (lo, hi, interval) = match opts.cmap_limits {
        Some(CmapLimits {
            lower,
            upper,
            interval,
        }) => (lower, upper, interval),
        None => (grid.min(), grid.max(), None),
    };
    let hi = if hi > lo { hi } else { lo + 1.0 };
    let span = hi - lo;
    let color_of = move |v: f64| {
        let mut t = ((v - lo) / span).clamp(0.0, 1.0);
        if let Some(step) = interval {
            if step > 0.0 {
                let bands = (span / step).round().max(1.0);
                t = ((t * bands).floor().min(bands - 1.0) + 0.5) / bands;
            }
        }
        opts.cmap.color(t, opts.cmap_reverse)
    };

    let (dim_x, dim_y) = area.dim_in_pixel();
    let (plot_area, cb_area) = match opts.colorbar {
        Some(Colorbar::Vertical) => {
            let (left, right) = area.split_horizontally(dim_x as i32 - CB_WIDTH);
            (left, Some(right))
        }
        Some(Colorbar::Horizontal) => {
            let (top, bottom) = area.split_vertically(dim_y as i32 - CB_HEIGHT);
            (top, Some(bottom))
        }
        None => (area.clone(), None),
    };

    match opts.projection {
        None => render_rectangular(grid, &plot_area, opts, &color_of)?,
        Some(Projection::Mollweide) => render_mollweide(grid, &plot_area, opts, &color_of)?,
    }

    if let (Some(orientation), Some(cb_area)) = (opts.colorbar, cb_area) {
        render_colorbar(
            &cb_area,
            orientation,
            lo,
            hi,
            &color_of,
            opts,
            resolve_cb_label(opts, default_cb_label),
        )?;
    }
    Ok(())
}

fn render_rectangular<DB: DrawingBackend>(
    grid: &LatLonGrid,
    area: &DrawingArea<DB, Shift>,
    opts: &PlotOptions,
    color_of: &impl Fn(f64) -> RGBColor,
) -> Result<(), MagGridError> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(8)
        .x_label_area_size(40)
        .y_label_area_size(50);
    if let Some(title) = &opts.title {
        builder.caption(title, ("sans-serif", opts.titlesize.unwrap_or(20) as f64));
    }
    let mut chart = builder
        .build_cartesian_2d(0.0..360.0, -90.0..90.0)
        .map_err(draw_err)?;

    let lat_step = 180.0 / grid.n() as f64;
    let lon_step = 360.0 / (grid.n() * grid.sampling()) as f64;
    chart
        .draw_series(grid.values().indexed_iter().map(|((i, j), &v)| {
            let x0 = j as f64 * lon_step;
            let y1 = 90.0 - i as f64 * lat_step;
            Rectangle::new(
                [(x0, y1 - lat_step), (x0 + lon_step, y1)],
                color_of(v).filled(),
            )
        }))
        .map_err(draw_err)?;

    let axes_size = opts.axes_labelsize.unwrap_or(14) as f64;
    let tick_size = opts.tick_labelsize.unwrap_or(11) as f64;
    let mut mesh = chart.configure_mesh();
    mesh.axis_desc_style(("sans-serif", axes_size))
        .label_style(("sans-serif", tick_size));
    if let Some(xlabel) = &opts.xlabel {
        mesh.x_desc(xlabel);
    }
    if let Some(ylabel) = &opts.ylabel {
        mesh.y_desc(ylabel);
    }
    match opts.tick_interval.0 {
        Some(dx) if dx > 0.0 => {
            mesh.x_labels((360.0 / dx).round() as usize + 1);
        }
        _ => {
            mesh.x_labels(0);
        }
    }
    match opts.tick_interval.1 {
        Some(dy) if dy > 0.0 => {
            mesh.y_labels((180.0 / dy).round() as usize + 1);
        }
        _ => {
            mesh.y_labels(0);
        }
    }
    if opts.grid {
        mesh.bold_line_style(BLACK.mix(0.3));
    } else {
        mesh.bold_line_style(TRANSPARENT);
    }
    match (opts.minor_tick_interval.0, opts.tick_interval.0) {
        (Some(minor), Some(major)) if minor > 0.0 => {
            mesh.x_max_light_lines((major / minor).round().max(1.0) as usize);
        }
        _ => {}
    }
    match (opts.minor_tick_interval.1, opts.tick_interval.1) {
        (Some(minor), Some(major)) if minor > 0.0 => {
            mesh.y_max_light_lines((major / minor).round().max(1.0) as usize);
        }
        _ => {}
    }
    if opts.minor_tick_interval.0.is_none() && opts.minor_tick_interval.1.is_none() {
        mesh.light_line_style(TRANSPARENT);
    }
    mesh.draw().map_err(draw_err)?;
    Ok(())
}

fn render_mollweide<DB: DrawingBackend>(
    grid: &LatLonGrid,
    area: &DrawingArea<DB, Shift>,
    opts: &PlotOptions,
    color_of: &impl Fn(f64) -> RGBColor,
) -> Result<(), MagGridError> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(8);
    if let Some(title) = &opts.title {
        builder.caption(title, ("sans-serif", opts.titlesize.unwrap_or(20) as f64));
    }
    // Projected axes carry no graticule labels; ranges pad the projection
    // envelope of the unit sphere.
    let mut chart = builder
        .build_cartesian_2d(-2.9..2.9, -1.5..1.5)
        .map_err(draw_err)?;

    let lat_step = 180.0 / grid.n() as f64;
    let lon_step = 360.0 / (grid.n() * grid.sampling()) as f64;
    chart
        .draw_series(grid.values().indexed_iter().map(|((i, j), &v)| {
            let lon0 = j as f64 * lon_step;
            let lon1 = lon0 + lon_step;
            let lat1 = 90.0 - i as f64 * lat_step;
            let lat0 = lat1 - lat_step;
            Polygon::new(
                vec![
                    mollweide(lon0, lat0),
                    mollweide(lon1, lat0),
                    mollweide(lon1, lat1),
                    mollweide(lon0, lat1),
                ],
                color_of(v).filled(),
            )
        }))
        .map_err(draw_err)?;
    Ok(())
}

fn render_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    orientation: Colorbar,
    lo: f64,
    hi: f64,
    color_of: &impl Fn(f64) -> RGBColor,
    opts: &PlotOptions,
    label: &str,
) -> Result<(), MagGridError> {
    let (cap_min, cap_max) = match opts.cb_triangles {
        CbTriangles::Neither => (false, false),
        CbTriangles::Both => (true, true),
        CbTriangles::Min => (true, false),
        CbTriangles::Max => (false, true),
    };
    // End triangles occupy a sliver of the data range instead of the margin,
    // so the tick axis and the strip stay aligned.
    let pad = 0.04 * (hi - lo);
    let strip_lo = if cap_min { lo + pad } else { lo };
    let strip_hi = if cap_max { hi - pad } else { hi };
    let n_labels = match opts.cb_tick_interval {
        Some(dt) if dt > 0.0 => ((hi - lo) / dt).round() as usize + 1,
        _ => 5,
    };
    let axes_size = opts.axes_labelsize.unwrap_or(12) as f64;
    let tick_size = opts.tick_labelsize.unwrap_or(10) as f64;
    const STEPS: usize = 128;
    let dv = (strip_hi - strip_lo) / STEPS as f64;

    match orientation {
        Colorbar::Vertical => {
            let mut chart = ChartBuilder::on(area)
                .margin(8)
                .y_label_area_size(55)
                .build_cartesian_2d(0.0..1.0, lo..hi)
                .map_err(draw_err)?;
            chart
                .draw_series((0..STEPS).map(|k| {
                    let v0 = strip_lo + k as f64 * dv;
                    Rectangle::new([(0.0, v0), (1.0, v0 + dv)], color_of(v0 + 0.5 * dv).filled())
                }))
                .map_err(draw_err)?;
            if cap_min {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        vec![(0.0, strip_lo), (1.0, strip_lo), (0.5, lo)],
                        color_of(lo).filled(),
                    )))
                    .map_err(draw_err)?;
            }
            if cap_max {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        vec![(0.0, strip_hi), (1.0, strip_hi), (0.5, hi)],
                        color_of(hi).filled(),
                    )))
                    .map_err(draw_err)?;
            }
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(0)
                .y_labels(n_labels)
                .y_desc(label)
                .axis_desc_style(("sans-serif", axes_size))
                .label_style(("sans-serif", tick_size))
                .draw()
                .map_err(draw_err)?;
        }
        Colorbar::Horizontal => {
            let mut chart = ChartBuilder::on(area)
                .margin(8)
                .x_label_area_size(35)
                .build_cartesian_2d(lo..hi, 0.0..1.0)
                .map_err(draw_err)?;
            chart
                .draw_series((0..STEPS).map(|k| {
                    let v0 = strip_lo + k as f64 * dv;
                    Rectangle::new([(v0, 0.0), (v0 + dv, 1.0)], color_of(v0 + 0.5 * dv).filled())
                }))
                .map_err(draw_err)?;
            if cap_min {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        vec![(strip_lo, 0.0), (strip_lo, 1.0), (lo, 0.5)],
                        color_of(lo).filled(),
                    )))
                    .map_err(draw_err)?;
            }
            if cap_max {
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        vec![(strip_hi, 0.0), (strip_hi, 1.0), (hi, 0.5)],
                        color_of(hi).filled(),
                    )))
                    .map_err(draw_err)?;
            }
            chart
                .configure_mesh()
                .disable_mesh()
                .y_labels(0)
                .x_labels(n_labels)
                .x_desc(label)
                .axis_desc_style(("sans-serif", axes_size))
                .label_style(("sans-serif", tick_size))
                .draw()
                .map_err(draw_err)?;
        }
    }
    Ok(())
}

/// Render one grid to an image file, sized [`SINGLE_FIGSIZE`]. The format is
/// inferred from the file extension by the backend.
pub(crate) fn save_grid(
    grid: &LatLonGrid,
    opts: &PlotOptions,
    fname: &Path,
    default_cb_label: &str,
) -> Result<(), MagGridError> {
    let root = BitMapBackend::new(fname, SINGLE_FIGSIZE).into_drawing_area();
    render_grid(grid, &root, opts, default_cb_label)?;
    root.present().map_err(draw_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_colorbar_from_str() {
        assert_eq!("horizontal".parse::<Colorbar>().unwrap(), Colorbar::Horizontal);
        assert_eq!("vertical".parse::<Colorbar>().unwrap(), Colorbar::Vertical);

        let err = "sideways".parse::<Colorbar>().unwrap_err();
        assert!(matches!(err, MagGridError::InvalidColorbar(ref v) if v == "sideways"));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_layout_scale() {
        assert_approx_eq!(layout_scale(Some(Colorbar::Horizontal)), 0.8);
        assert_approx_eq!(layout_scale(Some(Colorbar::Vertical)), 0.5);
        assert_approx_eq!(layout_scale(None), 0.6);
    }

    #[test]
    fn test_combined_defaults() {
        let opts = PlotOptions::combined();
        assert_eq!(opts.tick_interval, (Some(60.0), Some(30.0)));
        assert_eq!(opts.colorbar, Some(Colorbar::Horizontal));
        assert_eq!(opts.xlabel.as_deref(), Some("Longitude"));
        assert_eq!(opts.ylabel.as_deref(), Some("Latitude"));
        assert_eq!(opts.axes_labelsize, Some(9));
        assert_eq!(opts.tick_labelsize, Some(8));
        // Everything else follows the single-field defaults.
        assert!(opts.title.is_none());
        assert!(!opts.grid);
    }

    #[test]
    fn test_resolve_cb_label() {
        let opts = PlotOptions::default();
        assert_eq!(resolve_cb_label(&opts, "Br, nT"), "Br, nT");

        let opts = PlotOptions {
            cb_label: Some("custom".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_cb_label(&opts, "Br, nT"), "custom");
    }

    #[test]
    fn test_mollweide_fixed_points() {
        // Central meridian, equator.
        let (x, y) = mollweide(180.0, 0.0);
        assert_approx_eq!(x, 0.0, 1e-9);
        assert_approx_eq!(y, 0.0, 1e-9);

        // North pole maps to the top of the ellipse.
        let (x, y) = mollweide(0.0, 90.0);
        assert_approx_eq!(x, 0.0, 1e-9);
        assert_approx_eq!(y, SQRT_2, 1e-9);

        // Westernmost equator point reaches the full width.
        let (x, _) = mollweide(0.0, 0.0);
        assert_approx_eq!(x, -2.0 * SQRT_2, 1e-9);
    }

    #[test]
    fn test_mollweide_symmetry() {
        let (x_n, y_n) = mollweide(90.0, 45.0);
        let (x_s, y_s) = mollweide(90.0, -45.0);
        assert_approx_eq!(x_n, x_s, 1e-9);
        assert_approx_eq!(y_n, -y_s, 1e-9);
    }
}

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Anchor colors for the viridis progression, dark purple to yellow.
const VIRIDIS: &[(u8, u8, u8)] = &[
    (68, 1, 84),
    (72, 40, 120),
    (62, 74, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (109, 205, 89),
    (180, 222, 44),
    (253, 231, 37),
];

const PLASMA: &[(u8, u8, u8)] = &[
    (13, 8, 135),
    (84, 2, 163),
    (139, 10, 165),
    (185, 50, 137),
    (219, 92, 104),
    (244, 136, 73),
    (254, 188, 43),
    (240, 249, 33),
];

const GREYS: &[(u8, u8, u8)] = &[(255, 255, 255), (0, 0, 0)];

/// Color map used when rendering grid values and colorbars.
///
/// Colors are produced by piecewise-linear interpolation between a table of
/// anchor colors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Viridis,
    Plasma,
    Greys,
}

impl Colormap {
    fn anchors(&self) -> &'static [(u8, u8, u8)] {
        match self {
            Colormap::Viridis => VIRIDIS,
            Colormap::Plasma => PLASMA,
            Colormap::Greys => GREYS,
        }
    }

    /// Map a normalized value in [0, 1] to a color. Out-of-range input is
    /// clamped. `reverse` flips the sense of the color progression.
    pub fn color(&self, t: f64, reverse: bool) -> RGBColor {
        let t = if reverse { 1.0 - t } else { t }.clamp(0.0, 1.0);
        let anchors = self.anchors();
        let pos = t * (anchors.len() - 1) as f64;
        let i = (pos.floor() as usize).min(anchors.len() - 2);
        let frac = pos - i as f64;
        let (r0, g0, b0) = anchors[i];
        let (r1, g1, b1) = anchors[i + 1];
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(Colormap::Viridis.color(0.0, false), RGBColor(68, 1, 84));
        assert_eq!(Colormap::Viridis.color(1.0, false), RGBColor(253, 231, 37));
    }

    #[test]
    fn test_reverse_swaps_endpoints() {
        assert_eq!(Colormap::Viridis.color(0.0, true), RGBColor(253, 231, 37));
        assert_eq!(Colormap::Viridis.color(1.0, true), RGBColor(68, 1, 84));
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(
            Colormap::Greys.color(-3.0, false),
            Colormap::Greys.color(0.0, false)
        );
        assert_eq!(
            Colormap::Greys.color(7.0, false),
            Colormap::Greys.color(1.0, false)
        );
    }

    #[test]
    fn test_greys_midpoint() {
        let RGBColor(r, g, b) = Colormap::Greys.color(0.5, false);
        assert_eq!((r, g, b), (128, 128, 128));
    }
}

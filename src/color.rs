use palette::{LinSrgb, Mix, Srgb};

/// 8-bit sRGB colour used by every renderer.
pub type Rgb = Srgb<u8>;

pub use palette::named::{BLACK, BLUE, GRAY, RED, WHITE};

/// `#rrggbb` for SVG attributes.
pub fn svg_color(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Continuous colour map: numeric value → colour
// ---------------------------------------------------------------------------

/// Viridis sampled at nine evenly spaced points.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x47, 0x2c, 0x7a),
    (0x3b, 0x51, 0x8b),
    (0x2c, 0x71, 0x8e),
    (0x21, 0x90, 0x8d),
    (0x27, 0xad, 0x81),
    (0x5c, 0xc8, 0x63),
    (0xaa, 0xdc, 0x32),
    (0xfd, 0xe7, 0x25),
];

/// Maps values in `[min, max]` onto a gradient. Values outside the range
/// are clamped to the end colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    stops: Vec<LinSrgb>,
    pub min: f64,
    pub max: f64,
}

impl ColorMap {
    pub fn viridis(min: f64, max: f64) -> Self {
        let stops = VIRIDIS
            .iter()
            .map(|&(r, g, b)| Srgb::new(r, g, b).into_format::<f32>().into_linear())
            .collect();
        ColorMap { stops, min, max }
    }

    /// Build a map spanning the finite range of `values`.
    pub fn viridis_for(values: &[f64]) -> Self {
        let (min, max) = finite_range(values).unwrap_or((0.0, 1.0));
        Self::viridis(min, max)
    }

    /// Position of `value` within the range, in `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON || !value.is_finite() {
            return 0.5;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: f64) -> Rgb {
        let t = self.normalize(value) * (self.stops.len() - 1) as f64;
        let lo = (t.floor() as usize).min(self.stops.len() - 1);
        let hi = (lo + 1).min(self.stops.len() - 1);
        let mixed = self.stops[lo].mix(self.stops[hi], (t - lo as f64) as f32);
        let srgb: Srgb = Srgb::from_linear(mixed);
        srgb.into_format()
    }

    /// `n` evenly spaced `(value, colour)` pairs from `min` to `max`, for
    /// drawing a colour bar.
    pub fn gradient(&self, n: usize) -> Vec<(f64, Rgb)> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let v = self.min + (self.max - self.min) * i as f64 / (n - 1) as f64;
                (v, self.color_for(v))
            })
            .collect()
    }
}

/// `(min, max)` over the finite entries, `None` if there are none.
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: (u8, u8, u8)) -> bool {
        let d = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 1;
        d(a.red, b.0) && d(a.green, b.1) && d(a.blue, b.2)
    }

    #[test]
    fn endpoints_are_viridis_ends() {
        let cm = ColorMap::viridis(-36.0, -33.0);
        assert!(close(cm.color_for(-36.0), VIRIDIS[0]));
        assert!(close(cm.color_for(-33.0), VIRIDIS[8]));
        assert!(close(cm.color_for(-100.0), VIRIDIS[0]));
        assert!(close(cm.color_for(10.0), VIRIDIS[8]));
    }

    #[test]
    fn midpoint_hits_middle_stop() {
        let cm = ColorMap::viridis(0.0, 8.0);
        assert!(close(cm.color_for(4.0), VIRIDIS[4]));
    }

    #[test]
    fn flat_range_maps_to_middle() {
        let cm = ColorMap::viridis_for(&[2.0, 2.0]);
        assert_eq!(cm.normalize(2.0), 0.5);
    }

    #[test]
    fn finite_range_ignores_nan() {
        assert_eq!(finite_range(&[3.0, f64::NAN, -1.0]), Some((-1.0, 3.0)));
        assert_eq!(finite_range(&[]), None);
    }

    #[test]
    fn svg_color_is_hex() {
        assert_eq!(svg_color(RED), "#ff0000");
        assert_eq!(svg_color(GRAY), "#808080");
    }

    #[test]
    fn gradient_spans_range() {
        let g = ColorMap::viridis(0.0, 1.0).gradient(5);
        assert_eq!(g.len(), 5);
        assert_eq!(g[0].0, 0.0);
        assert_eq!(g[4].0, 1.0);
    }
}

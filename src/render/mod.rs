/// Figure rendering: every chart is drawn onto an SVG [`canvas::Canvas`]
/// in points (1 pt = 1/72 in), then rasterized to PNG by [`png::Rasterizer`].
///
/// ```text
///   CtdProfile / MetoceanSeries / SummaryTable
///        │
///        ▼
///   profile · timeseries · histogram · scatter · table   → Canvas
///        │
///        ▼
///   Rasterizer (resvg) → RGBA pixels → PNG (image)
/// ```

pub mod axes;
pub mod canvas;
pub mod png;
pub mod profile;
pub mod scatter;
pub mod histogram;
pub mod table;
pub mod timeseries;

use thiserror::Error;

pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("SVG error: {0}")]
    Svg(String),
    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("PNG encoding error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Figure size in inches, as given to the plotting calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl FigureSize {
    pub const fn new(width_in: f64, height_in: f64) -> Self {
        Self { width_in, height_in }
    }

    pub fn width_pt(&self) -> f64 {
        self.width_in * POINTS_PER_INCH
    }

    pub fn height_pt(&self) -> f64 {
        self.height_in * POINTS_PER_INCH
    }
}

/// The data rectangle of one set of axes, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Area inside a `width × height` figure after the given margins.
    pub fn with_margins(width: f64, height: f64, left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: (width - left - right).max(1.0),
            height: (height - top - bottom).max(1.0),
        }
    }
}

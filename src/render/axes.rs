use chrono::{DateTime, NaiveDateTime};

use crate::color::{Rgb, BLACK};

use super::canvas::{approx_text_width, Canvas, LineStyle, TextAnchor, TextBaseline, TextStyle};
use super::PlotArea;

/// Fraction of the data span added on each side of auto-scaled axes.
pub const MARGIN: f64 = 0.05;

const TICK_LENGTH: f64 = 3.5;
const TICK_LABEL_SIZE: f64 = 10.0;
const LABEL_SIZE: f64 = 10.0;
const GRID_COLOR: Rgb = Rgb::new(0xb0, 0xb0, 0xb0);

/// Axis configuration with tick generation and data→pixel mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    /// Draw `max` where `min` would normally go (depth axes).
    pub inverted: bool,
    pub label: String,
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
}

impl Axis {
    /// Exact limits, "nice number" ticks inside them.
    pub fn fixed(min: f64, max: f64, target_ticks: usize) -> Self {
        let (min, max) = widen_if_flat(min, max);
        let step = nice_step((max - min) / (target_ticks.max(2) - 1) as f64);
        let tick_positions = ticks_within(min, max, step);
        let tick_labels = tick_positions.iter().map(|&v| format_tick(v, step)).collect();
        Self {
            min,
            max,
            inverted: false,
            label: String::new(),
            tick_positions,
            tick_labels,
        }
    }

    /// Data range widened by [`MARGIN`] on both sides.
    pub fn padded(data_min: f64, data_max: f64, target_ticks: usize) -> Self {
        let (lo, hi) = widen_if_flat(data_min, data_max);
        let pad = (hi - lo) * MARGIN;
        Self::fixed(lo - pad, hi + pad, target_ticks)
    }

    /// Time axis over `[start, end]` (padded), values in seconds since the
    /// epoch, ticks on calendar-aligned steps.
    pub fn time(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let (lo, hi) = widen_if_flat(seconds(start), seconds(end));
        let pad = (hi - lo) * MARGIN;
        let (min, max) = (lo - pad, hi + pad);

        const STEPS: [i64; 9] = [
            600, 1_800, 3_600, 10_800, 21_600, 43_200, 86_400, 172_800, 604_800,
        ];
        let step = STEPS
            .iter()
            .copied()
            .find(|&s| (max - min) / (s as f64) <= 8.0)
            .unwrap_or(604_800) as f64;
        let format = if step >= 86_400.0 { "%Y-%m-%d" } else { "%m-%d %H:%M" };

        let tick_positions = ticks_within(min, max, step);
        let tick_labels = tick_positions
            .iter()
            .map(|&v| {
                DateTime::from_timestamp(v as i64, 0)
                    .map(|dt| dt.naive_utc().format(format).to_string())
                    .unwrap_or_default()
            })
            .collect();
        Self {
            min,
            max,
            inverted: false,
            label: String::new(),
            tick_positions,
            tick_labels,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// `(bottom, top)` for a y axis (`(left, right)` for x), i.e. the
    /// limits in the order they are drawn.
    pub fn limits(&self) -> (f64, f64) {
        if self.inverted {
            (self.max, self.min)
        } else {
            (self.min, self.max)
        }
    }

    /// Map a data value onto `[px_start, px_end]`, where `px_start` is the
    /// end the first limit is drawn at.
    pub fn data_to_pixel(&self, value: f64, px_start: f64, px_end: f64) -> f64 {
        let (first, last) = self.limits();
        let frac = (value - first) / (last - first);
        px_start + frac * (px_end - px_start)
    }

    pub fn x_px(&self, value: f64, area: &PlotArea) -> f64 {
        self.data_to_pixel(value, area.left, area.right())
    }

    pub fn y_px(&self, value: f64, area: &PlotArea) -> f64 {
        self.data_to_pixel(value, area.bottom(), area.top)
    }
}

pub fn seconds(t: NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

fn widen_if_flat(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if (max - min).abs() < 1e-12 {
        let half = if min.abs() > 1e-12 { min.abs() * 0.05 } else { 0.5 };
        (min - half, max + half)
    } else {
        (min.min(max), min.max(max))
    }
}

fn ticks_within(min: f64, max: f64, step: f64) -> Vec<f64> {
    let eps = step * 1e-6;
    let first = (min / step - 1e-9).ceil();
    let mut ticks = Vec::new();
    let mut i = 0.0;
    loop {
        let v = (first + i) * step;
        if v > max + eps {
            break;
        }
        ticks.push(v);
        i += 1.0;
    }
    ticks
}

fn nice_step(rough: f64) -> f64 {
    let exp = rough.abs().log10().floor();
    let frac = rough / 10.0_f64.powf(exp);
    let nice_frac = if frac <= 1.5 {
        1.0
    } else if frac <= 3.5 {
        2.0
    } else if frac <= 7.5 {
        5.0
    } else {
        10.0
    };
    nice_frac * 10.0_f64.powf(exp)
}

fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    // avoid "-0"
    let v = if value.abs() < step * 0.01 { 0.0 } else { value };
    format!("{v:.decimals$}")
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Decorations around one set of axes.
#[derive(Debug, Clone)]
pub struct AxesDecor<'a> {
    /// May contain `\n` for a second line.
    pub title: Option<&'a str>,
    pub title_size: f64,
    pub grid: bool,
    /// Degrees, counter-clockwise, for long x tick labels.
    pub x_tick_rotation: Option<f64>,
    pub y_tick_labels: bool,
}

impl Default for AxesDecor<'_> {
    fn default() -> Self {
        Self {
            title: None,
            title_size: 12.0,
            grid: false,
            x_tick_rotation: None,
            y_tick_labels: true,
        }
    }
}

/// Dashed lines at every visible major tick.
pub fn draw_grid(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis) {
    let grid_style = LineStyle::dashed(GRID_COLOR, 0.8).with_opacity(0.5);
    for &v in &x_axis.tick_positions {
        let px = x_axis.x_px(v, area);
        if px >= area.left - 0.5 && px <= area.right() + 0.5 {
            canvas.line(px, area.top, px, area.bottom(), &grid_style);
        }
    }
    for &v in &y_axis.tick_positions {
        let py = y_axis.y_px(v, area);
        if py >= area.top - 0.5 && py <= area.bottom() + 0.5 {
            canvas.line(area.left, py, area.right(), py, &grid_style);
        }
    }
}

/// Draw grid, frame, ticks, tick labels, axis labels and title.
pub fn draw_axes(canvas: &mut Canvas, area: &PlotArea, x_axis: &Axis, y_axis: &Axis, decor: &AxesDecor) {
    let frame_style = LineStyle::solid(BLACK, 0.8);
    let tick_style = LineStyle::solid(BLACK, 0.8);
    let tick_label = TextStyle::sized(TICK_LABEL_SIZE);

    let x_ticks: Vec<(f64, &String)> = x_axis
        .tick_positions
        .iter()
        .zip(&x_axis.tick_labels)
        .map(|(&v, l)| (x_axis.x_px(v, area), l))
        .filter(|(px, _)| *px >= area.left - 0.5 && *px <= area.right() + 0.5)
        .collect();
    let y_ticks: Vec<(f64, &String)> = y_axis
        .tick_positions
        .iter()
        .zip(&y_axis.tick_labels)
        .map(|(&v, l)| (y_axis.y_px(v, area), l))
        .filter(|(px, _)| *px >= area.top - 0.5 && *px <= area.bottom() + 0.5)
        .collect();

    if decor.grid {
        draw_grid(canvas, area, x_axis, y_axis);
    }

    canvas.line(area.left, area.top, area.right(), area.top, &frame_style);
    canvas.line(area.left, area.bottom(), area.right(), area.bottom(), &frame_style);
    canvas.line(area.left, area.top, area.left, area.bottom(), &frame_style);
    canvas.line(area.right(), area.top, area.right(), area.bottom(), &frame_style);

    let label_y = area.bottom() + TICK_LENGTH + 3.0;
    let mut x_label_depth = TICK_LABEL_SIZE;
    for &(px, label) in &x_ticks {
        canvas.line(px, area.bottom(), px, area.bottom() + TICK_LENGTH, &tick_style);
        match decor.x_tick_rotation {
            Some(angle) => {
                let style = tick_label.clone().anchored(TextAnchor::End, TextBaseline::Hanging);
                canvas.text_rotated(px, label_y, label, &style, -angle);
                let w = approx_text_width(label, &style);
                x_label_depth = x_label_depth.max(w * angle.to_radians().sin() + TICK_LABEL_SIZE);
            }
            None => {
                let style = tick_label.clone().anchored(TextAnchor::Middle, TextBaseline::Hanging);
                canvas.text(px, label_y, label, &style);
            }
        }
    }

    let mut y_label_width: f64 = 0.0;
    for &(py, label) in &y_ticks {
        canvas.line(area.left - TICK_LENGTH, py, area.left, py, &tick_style);
        if decor.y_tick_labels {
            let style = tick_label.clone().anchored(TextAnchor::End, TextBaseline::Central);
            canvas.text(area.left - TICK_LENGTH - 3.0, py, label, &style);
            y_label_width = y_label_width.max(approx_text_width(label, &style));
        }
    }

    let axis_label = TextStyle::sized(LABEL_SIZE);
    if !x_axis.label.is_empty() {
        let style = axis_label.clone().anchored(TextAnchor::Middle, TextBaseline::Hanging);
        canvas.text(area.center_x(), label_y + x_label_depth + 4.0, &x_axis.label, &style);
    }
    if !y_axis.label.is_empty() {
        let style = axis_label.anchored(TextAnchor::Middle, TextBaseline::Alphabetic);
        let x = area.left - TICK_LENGTH - 3.0 - y_label_width - 6.0;
        let y = area.top + area.height / 2.0;
        canvas.text_rotated(x, y, &y_axis.label, &style, -90.0);
    }

    if let Some(title) = decor.title {
        let style = TextStyle::sized(decor.title_size).anchored(TextAnchor::Middle, TextBaseline::Alphabetic);
        let lines: Vec<&str> = title.lines().collect();
        let line_height = decor.title_size * 1.2;
        for (i, line) in lines.iter().enumerate() {
            let from_bottom = (lines.len() - 1 - i) as f64;
            canvas.text(area.center_x(), area.top - 6.0 - from_bottom * line_height, line, &style);
        }
    }
}

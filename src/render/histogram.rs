use crate::color::{Rgb, BLACK};
use crate::stats::Histogram;

use super::axes::{draw_axes, draw_grid, AxesDecor, Axis};
use super::canvas::{Canvas, Style};
use super::{FigureSize, PlotArea};

pub const FIGURE: FigureSize = FigureSize::new(8.0, 5.0);

/// Salinity bins: 0.5 PSU wide, 30.0 to 35.5.
pub const SALINITY_BIN_START: f64 = 30.0;
pub const SALINITY_BIN_STOP: f64 = 35.5;
pub const SALINITY_BIN_WIDTH: f64 = 0.5;

const BAR_COLOR: Rgb = Rgb::new(0x1f, 0x77, 0xb4);

pub fn salinity_histogram(values: &[f64]) -> Histogram {
    let edges = Histogram::uniform_edges(SALINITY_BIN_START, SALINITY_BIN_STOP, SALINITY_BIN_WIDTH);
    Histogram::with_edges(edges, values)
}

/// Bar chart of `histogram` with the salinity labels.
pub fn render(histogram: &Histogram) -> Canvas {
    let mut canvas = Canvas::new(FIGURE);

    let x_axis = Axis::padded(SALINITY_BIN_START, SALINITY_BIN_STOP, 8).with_label("Salinity (PSU)");
    let top = (histogram.max_count().max(1) as f64) * 1.05;
    let y_axis = Axis::fixed(0.0, top, 6).with_label("Frequency");

    let area = PlotArea::with_margins(canvas.width, canvas.height, 60.0, 34.0, 16.0, 44.0);
    let bar_style = Style::filled(BAR_COLOR).with_stroke(BLACK, 1.0).with_opacity(0.75);

    draw_grid(&mut canvas, &area, &x_axis, &y_axis);

    for (left, right, count) in histogram.bins() {
        if count == 0 {
            continue;
        }
        let x0 = x_axis.x_px(left, &area);
        let x1 = x_axis.x_px(right, &area);
        let y_top = y_axis.y_px(count as f64, &area);
        canvas.rect(x0, y_top, x1 - x0, area.bottom() - y_top, &bar_style);
    }

    let decor = AxesDecor {
        title: Some("Salinity Distribution (30-35 PSU)"),
        ..Default::default()
    };
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, &decor);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salinity_edges_are_fixed() {
        let h = salinity_histogram(&[]);
        assert_eq!(h.edges.len(), 12);
        assert_eq!(h.edges.first(), Some(&30.0));
        assert_eq!(h.edges.last(), Some(&35.5));
        assert!(h.edges.windows(2).all(|w| (w[1] - w[0] - 0.5).abs() < 1e-12));
    }

    #[test]
    fn render_draws_one_bar_per_nonempty_bin() {
        let h = salinity_histogram(&[34.1, 34.2, 34.9, 35.1, 29.0]);
        assert_eq!(h.counts.iter().sum::<usize>(), 4);
        let svg = render(&h).finish_svg();
        assert_eq!(svg.matches(r##"fill="#1f77b4""##).count(), 3);
        assert!(svg.contains("Salinity Distribution (30-35 PSU)"));
        assert!(svg.contains("Frequency"));
    }
}

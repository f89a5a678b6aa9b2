use crate::color::{finite_range, Rgb, BLUE, RED};
use crate::data::loader::CTD_COLUMNS;
use crate::data::model::CtdProfile;

use super::axes::{draw_axes, AxesDecor, Axis};
use super::canvas::{Canvas, LineStyle, TextAnchor, TextBaseline, TextStyle};
use super::{FigureSize, PlotArea};

pub const FIGURE: FigureSize = FigureSize::new(8.0, 6.0);

pub const SUPTITLE: &str =
    "Temperature and Salinity data collected from CTD on the 29th of November 2008 at 06:52";

/// Shared depth axis: exactly `[max depth, 0]`, zero at the top.
pub fn depth_axis(profile: &CtdProfile) -> Axis {
    let max_depth = profile.max_depth().unwrap_or(1.0);
    Axis::fixed(0.0, max_depth, 7)
        .inverted()
        .with_label(CTD_COLUMNS[2])
}

struct Panel<'a> {
    title: &'a str,
    values: Vec<f64>,
    axis: Axis,
    color: Rgb,
    width: f64,
}

impl<'a> Panel<'a> {
    fn new(title: &'a str, label: &str, values: Vec<f64>, color: Rgb, width: f64) -> Self {
        let (lo, hi) = finite_range(&values).unwrap_or((0.0, 1.0));
        Self {
            title,
            axis: Axis::padded(lo, hi, 6).with_label(label),
            values,
            color,
            width,
        }
    }
}

/// Temperature and salinity against depth, side by side. Rows are drawn in
/// the order given; pass a depth-ordered profile for a continuous line.
pub fn render(profile: &CtdProfile) -> Canvas {
    let mut canvas = Canvas::new(FIGURE);
    let depth = depth_axis(profile);
    let depths = profile.depths();

    let panels = [
        Panel::new(
            "Temperature Profile",
            CTD_COLUMNS[3],
            profile.temperatures(),
            RED,
            2.0,
        ),
        Panel::new(
            "Salinity Profile",
            CTD_COLUMNS[4],
            profile.salinities(),
            BLUE,
            1.5,
        ),
    ];

    let (left, right, gap, top, bottom) = (62.0, 14.0, 18.0, 62.0, 44.0);
    let panel_width = (canvas.width - left - right - gap) / 2.0;
    let panel_height = canvas.height - top - bottom;

    let suptitle = TextStyle::sized(12.0).anchored(TextAnchor::Middle, TextBaseline::Hanging);
    canvas.text(canvas.width / 2.0, 10.0, SUPTITLE, &suptitle);

    for (i, panel) in panels.iter().enumerate() {
        let area = PlotArea {
            left: left + i as f64 * (panel_width + gap),
            top,
            width: panel_width,
            height: panel_height,
        };
        // shared y: only the left panel carries depth labels
        let y_axis = if i == 0 { depth.clone() } else { depth.clone().with_label("") };
        let decor = AxesDecor {
            title: Some(panel.title),
            grid: true,
            y_tick_labels: i == 0,
            ..Default::default()
        };
        draw_axes(&mut canvas, &area, &panel.axis, &y_axis, &decor);

        let points: Vec<(f64, f64)> = panel
            .values
            .iter()
            .zip(&depths)
            .map(|(&v, &d)| (panel.axis.x_px(v, &area), depth.y_px(d, &area)))
            .collect();
        canvas.push_clip(&area);
        canvas.polyline(&points, &LineStyle::solid(panel.color, panel.width));
        canvas.pop_clip();
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::order_by_depth;
    use crate::data::model::ProfileSample;

    fn sample(depth: f64, temperature: f64, salinity: f64) -> ProfileSample {
        ProfileSample {
            date: "11/29/2008".into(),
            time: "06:52:00".into(),
            depth,
            temperature,
            salinity,
        }
    }

    #[test]
    fn depth_limits_ignore_row_order() {
        let shallow_first = CtdProfile {
            samples: vec![sample(1.0, 20.0, 35.2), sample(250.0, 12.0, 34.8), sample(812.5, 5.0, 34.4)],
        };
        let mut rows = shallow_first.samples.clone();
        rows.reverse();
        let deep_first = CtdProfile { samples: rows };

        assert_eq!(depth_axis(&shallow_first).limits(), (812.5, 0.0));
        assert_eq!(depth_axis(&deep_first).limits(), (812.5, 0.0));
        assert_eq!(depth_axis(&shallow_first), depth_axis(&deep_first));
    }

    #[test]
    fn render_draws_both_panels() {
        let profile = order_by_depth(CtdProfile {
            samples: vec![sample(300.0, 9.0, 34.6), sample(2.0, 19.5, 35.3), sample(150.0, 14.0, 35.0)],
        });
        let svg = render(&profile).finish_svg();
        assert!(svg.contains("Temperature Profile"));
        assert!(svg.contains("Salinity Profile"));
        assert!(svg.contains(SUPTITLE));
        assert!(svg.contains("Depth (m)"));
        assert!(svg.contains(r##"stroke="#ff0000" stroke-width="2.00""##));
        assert!(svg.contains(r##"stroke="#0000ff" stroke-width="1.50""##));
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn render_empty_profile_does_not_panic() {
        let svg = render(&CtdProfile::default()).finish_svg();
        assert!(!svg.contains("<polyline"));
    }
}

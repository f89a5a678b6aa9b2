use crate::color::{finite_range, ColorMap, BLACK};
use crate::data::model::{MetoceanField, MetoceanSeries};

use super::axes::{draw_axes, AxesDecor, Axis};
use super::canvas::{approx_text_width, Canvas, LineStyle, Style, TextAnchor, TextBaseline, TextStyle};
use super::{FigureSize, PlotArea};

pub const FIGURE: FigureSize = FigureSize::new(8.0, 6.0);

/// Marker radius in points (a 36 pt² marker).
const MARKER_RADIUS: f64 = 3.0;
const COLORBAR_STEPS: usize = 64;

/// Wind speed against air temperature, each point coloured by latitude.
pub fn render(data: &MetoceanSeries) -> Canvas {
    let mut canvas = Canvas::new(FIGURE);

    let wind = data.column(MetoceanField::WindSpeedTrue);
    let air = data.column(MetoceanField::AirTemperature);
    let latitude = data.column(MetoceanField::Latitude);
    let color_map = ColorMap::viridis_for(&latitude);

    let (x_lo, x_hi) = finite_range(&wind).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = finite_range(&air).unwrap_or((0.0, 1.0));
    let x_axis = Axis::padded(x_lo, x_hi, 7).with_label("Wind Speed (m/s)");
    let y_axis = Axis::padded(y_lo, y_hi, 7).with_label("Air Temperature (°C)");

    let area = PlotArea::with_margins(canvas.width, canvas.height, 58.0, 34.0, 104.0, 44.0);
    let decor = AxesDecor {
        title: Some("Wind Speed vs Air Temperature (Colored by Latitude)"),
        grid: true,
        ..Default::default()
    };
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, &decor);

    canvas.push_clip(&area);
    for ((&x, &y), &lat) in wind.iter().zip(&air).zip(&latitude) {
        let style = Style::filled(color_map.color_for(lat))
            .with_stroke(BLACK, 1.0)
            .with_opacity(0.75);
        canvas.circle(x_axis.x_px(x, &area), y_axis.y_px(y, &area), MARKER_RADIUS, &style);
    }
    canvas.pop_clip();

    let bar = PlotArea {
        left: area.right() + 18.0,
        top: area.top,
        width: 14.0,
        height: area.height,
    };
    draw_colorbar(&mut canvas, &bar, &color_map, "Latitude");
    canvas
}

/// Vertical colour bar with ticks on the right and a rotated label.
fn draw_colorbar(canvas: &mut Canvas, bar: &PlotArea, color_map: &ColorMap, label: &str) {
    let axis = Axis::fixed(color_map.min, color_map.max, 6);
    let strip = bar.height / COLORBAR_STEPS as f64;

    for (i, (_, color)) in color_map.gradient(COLORBAR_STEPS).into_iter().enumerate() {
        // overlap strips to hide seams
        let y = bar.bottom() - (i as f64 + 1.0) * strip;
        canvas.rect(bar.left, y, bar.width, strip + 0.3, &Style::filled(color));
    }
    canvas.rect(bar.left, bar.top, bar.width, bar.height, &Style::stroked(BLACK, 0.8));

    let tick = LineStyle::solid(BLACK, 0.8);
    let tick_label = TextStyle::sized(10.0).anchored(TextAnchor::Start, TextBaseline::Central);
    let mut widest: f64 = 0.0;
    for (&v, text) in axis.tick_positions.iter().zip(&axis.tick_labels) {
        let y = axis.y_px(v, bar);
        canvas.line(bar.right(), y, bar.right() + 3.5, y, &tick);
        canvas.text(bar.right() + 6.0, y, text, &tick_label);
        widest = widest.max(approx_text_width(text, &tick_label));
    }

    let label_style = TextStyle::sized(10.0).anchored(TextAnchor::Middle, TextBaseline::Hanging);
    let x = bar.right() + 6.0 + widest + 6.0;
    canvas.text_rotated(x, bar.top + bar.height / 2.0, label, &label_style, -90.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::svg_color;
    use crate::data::model::MetoceanRecord;
    use chrono::NaiveDate;

    fn point(wind: f64, air: f64, latitude: f64) -> MetoceanRecord {
        MetoceanRecord {
            time: NaiveDate::from_ymd_opt(2017, 7, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            tsg_temp: 15.0,
            tsg_salinity: 35.0,
            wind_speed_true: wind,
            air_temperature: air,
            latitude,
            longitude: Some(18.0),
        }
    }

    #[test]
    fn render_colours_points_by_latitude() {
        let data = MetoceanSeries {
            records: vec![point(3.0, 14.0, -34.0), point(12.0, 9.5, -37.0), point(7.5, 11.0, -35.5)],
        };
        let svg = render(&data).finish_svg();
        assert_eq!(svg.matches("<circle").count(), 3);
        let cm = ColorMap::viridis(-37.0, -34.0);
        let south = format!(r#"fill="{}""#, svg_color(cm.color_for(-37.0)));
        let north = format!(r#"fill="{}""#, svg_color(cm.color_for(-34.0)));
        assert_ne!(south, north);
        assert!(svg.contains(&south));
        assert!(svg.contains(&north));
        assert!(svg.contains("Latitude"));
        assert!(svg.contains("Wind Speed (m/s)"));
    }

    #[test]
    fn render_empty_series() {
        let svg = render(&MetoceanSeries::default()).finish_svg();
        assert_eq!(svg.matches("<circle").count(), 0);
    }
}

use crate::color::{finite_range, Rgb, BLACK, GRAY, WHITE};
use crate::data::model::{MetoceanField, MetoceanSeries};

use super::axes::{draw_axes, seconds, AxesDecor, Axis};
use super::canvas::{approx_text_width, Canvas, LineStyle, Style, TextAnchor, TextBaseline, TextStyle};
use super::{FigureSize, PlotArea};

pub const FIGURE: FigureSize = FigureSize::new(10.0, 5.0);

pub const TITLE: &str = "Time Series of Sea Surface & Air Temperature\n(2017/06/28 - 2017/07/04)";

struct Series {
    label: &'static str,
    field: MetoceanField,
    style: LineStyle,
}

fn series() -> [Series; 2] {
    [
        Series {
            label: "Sea Surface Temperature",
            field: MetoceanField::TsgTemp,
            style: LineStyle::solid(BLACK, 1.5),
        },
        Series {
            label: "Air Temperature",
            field: MetoceanField::AirTemperature,
            style: LineStyle::dashed(GRAY, 1.2),
        },
    ]
}

/// Sea surface and air temperature against time.
pub fn render(data: &MetoceanSeries) -> Canvas {
    let mut canvas = Canvas::new(FIGURE);
    let lines = series();

    let x_axis = match (data.records.first(), data.records.last()) {
        (Some(first), Some(last)) => Axis::time(first.time, last.time),
        _ => Axis::fixed(0.0, 1.0, 2),
    }
    .with_label("Time");

    let mut all_values = data.column(MetoceanField::TsgTemp);
    all_values.extend(data.column(MetoceanField::AirTemperature));
    let (lo, hi) = finite_range(&all_values).unwrap_or((0.0, 1.0));
    let y_axis = Axis::padded(lo, hi, 6).with_label("Temperature (°C)");

    let area = PlotArea::with_margins(canvas.width, canvas.height, 58.0, 50.0, 16.0, 96.0);
    let decor = AxesDecor {
        title: Some(TITLE),
        x_tick_rotation: Some(45.0),
        ..Default::default()
    };
    draw_axes(&mut canvas, &area, &x_axis, &y_axis, &decor);

    let times: Vec<f64> = data.times().into_iter().map(seconds).collect();
    canvas.push_clip(&area);
    for line in &lines {
        let points: Vec<(f64, f64)> = times
            .iter()
            .zip(data.column(line.field))
            .map(|(&t, v)| (x_axis.x_px(t, &area), y_axis.y_px(v, &area)))
            .collect();
        canvas.polyline(&points, &line.style);
    }
    canvas.pop_clip();

    draw_legend(&mut canvas, &area, &lines);
    canvas
}

/// Legend box in the upper-right corner of `area`.
fn draw_legend(canvas: &mut Canvas, area: &PlotArea, lines: &[Series]) {
    let text = TextStyle::sized(10.0).anchored(TextAnchor::Start, TextBaseline::Central);
    let (pad, swatch, row_height) = (5.0, 22.0, 14.0);
    let text_width = lines
        .iter()
        .map(|l| approx_text_width(l.label, &text))
        .fold(0.0, f64::max);
    let width = pad * 3.0 + swatch + text_width;
    let height = pad * 2.0 + row_height * lines.len() as f64;
    let x = area.right() - width - 6.0;
    let y = area.top + 6.0;

    canvas.rect(
        x,
        y,
        width,
        height,
        &Style::filled(WHITE).with_stroke(Rgb::new(0xcc, 0xcc, 0xcc), 0.8).with_opacity(0.8),
    );
    for (i, line) in lines.iter().enumerate() {
        let cy = y + pad + row_height * (i as f64 + 0.5);
        canvas.line(x + pad, cy, x + pad + swatch, cy, &line.style);
        canvas.text(x + pad * 2.0 + swatch, cy, line.label, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::MetoceanRecord;
    use chrono::{Duration, NaiveDate};

    fn series_of(n: usize) -> MetoceanSeries {
        let start = NaiveDate::from_ymd_opt(2017, 6, 28)
            .unwrap()
            .and_hms_opt(17, 10, 0)
            .unwrap();
        MetoceanSeries {
            records: (0..n)
                .map(|i| MetoceanRecord {
                    time: start + Duration::minutes(10 * i as i64),
                    tsg_temp: 16.0 + i as f64 * 0.01,
                    tsg_salinity: 35.0,
                    wind_speed_true: 8.0,
                    air_temperature: 13.0 - i as f64 * 0.01,
                    latitude: -34.0,
                    longitude: None,
                })
                .collect(),
        }
    }

    #[test]
    fn render_draws_two_lines_and_legend() {
        let svg = render(&series_of(50)).finish_svg();
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Sea Surface Temperature"));
        assert!(svg.contains("Air Temperature"));
        assert!(svg.contains("(2017/06/28 - 2017/07/04)"));
        assert!(svg.contains("Temperature (°C)"));
        assert!(svg.contains(r##"stroke="#808080" stroke-width="1.20" stroke-dasharray"##));
        assert!(svg.contains("rotate(-45.0"));
    }

    #[test]
    fn render_empty_series() {
        let svg = render(&MetoceanSeries::default()).finish_svg();
        assert!(!svg.contains("<polyline"));
        assert!(svg.contains("Sea Surface Temperature"));
    }
}

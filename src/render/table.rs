use comfy_table::{presets, CellAlignment, Table};

use crate::color::BLACK;
use crate::stats::SummaryTable;

use super::canvas::{approx_text_width, Canvas, Style, TextAnchor, TextBaseline, TextStyle};
use super::FigureSize;

pub const FIGURE: FigureSize = FigureSize::new(10.0, 3.0);

pub const TITLE: &str = "Table showing mean, standard deviation, and the interquartile range\n\
                         for temperature and salinity";

const CELL_FONT: f64 = 10.0;
const CELL_PAD: f64 = 8.0;
const ROW_HEIGHT: f64 = 18.0;

/// Bordered table with a bold title, cells centred.
pub fn render(summary: &SummaryTable) -> Canvas {
    let mut canvas = Canvas::new(FIGURE);

    let title_style = TextStyle::sized(12.0)
        .bold()
        .anchored(TextAnchor::Middle, TextBaseline::Hanging);
    let mut y = 12.0;
    for line in TITLE.lines() {
        canvas.text(canvas.width / 2.0, y, line, &title_style);
        y += 12.0 * 1.25;
    }

    let header = SummaryTable::HEADERS.map(String::from);
    let mut rows = vec![header];
    rows.extend(summary.cells());

    let cell_style = TextStyle::sized(CELL_FONT).anchored(TextAnchor::Middle, TextBaseline::Central);
    let widths: Vec<f64> = (0..SummaryTable::HEADERS.len())
        .map(|col| {
            rows.iter()
                .map(|r| approx_text_width(&r[col], &cell_style))
                .fold(0.0, f64::max)
                + 2.0 * CELL_PAD
        })
        .collect();
    let total_width: f64 = widths.iter().sum();
    let total_height = ROW_HEIGHT * rows.len() as f64;

    let title_bottom = y + 6.0;
    let left = ((canvas.width - total_width) / 2.0).max(4.0);
    let top = title_bottom + ((canvas.height - title_bottom - total_height) / 2.0).max(0.0);

    let border = Style::stroked(BLACK, 0.8);
    for (r, row) in rows.iter().enumerate() {
        let cell_top = top + r as f64 * ROW_HEIGHT;
        let mut x = left;
        for (cell, &w) in row.iter().zip(&widths) {
            canvas.rect(x, cell_top, w, ROW_HEIGHT, &border);
            canvas.text(x + w / 2.0, cell_top + ROW_HEIGHT / 2.0, cell, &cell_style);
            x += w;
        }
    }

    canvas
}

/// Plain-text version of the table for the console.
pub fn to_console(summary: &SummaryTable) -> String {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_header(SummaryTable::HEADERS);
    for row in summary.cells() {
        table.add_row(row);
    }
    for col in 1..SummaryTable::HEADERS.len() {
        if let Some(column) = table.column_mut(col) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> SummaryTable {
        let mut t = SummaryTable::default();
        t.push("Sea Surface Temperature (°C)", &[10.0, 20.0, 30.0]);
        t.push("Salinity (PSU)", &[34.5, 35.0, 35.5]);
        t
    }

    #[test]
    fn render_has_title_header_and_cells() {
        let svg = render(&summary()).finish_svg();
        assert!(svg.contains("Table showing mean, standard deviation, and the interquartile range"));
        assert!(svg.contains("for temperature and salinity"));
        assert!(svg.contains(r#"font-weight="bold""#));
        for header in SummaryTable::HEADERS {
            assert!(svg.contains(header));
        }
        assert!(svg.contains("20.0000"));
        assert!(svg.contains("35.0000"));
        // 3 rows x 4 columns of bordered cells
        assert_eq!(svg.matches(r#"<rect x="#).count(), 12);
    }

    #[test]
    fn console_table_lists_both_parameters() {
        let text = to_console(&summary());
        assert!(text
            .lines()
            .any(|l| l.contains("Parameter") && l.contains("Interquartile Range")));
        assert!(text.contains("Sea Surface Temperature (°C)"));
        assert!(text.contains("Salinity (PSU)"));
        assert!(text.contains("10.0000"));
        assert!(text.contains("0.5000"));
    }
}

use std::fmt;

use crate::color::{svg_color, Rgb, BLACK};

use super::{FigureSize, PlotArea};

const FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, sans-serif";

// ---------------------------------------------------------------------------
// Styles
// ---------------------------------------------------------------------------

/// Fill + stroke style for rectangles and markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<Rgb>,
    pub stroke: Option<Rgb>,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 1.0, opacity: 1.0 }
    }
}

impl Style {
    pub fn filled(color: Rgb) -> Self {
        Self { fill: Some(color), ..Default::default() }
    }

    pub fn stroked(color: Rgb, width: f64) -> Self {
        Self { stroke: Some(color), stroke_width: width, ..Default::default() }
    }

    pub fn with_stroke(mut self, color: Rgb, width: f64) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: f64,
    pub dash: Option<&'static str>,
    pub opacity: f64,
}

impl LineStyle {
    pub fn solid(color: Rgb, width: f64) -> Self {
        Self { color, width, dash: None, opacity: 1.0 }
    }

    pub fn dashed(color: Rgb, width: f64) -> Self {
        Self { color, width, dash: Some("3.7 1.6"), opacity: 1.0 }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Central,
    Hanging,
}

impl TextBaseline {
    fn as_str(self) -> &'static str {
        match self {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Central => "central",
            TextBaseline::Hanging => "hanging",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: Rgb,
    pub bold: bool,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            color: BLACK,
            bold: false,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }
}

impl TextStyle {
    pub fn sized(size: f64) -> Self {
        Self { size, ..Default::default() }
    }

    pub fn anchored(mut self, anchor: TextAnchor, baseline: TextBaseline) -> Self {
        self.anchor = anchor;
        self.baseline = baseline;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Rough advance width of `text` in points. No font metrics are loaded at
/// layout time, so this uses an average glyph width for DejaVu Sans.
pub fn approx_text_width(text: &str, style: &TextStyle) -> f64 {
    let per_char = if style.bold { 0.64 } else { 0.58 };
    text.chars().count() as f64 * style.size * per_char
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum SvgElement {
    Rect { x: f64, y: f64, w: f64, h: f64, style: Style },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, style: LineStyle },
    Polyline { points: Vec<(f64, f64)>, style: LineStyle },
    Circle { cx: f64, cy: f64, r: f64, style: Style },
    Text { x: f64, y: f64, content: String, style: TextStyle, rotate: Option<f64> },
    BeginClip(String),
    EndClip,
}

/// Immediate-mode SVG canvas. Coordinates in points, origin top-left.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
    clips: Vec<String>,
}

impl Canvas {
    pub fn new(size: FigureSize) -> Self {
        Self {
            width: size.width_pt(),
            height: size.height_pt(),
            elements: Vec::new(),
            clips: Vec::new(),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        self.elements.push(SvgElement::Rect { x, y, w, h, style: style.clone() });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.elements.push(SvgElement::Line { x1, y1, x2, y2, style: style.clone() });
    }

    /// Open polyline; fewer than two points draws nothing.
    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        self.elements.push(SvgElement::Polyline { points: points.to_vec(), style: style.clone() });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: &Style) {
        self.elements.push(SvgElement::Circle { cx, cy, r, style: style.clone() });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.elements.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: None,
        });
    }

    /// Text rotated by `angle` degrees (clockwise) around its anchor point.
    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.elements.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: Some(angle),
        });
    }

    /// Clip everything drawn until [`Canvas::pop_clip`] to `area`.
    pub fn push_clip(&mut self, area: &PlotArea) {
        let id = format!("clip{}", self.clips.len());
        self.clips.push(format!(
            r#"<clipPath id="{id}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" /></clipPath>"#,
            area.left, area.top, area.width, area.height
        ));
        self.elements.push(SvgElement::BeginClip(id));
    }

    pub fn pop_clip(&mut self) {
        self.elements.push(SvgElement::EndClip);
    }

    /// The finished SVG document (same as `to_string()`).
    pub fn finish_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        )?;
        if !self.clips.is_empty() {
            writeln!(f, "<defs>")?;
            for clip in &self.clips {
                writeln!(f, "{clip}")?;
            }
            writeln!(f, "</defs>")?;
        }
        writeln!(f, r#"<rect width="{}" height="{}" fill="white" />"#, self.width, self.height)?;
        for elem in &self.elements {
            write_element(f, elem)?;
        }
        writeln!(f, "</svg>")
    }
}

fn write_element(f: &mut fmt::Formatter<'_>, elem: &SvgElement) -> fmt::Result {
    match elem {
        SvgElement::Rect { x, y, w, h, style } => {
            write!(f, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#)?;
            write_style_attrs(f, style)?;
            writeln!(f, " />")
        }
        SvgElement::Line { x1, y1, x2, y2, style } => {
            write!(f, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
            write_line_attrs(f, style)?;
            writeln!(f, " />")
        }
        SvgElement::Polyline { points, style } => {
            write!(f, r#"<polyline points=""#)?;
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{x:.2},{y:.2}")?;
            }
            write!(f, r#"" fill="none" stroke-linejoin="round""#)?;
            write_line_attrs(f, style)?;
            writeln!(f, " />")
        }
        SvgElement::Circle { cx, cy, r, style } => {
            write!(f, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#)?;
            write_style_attrs(f, style)?;
            writeln!(f, " />")
        }
        SvgElement::Text { x, y, content, style, rotate } => {
            write!(f, r#"<text x="{x:.2}" y="{y:.2}""#)?;
            write!(f, r#" font-family="{FONT_FAMILY}" font-size="{:.1}""#, style.size)?;
            write!(f, r#" fill="{}""#, svg_color(style.color))?;
            write!(f, r#" text-anchor="{}""#, style.anchor.as_str())?;
            write!(f, r#" dominant-baseline="{}""#, style.baseline.as_str())?;
            if style.bold {
                write!(f, r#" font-weight="bold""#)?;
            }
            if let Some(angle) = rotate {
                write!(f, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#)?;
            }
            write!(f, ">")?;
            for ch in content.chars() {
                match ch {
                    '<' => write!(f, "&lt;")?,
                    '>' => write!(f, "&gt;")?,
                    '&' => write!(f, "&amp;")?,
                    '"' => write!(f, "&quot;")?,
                    _ => write!(f, "{ch}")?,
                }
            }
            writeln!(f, "</text>")
        }
        SvgElement::BeginClip(id) => writeln!(f, r#"<g clip-path="url(#{id})">"#),
        SvgElement::EndClip => writeln!(f, "</g>"),
    }
}

fn write_style_attrs(f: &mut fmt::Formatter<'_>, style: &Style) -> fmt::Result {
    match style.fill {
        Some(fill) => write!(f, r#" fill="{}""#, svg_color(fill))?,
        None => write!(f, r#" fill="none""#)?,
    }
    if let Some(stroke) = style.stroke {
        write!(f, r#" stroke="{}" stroke-width="{:.2}""#, svg_color(stroke), style.stroke_width)?;
    }
    if (style.opacity - 1.0).abs() > 1e-4 {
        write!(f, r#" opacity="{:.3}""#, style.opacity)?;
    }
    Ok(())
}

fn write_line_attrs(f: &mut fmt::Formatter<'_>, style: &LineStyle) -> fmt::Result {
    write!(f, r#" stroke="{}" stroke-width="{:.2}""#, svg_color(style.color), style.width)?;
    if let Some(dash) = style.dash {
        write!(f, r#" stroke-dasharray="{dash}""#)?;
    }
    if (style.opacity - 1.0).abs() > 1e-4 {
        write!(f, r#" stroke-opacity="{:.3}""#, style.opacity)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RED;

    #[test]
    fn empty_canvas() {
        let c = Canvas::new(FigureSize::new(2.0, 1.0));
        let svg = c.finish_svg();
        assert!(svg.contains(r#"width="144""#));
        assert!(svg.contains(r#"height="72""#));
        assert!(svg.contains(r#"fill="white""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn rect_rendering() {
        let mut c = Canvas::new(FigureSize::new(3.0, 2.0));
        c.rect(10.0, 20.0, 50.0, 30.0, &Style::filled(RED).with_opacity(0.75));
        let svg = c.finish_svg();
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r#"width="50.00""#));
        assert!(svg.contains(r#"opacity="0.750""#));
    }

    #[test]
    fn text_is_escaped() {
        let mut c = Canvas::new(FigureSize::new(3.0, 2.0));
        c.text(10.0, 20.0, "Sea Surface & Air <°C>", &TextStyle::default());
        let svg = c.finish_svg();
        assert!(svg.contains("Sea Surface &amp; Air &lt;°C&gt;"));
    }

    #[test]
    fn clip_groups_are_balanced() {
        let mut c = Canvas::new(FigureSize::new(3.0, 2.0));
        let area = PlotArea { left: 10.0, top: 10.0, width: 100.0, height: 50.0 };
        c.push_clip(&area);
        c.polyline(&[(0.0, 0.0), (200.0, 200.0)], &LineStyle::dashed(RED, 1.0));
        c.pop_clip();
        let svg = c.finish_svg();
        assert!(svg.contains(r#"<clipPath id="clip0">"#));
        assert!(svg.contains(r#"clip-path="url(#clip0)""#));
        assert!(svg.contains("stroke-dasharray"));
        assert_eq!(svg.matches("<g ").count(), svg.matches("</g>").count());
    }

    #[test]
    fn single_point_polyline_is_skipped() {
        let mut c = Canvas::new(FigureSize::new(1.0, 1.0));
        c.polyline(&[(1.0, 1.0)], &LineStyle::solid(RED, 1.0));
        assert!(!c.finish_svg().contains("polyline"));
    }
}

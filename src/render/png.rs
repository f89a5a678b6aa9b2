use std::path::Path;

use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use resvg::{tiny_skia, usvg};

use super::canvas::Canvas;
use super::{RenderError, Result, POINTS_PER_INCH};

/// Turns finished canvases into PNG files. Holds the font database so
/// system fonts are only scanned once per run.
pub struct Rasterizer {
    options: usvg::Options<'static>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        let fontdb = options.fontdb_mut();
        fontdb.load_system_fonts();
        debug!("loaded {} font faces", fontdb.len());
        Self { options }
    }

    /// Render an SVG document at `dpi` onto a white background.
    pub fn rasterize(&self, svg: &str, dpi: u32) -> Result<RgbaImage> {
        let tree = usvg::Tree::from_str(svg, &self.options).map_err(|e| RenderError::Svg(e.to_string()))?;

        let scale = dpi as f32 / POINTS_PER_INCH as f32;
        let size = tree.size();
        let width = (size.width() * scale).round() as u32;
        let height = (size.height() * scale).round() as u32;

        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;
        pixmap.fill(tiny_skia::Color::WHITE);
        resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        // Opaque background, so premultiplied and straight alpha agree.
        RgbaImage::from_raw(width, height, pixmap.take()).ok_or(RenderError::Pixmap { width, height })
    }

    /// Rasterize `canvas` and write it to `path` as PNG.
    pub fn save(&self, canvas: &Canvas, path: &Path, dpi: u32) -> Result<()> {
        let image = self.rasterize(&canvas.finish_svg(), dpi)?;
        image.save_with_format(path, ImageFormat::Png)?;
        info!(
            "wrote {} ({}x{} px at {} dpi)",
            path.display(),
            image.width(),
            image.height(),
            dpi
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use crate::render::canvas::Style;
    use crate::render::FigureSize;

    #[test]
    fn pixel_size_follows_dpi() {
        let canvas = Canvas::new(FigureSize::new(2.0, 1.0));
        let img = Rasterizer::new().rasterize(&canvas.finish_svg(), 100).unwrap();
        assert_eq!((img.width(), img.height()), (200, 100));
        assert_eq!(img.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn filled_rect_is_drawn() {
        let mut canvas = Canvas::new(FigureSize::new(1.0, 1.0));
        canvas.rect(0.0, 0.0, 36.0, 72.0, &Style::filled(BLACK));
        let img = Rasterizer::new().rasterize(&canvas.finish_svg(), 72).unwrap();
        assert_eq!(img.get_pixel(10, 36).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(60, 36).0, [255, 255, 255, 255]);
    }

    #[test]
    fn save_writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.png");
        let canvas = Canvas::new(FigureSize::new(1.0, 1.0));
        Rasterizer::new().save(&canvas, &path, 50).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn malformed_svg_is_an_error() {
        let err = Rasterizer::new().rasterize("<svg", 72).unwrap_err();
        assert!(matches!(err, RenderError::Svg(_)));
    }
}

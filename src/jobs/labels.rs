//! Text label sheets: lines of text centred in evenly spaced rows, white on
//! transparent, reduced to their alpha channel.

use std::path::PathBuf;

use ab_glyph::Font;
use anyhow::Result;
use bevy::math::Vec2;
use image::GrayImage;

use super::JobContext;
use crate::packer::{PackRequest, PixelFormat};
use crate::raster::load_font;

#[derive(Debug, Clone, PartialEq)]
pub struct LabelSheet {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub size: f32,
    pub lines: Vec<String>,
}

impl LabelSheet {
    /// Row labels for the distance-field demo.
    pub fn text() -> Self {
        Self {
            name: "Text".into(),
            width: 256,
            height: 128,
            size: 24.0,
            lines: vec!["Alpha Blended".into(), "Alpha Tested".into(), "Distance Field".into()],
        }
    }

    pub fn small_text() -> Self {
        Self {
            name: "SmallText".into(),
            width: 256,
            height: 128,
            size: 20.0,
            lines: vec!["Smooth".into(), "Outline".into(), "Glow".into(), "Shadow".into()],
        }
    }

    /// Vertical centre of each row.
    pub fn row_centres(&self) -> Vec<f32> {
        let n = self.lines.len().max(1) as f32;
        let row = self.height as f32 / n;
        (0..self.lines.len()).map(|i| (i as f32 + 0.5) * row).collect()
    }

    pub fn render<F: Font>(&self, ctx: &JobContext, font: &F) -> GrayImage {
        let mut canvas = ctx.canvas(self.width, self.height, Vec2::new(self.width as f32, self.height as f32));
        canvas.set_source_rgb(1.0, 1.0, 1.0);
        let cx = self.width as f32 / 2.0;
        for (line, cy) in self.lines.iter().zip(self.row_centres()) {
            canvas.fill_text_centered(font, self.size, cx, cy, line);
        }
        canvas.alpha8()
    }
}

pub fn run(ctx: &JobContext, font: &std::path::Path, sheets: &[LabelSheet]) -> Result<Vec<PathBuf>> {
    let font = load_font(font)?;
    let mut written = Vec::new();
    for sheet in sheets {
        let path = ctx.save(&sheet.render(ctx, &font), &format!("{}.png", sheet.name))?;
        written.extend(ctx.pack(&PackRequest::new(&path, PixelFormat::Ogl8))?);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_evenly_spaced() {
        assert_eq!(LabelSheet::small_text().row_centres(), vec![16.0, 48.0, 80.0, 112.0]);
        let rows = LabelSheet::text().row_centres();
        assert!((rows[0] - 21.0).abs() < 0.5);
        assert_eq!(rows[1], 64.0);
        assert!((rows[2] - 106.0).abs() < 1.0);
    }

    #[test]
    fn missing_font_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = JobContext::offline(dir.path().join("out"));
        let err = run(&ctx, std::path::Path::new("fonts/Missing.ttf"), &[LabelSheet::text()]).unwrap_err();
        assert!(format!("{err:#}").contains("Missing.ttf"));
        assert!(!dir.path().join("out").exists());
    }
}

//! Compass-word billboards: white text with a heavy black outline.

use std::path::{Path, PathBuf};

use ab_glyph::Font;
use anyhow::Result;
use bevy::math::Vec2;
use image::RgbaImage;

use super::JobContext;
use crate::raster::{load_font, Shape};

pub const COMPASS_WORDS: [&str; 4] = ["North", "South", "East", "West"];

#[derive(Debug, Clone, PartialEq)]
pub struct BillboardStyle {
    pub width: u32,
    pub height: u32,
    pub size: f32,
    pub outline_width: f32,
}

impl Default for BillboardStyle {
    fn default() -> Self {
        Self { width: 128, height: 64, size: 40.0, outline_width: 4.0 }
    }
}

pub fn render<F: Font>(ctx: &JobContext, font: &F, style: &BillboardStyle, word: &str) -> RgbaImage {
    let mut c = ctx.canvas(style.width, style.height, Vec2::new(style.width as f32, style.height as f32));
    let e = c.text_extents(font, style.size, word);
    let (cx, cy) = (style.width as f32 / 2.0, style.height as f32 / 2.0);
    let path = c.text_path(font, style.size, cx - e.width / 2.0 - e.x_bearing, cy - e.height / 2.0 - e.y_bearing, word);
    c.set_line_width(style.outline_width).set_source_rgb(0.0, 0.0, 0.0).stroke(&path);
    c.set_source_rgb(1.0, 1.0, 1.0).fill(&Shape::Path(path));
    c.to_rgba8()
}

pub fn run(ctx: &JobContext, font: &Path, style: &BillboardStyle, words: &[String]) -> Result<Vec<PathBuf>> {
    let font = load_font(font)?;
    words
        .iter()
        .map(|w| ctx.save(&render(ctx, &font, style, w), &format!("{w}.png")))
        .collect()
}

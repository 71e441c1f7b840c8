//! Glyph atlas packing.
//!
//! Glyphs are rasterized into a single alpha texture left to right, wrapping to
//! a new row when the atlas width would be reached, and their positions and
//! metrics are kept so the demos can lay text out at run time.

use std::ops::Range;

use ab_glyph::{point, Font, GlyphId, ScaleFont};
use anyhow::{bail, Result};
use bevy::log::debug;
use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};
use ttf_parser as ttf;

/// Which glyphs go into the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphSet {
    /// Raw glyph indices from the font.
    Ids(Range<u16>),
    Chars(String),
}

impl GlyphSet {
    fn ids<F: Font>(&self, font: &F) -> Vec<GlyphId> {
        match self {
            GlyphSet::Ids(r) => r.clone().map(GlyphId).collect(),
            GlyphSet::Chars(s) => s.chars().map(|c| font.glyph_id(c)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    /// Horizontal gap between neighbouring glyphs.
    pub padding: u32,
    /// Start a new row instead of failing when a glyph would cross the right edge.
    pub wrap: bool,
}

/// Cairo-style glyph extents truncated to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlyphMetrics {
    pub x_bearing: i32,
    pub y_bearing: i32,
    pub width: i32,
    pub height: i32,
    pub x_advance: i32,
    pub y_advance: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphEntry {
    pub glyph: u16,
    pub x: i32,
    pub y: i32,
    pub metrics: GlyphMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KerningPair {
    pub left: u16,
    pub right: u16,
    /// Advance adjustment in pixels at the atlas font size.
    pub x_adjust: f32,
}

/// Ink box of one glyph in pixels relative to its baseline origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphBox {
    pub x_bearing: f32,
    pub y_bearing: f32,
    pub width: f32,
    pub height: f32,
    pub x_advance: f32,
}

impl GlyphBox {
    fn metrics(&self) -> GlyphMetrics {
        GlyphMetrics {
            x_bearing: self.x_bearing as i32,
            y_bearing: self.y_bearing as i32,
            width: self.width as i32,
            height: self.height as i32,
            x_advance: self.x_advance as i32,
            y_advance: 0,
        }
    }
}

/// Places boxes left to right, top-left corners at the returned positions.
pub fn pack_boxes(boxes: &[GlyphBox], layout: &AtlasLayout) -> Result<Vec<(i32, i32)>> {
    let (mut x, mut y, mut row_height) = (0.0f32, 0.0f32, 0.0f32);
    let mut out = Vec::with_capacity(boxes.len());
    for (i, b) in boxes.iter().enumerate() {
        if x > 0.0 && x + b.width >= layout.width as f32 {
            if !layout.wrap {
                bail!("glyph {i} does not fit in a {}px strip", layout.width);
            }
            x = 0.0;
            y += row_height;
            row_height = 0.0;
        }
        row_height = row_height.max(b.height);
        if y + b.height > layout.height as f32 {
            bail!("atlas overflow: glyph {i} needs rows past {}px", layout.height);
        }
        out.push((x as i32, y as i32));
        x += b.width + layout.padding as f32;
    }
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    pub image: GrayImage,
    pub entries: Vec<GlyphEntry>,
    pub size: f32,
}

impl GlyphAtlas {
    /// Rasterizes `set` at `size` pixels into an alpha atlas.
    pub fn render<F: Font>(font: &F, size: f32, set: &GlyphSet, layout: &AtlasLayout) -> Result<Self> {
        let scaled = font.as_scaled(size);
        let ids = set.ids(font);
        let boxes: Vec<GlyphBox> = ids
            .iter()
            .map(|&id| {
                let advance = scaled.h_advance(id);
                match scaled.outline_glyph(id.with_scale_and_position(scaled.scale(), point(0.0, 0.0))) {
                    Some(o) => {
                        let b = o.px_bounds();
                        GlyphBox { x_bearing: b.min.x, y_bearing: b.min.y, width: b.width(), height: b.height(), x_advance: advance }
                    }
                    None => GlyphBox { x_advance: advance, ..Default::default() },
                }
            })
            .collect();
        let positions = pack_boxes(&boxes, layout)?;

        let mut image = GrayImage::new(layout.width, layout.height);
        let mut entries = Vec::with_capacity(ids.len());
        for ((&id, b), &(x, y)) in ids.iter().zip(&boxes).zip(&positions) {
            let origin = point(x as f32 - b.x_bearing, y as f32 - b.y_bearing);
            if let Some(o) = scaled.outline_glyph(id.with_scale_and_position(scaled.scale(), origin)) {
                let bounds = o.px_bounds();
                o.draw(|gx, gy, c| {
                    let px = bounds.min.x as i64 + gx as i64;
                    let py = bounds.min.y as i64 + gy as i64;
                    if px >= 0 && py >= 0 && (px as u32) < image.width() && (py as u32) < image.height() {
                        let v = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
                        let p = image.get_pixel_mut(px as u32, py as u32);
                        p.0[0] = p.0[0].max(v);
                    }
                });
            }
            entries.push(GlyphEntry { glyph: id.0, x, y, metrics: b.metrics() });
        }
        debug!("packed {} glyphs into {}x{}", entries.len(), layout.width, layout.height);
        Ok(Self { image, entries, size })
    }

    /// Horizontal kerning between atlas glyphs from the font's `kern` table.
    pub fn kerning(&self, font_data: &[u8]) -> Result<Vec<KerningPair>> {
        let face = ttf::Face::parse(font_data, 0).map_err(|e| anyhow::anyhow!("ttf parse failed: {e}"))?;
        let Some(kern) = face.tables().kern else { return Ok(Vec::new()) };
        let px_per_unit = self.size / face.units_per_em() as f32;
        let mut pairs = Vec::new();
        for l in &self.entries {
            for r in &self.entries {
                let adjust = kern
                    .subtables
                    .into_iter()
                    .filter(|st| st.horizontal && !st.variable)
                    .find_map(|st| st.glyphs_kerning(ttf::GlyphId(l.glyph), ttf::GlyphId(r.glyph)));
                if let Some(units) = adjust.filter(|u| *u != 0) {
                    pairs.push(KerningPair { left: l.glyph, right: r.glyph, x_adjust: units as f32 * px_per_unit });
                }
            }
        }
        Ok(pairs)
    }

    /// Fraction of atlas pixels with any ink.
    pub fn coverage(&self) -> f64 {
        let lit = self.image.pixels().filter(|p: &&Luma<u8>| p[0] > 0).count();
        lit as f64 / (self.image.width() as f64 * self.image.height() as f64).max(1.0)
    }
}

/// Alpha atlas of the first printable glyph indices (1..98), wrapped into rows.
pub fn atlas_preset() -> (GlyphSet, AtlasLayout, f32) {
    (GlyphSet::Ids(1..98), AtlasLayout { width: 256, height: 128, padding: 0, wrap: true }, 20.0)
}

/// Single strip of the digits 0-9.
pub fn numerals_preset() -> (GlyphSet, AtlasLayout, f32) {
    (GlyphSet::Chars("0123456789".into()), AtlasLayout { width: 256, height: 32, padding: 3, wrap: false }, 32.0)
}

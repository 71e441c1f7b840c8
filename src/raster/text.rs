//! Font loading and glyph layout helpers on top of `ab_glyph`.

use std::fs;
use std::path::Path as FilePath;

use ab_glyph::{point, Font, FontVec, Glyph, OutlineCurve, PxScaleFont, ScaleFont};
use anyhow::{Context, Result};
use bevy::math::Vec2;

use super::{Path, PathBuilder};

/// Reads a TrueType / OpenType font, naming the file on failure.
pub fn load_font(path: &FilePath) -> Result<FontVec> {
    let bytes = fs::read(path).with_context(|| format!("read font {}", path.display()))?;
    FontVec::try_from_vec(bytes).with_context(|| format!("decode font {}", path.display()))
}

/// Ink box and advance of a run of text, y growing downwards from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub x_bearing: f32,
    pub y_bearing: f32,
    pub width: f32,
    pub height: f32,
    pub x_advance: f32,
    pub y_advance: f32,
}

impl TextExtents {
    pub fn scaled(self, k: f32) -> Self {
        Self {
            x_bearing: self.x_bearing * k,
            y_bearing: self.y_bearing * k,
            width: self.width * k,
            height: self.height * k,
            x_advance: self.x_advance * k,
            y_advance: self.y_advance * k,
        }
    }
}

/// Positions glyphs along the baseline starting at `origin` (pixels), applying kerning.
pub fn layout<F: Font>(scaled: &PxScaleFont<&F>, text: &str, origin: Vec2) -> Vec<Glyph> {
    let mut glyphs = Vec::new();
    let mut caret = origin.x;
    let mut prev = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        glyphs.push(id.with_scale_and_position(scaled.scale(), point(caret, origin.y)));
        caret += scaled.h_advance(id);
        prev = Some(id);
    }
    glyphs
}

/// Extents of `text` at `px_size` pixels.
pub fn extents<F: Font>(font: &F, px_size: f32, text: &str) -> TextExtents {
    let scaled = font.as_scaled(px_size);
    let glyphs = layout(&scaled, text, Vec2::ZERO);
    let advance = glyphs.last().map(|g| g.position.x + scaled.h_advance(g.id)).unwrap_or(0.0);
    let mut bounds: Option<(Vec2, Vec2)> = None;
    for g in glyphs {
        if let Some(outlined) = scaled.outline_glyph(g) {
            let b = outlined.px_bounds();
            let (lo, hi) = (Vec2::new(b.min.x, b.min.y), Vec2::new(b.max.x, b.max.y));
            bounds = Some(bounds.map_or((lo, hi), |(l, h)| (l.min(lo), h.max(hi))));
        }
    }
    let (lo, hi) = bounds.unwrap_or((Vec2::ZERO, Vec2::ZERO));
    TextExtents { x_bearing: lo.x, y_bearing: lo.y, width: hi.x - lo.x, height: hi.y - lo.y, x_advance: advance, y_advance: 0.0 }
}

/// Glyph outlines of `text` as a path in the same pixel space as [`layout`].
/// Quadratic segments are raised to cubics before flattening.
pub fn outline_path<F: Font>(font: &F, px_size: f32, text: &str, origin: Vec2) -> Path {
    let scaled = font.as_scaled(px_size);
    let (hs, vs) = (scaled.h_scale_factor(), scaled.v_scale_factor());
    let mut pb = PathBuilder::new();
    for glyph in layout(&scaled, text, origin) {
        let Some(outline) = font.outline(glyph.id) else { continue };
        let base = Vec2::new(glyph.position.x, glyph.position.y);
        let map = |p: ab_glyph::Point| base + Vec2::new(p.x * hs, -p.y * vs);
        let mut pen: Option<Vec2> = None;
        for curve in &outline.curves {
            let (start, end) = match *curve {
                OutlineCurve::Line(a, b) => (map(a), map(b)),
                OutlineCurve::Quad(a, _, c) => (map(a), map(c)),
                OutlineCurve::Cubic(a, _, _, d) => (map(a), map(d)),
            };
            if pen.map_or(true, |p| p.distance_squared(start) > 1e-6) {
                pb.close();
                pb.move_to(start.x, start.y);
            }
            match *curve {
                OutlineCurve::Line(..) => {
                    pb.line_to(end.x, end.y);
                }
                OutlineCurve::Quad(_, c, _) => {
                    let c = map(c);
                    let c1 = start + (c - start) * (2.0 / 3.0);
                    let c2 = end + (c - end) * (2.0 / 3.0);
                    pb.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
                }
                OutlineCurve::Cubic(_, b, c, _) => {
                    let (b, c) = (map(b), map(c));
                    pb.curve_to(b.x, b.y, c.x, c.y, end.x, end.y);
                }
            }
            pen = Some(end);
        }
        pb.close();
    }
    pb.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_names_the_path() {
        let err = load_font(FilePath::new("no/such/font.ttf")).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/font.ttf"));
    }

    #[test]
    fn extents_scale_uniformly() {
        let e = TextExtents { x_bearing: 1.0, y_bearing: -8.0, width: 10.0, height: 8.0, x_advance: 12.0, y_advance: 0.0 };
        let s = e.scaled(0.5);
        assert_eq!(s.y_bearing, -4.0);
        assert_eq!(s.x_advance, 6.0);
    }
}

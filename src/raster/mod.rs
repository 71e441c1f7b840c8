//! Procedural drawing for demo textures.
//!
//! A [`Canvas`] is a drawing session: it owns its pixels together with the
//! current source colour, compositing operator, line width and viewport
//! transform, so helpers receive the canvas explicitly instead of sharing a
//! global context. Shapes are rasterized by supersampling their signed
//! distance, which gives smooth alpha edges for the mask-style textures.

pub mod filter;
pub mod ops;
pub mod text;

use ab_glyph::{Font, ScaleFont};
use bevy::math::{Vec2, Vec4};
use image::{DynamicImage, GrayImage, Luma, RgbaImage};

pub use text::{load_font, TextExtents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    /// Source composited over the destination.
    #[default]
    Over,
    /// Destination erased in proportion to coverage.
    Clear,
}

/// One flattened contour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subpath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

/// Polyline contours produced by [`PathBuilder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub subpaths: Vec<Subpath>,
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let v = b - a;
    let ll = v.length_squared();
    let t = if ll <= 1e-12 { 0.0 } else { ((p - a).dot(v) / ll).clamp(0.0, 1.0) };
    p.distance(a + v * t)
}

impl Path {
    fn segments(&self, force_close: bool) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.subpaths.iter().flat_map(move |sp| {
            let pts = &sp.points;
            let closing = (force_close || sp.closed) && pts.len() > 1;
            let tail = closing.then(|| (pts[pts.len() - 1], pts[0]));
            let single = (pts.len() == 1).then(|| (pts[0], pts[0]));
            pts.windows(2).map(|w| (w[0], w[1])).chain(tail).chain(single)
        })
    }

    /// Negative inside (even-odd), positive outside.
    pub fn fill_distance(&self, p: Vec2) -> f32 {
        let mut inside = false;
        let mut min_d = f32::MAX;
        for (a, b) in self.segments(true) {
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            min_d = min_d.min(segment_distance(p, a, b));
        }
        if inside { -min_d } else { min_d }
    }

    /// Unsigned distance to the outline as it would be stroked.
    pub fn stroke_distance(&self, p: Vec2) -> f32 {
        self.segments(false).map(|(a, b)| segment_distance(p, a, b)).fold(f32::MAX, f32::min)
    }

    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let mut pts = self.subpaths.iter().flat_map(|sp| sp.points.iter().copied());
        let first = pts.next()?;
        Some(pts.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Builds a [`Path`] from move/line/curve commands, flattening cubics.
#[derive(Debug, Default)]
pub struct PathBuilder {
    path: Path,
    current: Option<Subpath>,
}

const CUBIC_STEPS: usize = 18;

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn flush(&mut self) {
        if let Some(sp) = self.current.take() {
            if !sp.points.is_empty() {
                self.path.subpaths.push(sp);
            }
        }
    }

    fn last(&self) -> Vec2 {
        self.current.as_ref().and_then(|sp| sp.points.last().copied()).unwrap_or(Vec2::ZERO)
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.flush();
        self.current = Some(Subpath { points: vec![Vec2::new(x, y)], closed: false });
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        match self.current.as_mut() {
            Some(sp) => sp.points.push(Vec2::new(x, y)),
            None => self.current = Some(Subpath { points: vec![Vec2::new(x, y)], closed: false }),
        }
        self
    }

    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) -> &mut Self {
        let s = self.last();
        let (c1, c2, e) = (Vec2::new(x1, y1), Vec2::new(x2, y2), Vec2::new(x, y));
        for i in 1..=CUBIC_STEPS {
            let t = i as f32 / CUBIC_STEPS as f32;
            let it = 1.0 - t;
            let p = s * it * it * it + c1 * 3.0 * it * it * t + c2 * 3.0 * it * t * t + e * t * t * t;
            self.line_to(p.x, p.y);
        }
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(sp) = self.current.as_mut() {
            sp.closed = true;
        }
        self.flush();
        self
    }

    pub fn build(mut self) -> Path {
        self.flush();
        self.path
    }
}

/// Closed polygon through `points`.
pub fn polygon(points: &[Vec2]) -> Path {
    Path { subpaths: vec![Subpath { points: points.to_vec(), closed: true }] }
}

/// Rounded rectangle centred on `center`, `half_width` wide each side and `height` tall.
pub fn rounded_rect(center: Vec2, half_width: f32, height: f32, r: f32) -> Path {
    let (x, y) = (center.x - half_width, center.y - height / 2.0);
    let (w, h) = (half_width * 2.0, height);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y)
        .line_to(x + w - r, y)
        .curve_to(x + w, y, x + w, y, x + w, y + r)
        .line_to(x + w, y + h - r)
        .curve_to(x + w, y + h, x + w, y + h, x + w - r, y + h)
        .line_to(x + r, y + h)
        .curve_to(x, y + h, x, y + h, x, y + h - r)
        .line_to(x, y + r)
        .curve_to(x, y, x, y, x + r, y)
        .close();
    pb.build()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Path(Path),
}

impl Shape {
    pub fn circle(cx: f32, cy: f32, radius: f32) -> Self {
        Shape::Circle { center: Vec2::new(cx, cy), radius }
    }

    pub fn signed_distance(&self, p: Vec2) -> f32 {
        match self {
            Shape::Circle { center, radius } => p.distance(*center) - radius,
            Shape::Path(path) => path.fill_distance(p),
        }
    }

    fn bounds(&self) -> Option<(Vec2, Vec2)> {
        match self {
            Shape::Circle { center, radius } => Some((*center - Vec2::splat(*radius), *center + Vec2::splat(*radius))),
            Shape::Path(path) => path.bounds(),
        }
    }
}

/// HSV (hue in degrees) to RGB, each channel 0..1.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = h / 60.0;
    let i = (sector as i32).rem_euclid(6);
    let f = sector - sector.trunc();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Drawing session over a premultiplied RGBA float buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
    scale: Vec2,
    translate: Vec2,
    source: Vec4,
    operator: Operator,
    line_width: f32,
    supersamples: u32,
}

impl Canvas {
    /// Transparent canvas with a pixel-unit viewport and opaque black source.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
            scale: Vec2::ONE,
            translate: Vec2::ZERO,
            source: Vec4::new(0.0, 0.0, 0.0, 1.0),
            operator: Operator::Over,
            line_width: 2.0,
            supersamples: 4,
        }
    }

    /// Canvas whose user space spans `viewport` units across the pixel grid.
    pub fn with_viewport(width: u32, height: u32, viewport: Vec2) -> Self {
        let mut c = Self::new(width, height);
        c.scale = Vec2::new(width as f32, height as f32) / viewport;
        c
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_supersamples(&mut self, n: u32) -> &mut Self {
        self.supersamples = n.clamp(1, 16);
        self
    }

    pub fn set_source_rgba(&mut self, r: f32, g: f32, b: f32, a: f32) -> &mut Self {
        self.source = Vec4::new(r, g, b, a).clamp(Vec4::ZERO, Vec4::ONE);
        self
    }

    pub fn set_source_rgb(&mut self, r: f32, g: f32, b: f32) -> &mut Self {
        self.set_source_rgba(r, g, b, 1.0)
    }

    pub fn set_operator(&mut self, op: Operator) -> &mut Self {
        self.operator = op;
        self
    }

    /// Stroke width in user units.
    pub fn set_line_width(&mut self, w: f32) -> &mut Self {
        self.line_width = w;
        self
    }

    /// Shifts the user-space origin by `(dx, dy)` user units.
    pub fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.translate += Vec2::new(dx, dy);
        self
    }

    fn to_pixel(&self, p: Vec2) -> Vec2 {
        (p + self.translate) * self.scale
    }

    fn to_user(&self, px: Vec2) -> Vec2 {
        px / self.scale - self.translate
    }

    fn composite(&mut self, x: u32, y: u32, coverage: f32) {
        if coverage <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[y as usize * self.width as usize + x as usize];
        match self.operator {
            Operator::Over => {
                let a = self.source.w * coverage;
                let src = Vec4::new(self.source.x * a, self.source.y * a, self.source.z * a, a);
                *dst = src + *dst * (1.0 - a);
            }
            Operator::Clear => *dst *= 1.0 - coverage,
        }
    }

    /// Composites the source wherever `inside` holds for supersamples in the user-space box `lo..hi`.
    fn cover(&mut self, lo: Vec2, hi: Vec2, inside: impl Fn(Vec2) -> bool) {
        let (a, b) = (self.to_pixel(lo), self.to_pixel(hi));
        let (pmin, pmax) = (a.min(b), a.max(b));
        let x0 = pmin.x.floor().max(0.0) as u32;
        let y0 = pmin.y.floor().max(0.0) as u32;
        let x1 = (pmax.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (pmax.y.ceil().max(0.0) as u32).min(self.height);
        let n = self.supersamples;
        let total = (n * n) as f32;
        for py in y0..y1 {
            for px in x0..x1 {
                let mut hits = 0u32;
                for sy in 0..n {
                    for sx in 0..n {
                        let s = Vec2::new(px as f32 + (sx as f32 + 0.5) / n as f32, py as f32 + (sy as f32 + 0.5) / n as f32);
                        if inside(self.to_user(s)) { hits += 1; }
                    }
                }
                self.composite(px, py, hits as f32 / total);
            }
        }
    }

    /// Fills the whole canvas with the source.
    pub fn paint(&mut self) -> &mut Self {
        for y in 0..self.height {
            for x in 0..self.width {
                self.composite(x, y, 1.0);
            }
        }
        self
    }

    pub fn fill(&mut self, shape: &Shape) -> &mut Self {
        if let Some((lo, hi)) = shape.bounds() {
            self.cover(lo, hi, |p| shape.signed_distance(p) < 0.0);
        }
        self
    }

    /// Strokes `path` with round caps and joins at the current line width.
    pub fn stroke(&mut self, path: &Path) -> &mut Self {
        let half = self.line_width * 0.5;
        if let Some((lo, hi)) = path.bounds() {
            self.cover(lo - Vec2::splat(half), hi + Vec2::splat(half), |p| path.stroke_distance(p) < half);
        }
        self
    }

    /// Ink extents of `text` in user units for a font `size` user units tall.
    pub fn text_extents<F: Font>(&self, font: &F, size: f32, text: &str) -> TextExtents {
        text::extents(font, size * self.scale.y, text).scaled(1.0 / self.scale.y)
    }

    /// Fills `text` with its baseline origin at user-space `(x, y)`.
    pub fn fill_text<F: Font>(&mut self, font: &F, size: f32, x: f32, y: f32, text: &str) -> &mut Self {
        let origin = self.to_pixel(Vec2::new(x, y));
        let scaled = font.as_scaled(size * self.scale.y);
        for glyph in text::layout(&scaled, text, origin) {
            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (bx, by) = (bounds.min.x as i64, bounds.min.y as i64);
                let mut hits = Vec::new();
                outlined.draw(|gx, gy, c| hits.push((bx + gx as i64, by + gy as i64, c)));
                for (px, py, c) in hits {
                    if px >= 0 && py >= 0 && (px as u32) < self.width && (py as u32) < self.height {
                        self.composite(px as u32, py as u32, c.clamp(0.0, 1.0));
                    }
                }
            }
        }
        self
    }

    /// Fills `text` so its ink box is centred on `(x, y)`.
    pub fn fill_text_centered<F: Font>(&mut self, font: &F, size: f32, x: f32, y: f32, text: &str) -> &mut Self {
        let e = self.text_extents(font, size, text);
        self.fill_text(font, size, x - e.width / 2.0 - e.x_bearing, y - e.height / 2.0 - e.y_bearing, text)
    }

    /// Outline of `text` (baseline origin at user-space `(x, y)`) as a path in user space,
    /// ready for [`Canvas::stroke`] or [`Canvas::fill`].
    pub fn text_path<F: Font>(&self, font: &F, size: f32, x: f32, y: f32, text: &str) -> Path {
        let origin = self.to_pixel(Vec2::new(x, y));
        let mut path = text::outline_path(font, size * self.scale.y, text, origin);
        for sp in &mut path.subpaths {
            for p in &mut sp.points {
                *p = self.to_user(*p);
            }
        }
        path
    }

    fn pixel(&self, x: u32, y: u32) -> Vec4 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Straight-alpha 8-bit RGBA.
    pub fn to_rgba8(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixel(x, y);
            let rgb = if p.w > 0.0 { p.truncate() / p.w } else { p.truncate() };
            let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            image::Rgba([q(rgb.x), q(rgb.y), q(rgb.z), q(p.w)])
        })
    }

    /// Alpha channel only.
    pub fn alpha8(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| Luma([(self.pixel(x, y).w.clamp(0.0, 1.0) * 255.0).round() as u8]))
    }

    /// Luminance of the straight colour, ignoring alpha.
    pub fn luma8(&self) -> GrayImage {
        DynamicImage::ImageRgba8(self.to_rgba8()).to_luma8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_fill_covers_centre_not_corners() {
        let mut c = Canvas::with_viewport(16, 16, Vec2::splat(16.0));
        c.fill(&Shape::circle(8.0, 8.0, 6.4));
        let a = c.alpha8();
        assert_eq!(a.get_pixel(8, 8)[0], 255);
        assert_eq!(a.get_pixel(0, 0)[0], 0);
        let edge = a.get_pixel(14, 8)[0];
        assert!(edge > 0 && edge < 255, "edge pixel should be partially covered, got {edge}");
    }

    #[test]
    fn clear_operator_punches_holes() {
        let mut c = Canvas::new(16, 16);
        c.fill(&Shape::circle(8.0, 8.0, 6.4));
        c.set_operator(Operator::Clear).fill(&Shape::circle(8.0, 8.0, 3.2));
        assert_eq!(c.alpha8().get_pixel(8, 8)[0], 0);
        c.set_operator(Operator::Over).set_source_rgba(0.0, 0.0, 0.0, 0.5).fill(&Shape::circle(8.0, 8.0, 3.2));
        assert_eq!(c.alpha8().get_pixel(8, 8)[0], 128);
        assert_eq!(c.alpha8().get_pixel(8, 3)[0], 255);
    }

    #[test]
    fn polygon_distance_sign() {
        let square = polygon(&[Vec2::ZERO, Vec2::new(4.0, 0.0), Vec2::new(4.0, 4.0), Vec2::new(0.0, 4.0)]);
        assert!((square.fill_distance(Vec2::new(2.0, 2.0)) + 2.0).abs() < 1e-5);
        assert!((square.fill_distance(Vec2::new(6.0, 2.0)) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn stroke_marks_outline_only() {
        let mut c = Canvas::new(32, 32);
        c.set_line_width(2.0).stroke(&rounded_rect(Vec2::splat(16.0), 10.0, 20.0, 3.0));
        let a = c.alpha8();
        assert_eq!(a.get_pixel(16, 16)[0], 0);
        assert!(a.get_pixel(16, 6)[0] > 200);
    }

    #[test]
    fn viewport_scales_user_units() {
        let mut c = Canvas::with_viewport(128, 32, Vec2::new(4.0, 1.0));
        c.set_source_rgb(1.0, 1.0, 1.0)
            .fill(&Shape::Path(polygon(&[Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)])));
        let a = c.alpha8();
        assert_eq!(a.get_pixel(10, 10)[0], 255);
        assert_eq!(a.get_pixel(40, 10)[0], 0);
    }

    #[test]
    fn hsv_primary_hues() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), (0.0, 1.0, 0.0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), (0.0, 0.0, 1.0));
        assert_eq!(hsv_to_rgb(90.0, 0.0, 0.4), (0.4, 0.4, 0.4));
    }
}

//! Cloud billboard mask: everything outside an equilateral triangle is opaque
//! black, so the triangle's inscribed sprite shows through.

use std::path::PathBuf;

use anyhow::Result;
use bevy::math::Vec2;
use image::RgbaImage;

use super::JobContext;
use crate::raster::{polygon, PathBuilder, Shape};

/// Triangle apex in the unit viewport; the base runs along y = 1.
pub fn apex() -> Vec2 {
    Vec2::new(0.5, 1.0 - 3f32.sqrt() / 2.0)
}

pub fn render(ctx: &JobContext, size: u32) -> RgbaImage {
    let mut c = ctx.canvas(size, size, Vec2::ONE);
    let top = apex();
    c.set_line_width(0.05);
    let mut outline = PathBuilder::new();
    outline.move_to(0.0, 1.0).line_to(1.0, 1.0).line_to(top.x, top.y).line_to(0.0, 1.0);
    c.stroke(&outline.build());
    // below the base
    c.fill(&Shape::Path(polygon(&[Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 2.0), Vec2::new(0.0, 2.0)])));
    // the two wedges either side of the apex
    c.fill(&Shape::Path(polygon(&[Vec2::new(0.0, 1.0), Vec2::new(0.0, -500.0), top])));
    c.fill(&Shape::Path(polygon(&[Vec2::new(1.0, 1.0), Vec2::new(1.0, -500.0), top])));
    c.to_rgba8()
}

pub fn run(ctx: &JobContext, size: u32) -> Result<Vec<PathBuf>> {
    Ok(vec![ctx.save(&render(ctx, size), "Triangle.png")?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_clear_outside_opaque() {
        let ctx = JobContext::offline("unused");
        let img = render(&ctx, 128);
        assert_eq!(img.get_pixel(64, 100).0[3], 0);
        assert_eq!(img.get_pixel(2, 2).0[3], 255);
        assert_eq!(img.get_pixel(125, 2).0[3], 255);
        // the stroke covers the base edge
        assert_eq!(img.get_pixel(64, 126).0[3], 255);
    }
}

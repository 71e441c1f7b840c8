//! Circle sprites: a plain disc, or a ring whose hole is half transparent,
//! optionally followed by a blurred copy.

use std::path::PathBuf;

use anyhow::{bail, Result};
use bevy::math::Vec2;

use super::JobContext;
use crate::packer::{PackRequest, PixelFormat};
use crate::raster::{filter, Canvas, Operator, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct CircleJob {
    pub name: String,
    pub size: u32,
    pub ring: bool,
    /// Blur passes for the `Blurry<name>` copy; none when 0.
    pub blur_passes: u32,
    /// Keep the RGBA render instead of reducing it to alpha.
    pub rgba: bool,
    pub pack: bool,
}

impl Default for CircleJob {
    fn default() -> Self {
        Self { name: "Circle".into(), size: 16, ring: false, blur_passes: 0, rgba: false, pack: true }
    }
}

impl CircleJob {
    pub fn render(&self, ctx: &JobContext) -> Canvas {
        let s = self.size as f32;
        let mut c = ctx.canvas(self.size, self.size, Vec2::splat(s));
        let (cx, cy) = (s / 2.0, s / 2.0);
        if self.ring {
            c.set_source_rgba(0.0, 0.0, 0.0, 1.0).fill(&Shape::circle(cx, cy, s * 0.4));
            c.set_operator(Operator::Clear).fill(&Shape::circle(cx, cy, s * 0.2));
            c.set_operator(Operator::Over)
                .set_source_rgba(0.0, 0.0, 0.0, 0.5)
                .fill(&Shape::circle(cx, cy, s * 0.2));
        } else {
            c.set_source_rgb(1.0, 1.0, 1.0).fill(&Shape::circle(cx, cy, s * 0.4));
        }
        c
    }
}

pub fn run(ctx: &JobContext, job: &CircleJob) -> Result<Vec<PathBuf>> {
    if job.size == 0 {
        bail!("circle size must be > 0");
    }
    let canvas = job.render(ctx);
    let mut images = Vec::new();
    if job.rgba {
        images.push(ctx.save(&canvas.to_rgba8(), &format!("{}.png", job.name))?);
    } else {
        let alpha = canvas.alpha8();
        images.push(ctx.save(&alpha, &format!("{}.png", job.name))?);
        if job.blur_passes > 0 {
            let blurry = filter::blur_passes(&alpha, job.blur_passes);
            images.push(ctx.save(&blurry, &format!("Blurry{}.png", job.name))?);
        }
    }
    let mut written = Vec::new();
    for path in images {
        written.push(path.clone());
        if job.pack {
            written.extend(ctx.pack(&PackRequest::new(&path, PixelFormat::Ogl8))?);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_hole_is_half_transparent() {
        let ctx = JobContext::offline("unused");
        let a = CircleJob { ring: true, ..Default::default() }.render(&ctx).alpha8();
        assert_eq!(a.get_pixel(8, 8)[0], 128);
        assert_eq!(a.get_pixel(8, 3)[0], 255);
        assert_eq!(a.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn blurred_copy_is_written_alongside() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = JobContext::offline(dir.path());
        let written = run(&ctx, &CircleJob { blur_passes: 4, ..Default::default() }).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("BlurryCircle.png"));
        let sharp = image::open(&written[0]).unwrap().to_luma8();
        let blurry = image::open(&written[1]).unwrap().to_luma8();
        assert_eq!(sharp.get_pixel(8, 8)[0], 255);
        assert!(blurry.get_pixel(8, 8)[0] < 255);
        assert!(blurry.get_pixel(0, 0)[0] > 0);
    }
}

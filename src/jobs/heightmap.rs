//! Bump-map height field: a white sheet with a regular grid of black dots,
//! softened by a couple of blur passes and packed as tangent-space normals.

use std::path::PathBuf;

use anyhow::Result;
use bevy::math::Vec2;
use image::GrayImage;

use super::JobContext;
use crate::packer::{PackRequest, PixelFormat};
use crate::raster::{filter, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct HeightmapJob {
    pub width: u32,
    pub height: u32,
    pub radius: f32,
    pub spacing: f32,
    pub offset: f32,
    pub blur_passes: u32,
    pub bump_scale: f32,
    /// Precomputed object-space normal map packed alongside as RGB.
    pub object_space: Option<PathBuf>,
}

impl Default for HeightmapJob {
    fn default() -> Self {
        Self {
            width: 512,
            height: 1024,
            radius: 6.0,
            spacing: 32.0,
            offset: 16.0,
            blur_passes: 2,
            bump_scale: 2.0,
            object_space: None,
        }
    }
}

impl HeightmapJob {
    pub fn render(&self, ctx: &JobContext) -> GrayImage {
        let mut c = ctx.canvas(self.width, self.height, Vec2::new(self.width as f32, self.height as f32));
        c.set_source_rgb(1.0, 1.0, 1.0).paint();
        c.set_source_rgb(0.0, 0.0, 0.0);
        let cols = (self.width as f32 / self.spacing).ceil() as u32 + 1;
        let rows = (self.height as f32 / self.spacing).ceil() as u32 + 1;
        for y in 0..rows {
            for x in 0..cols {
                let centre = Vec2::new(x as f32, y as f32) * self.spacing + Vec2::splat(self.offset);
                c.fill(&Shape::circle(centre.x, centre.y, self.radius));
            }
        }
        filter::blur_passes(&c.luma8(), self.blur_passes)
    }
}

pub fn run(ctx: &JobContext, job: &HeightmapJob) -> Result<Vec<PathBuf>> {
    let path = ctx.save(&job.render(ctx), "HeightMap.png")?;
    let normals = PackRequest::new(&path, PixelFormat::Ogl888)
        .normal_map(job.bump_scale)
        .output(ctx.output("TangentSpaceNormals.h"));
    let mut written = vec![path.clone()];
    written.extend(ctx.pack(&normals)?);
    if let Some(object_space) = &job.object_space {
        written.extend(ctx.pack(&PackRequest::new(object_space, PixelFormat::Ogl888))?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_sit_on_the_grid() {
        let ctx = JobContext::offline("unused");
        let job = HeightmapJob { width: 64, height: 64, blur_passes: 0, ..Default::default() };
        let h = job.render(&ctx);
        assert_eq!(h.dimensions(), (64, 64));
        assert_eq!(h.get_pixel(16, 16)[0], 0);
        assert_eq!(h.get_pixel(48, 16)[0], 0);
        assert_eq!(h.get_pixel(32, 32)[0], 255);
        assert_eq!(h.get_pixel(0, 0)[0], 255);
    }
}

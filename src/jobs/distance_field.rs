//! Distance-field texture plus an optional plain-alpha comparison texture of the
//! same canvas size, both packed as 8-bit luminance.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::log::info;
use image::GrayImage;

use super::JobContext;
use crate::config::DistanceFieldConfig;
use crate::packer::{PackRequest, PixelFormat};
use crate::raster::{filter, ops};
use crate::sdf;

#[derive(Debug, Clone, PartialEq)]
pub struct DistanceFieldJob {
    pub input: PathBuf,
    pub output: String,
    /// File name of the comparison texture; skipped when `None`.
    pub comparison: Option<String>,
    pub spread: u32,
    pub scale: f32,
    pub pad_to_pot: bool,
}

impl DistanceFieldJob {
    pub fn new(input: impl Into<PathBuf>, cfg: &DistanceFieldConfig) -> Self {
        Self {
            input: input.into(),
            output: "DistanceField.png".into(),
            comparison: None,
            spread: cfg.spread,
            scale: cfg.scale,
            pad_to_pot: cfg.pad_to_pot,
        }
    }

    fn finish(&self, img: &GrayImage) -> GrayImage {
        let small = if self.scale < 1.0 { ops::scale_down(img, self.scale) } else { img.clone() };
        if self.pad_to_pot { ops::pad_to_pot(&small, 255) } else { small }
    }
}

pub fn run(ctx: &JobContext, job: &DistanceFieldJob) -> Result<Vec<PathBuf>> {
    let mask = sdf::load_mask(&job.input)?;
    info!("encoding {} ({}x{}) spread={}", job.input.display(), mask.width(), mask.height(), job.spread);
    let field = sdf::signed_distance_field(&mask, job.spread)
        .with_context(|| format!("distance field for {}", job.input.display()))?;
    let dest = job.finish(&field);
    info!("canvas {}x{} -> {}x{}", field.width(), field.height(), dest.width(), dest.height());

    let mut written = vec![ctx.save(&dest, &job.output)?];
    written.extend(ctx.pack(&PackRequest::new(&written[0], PixelFormat::Ogl8))?);

    if let Some(name) = &job.comparison {
        // Same padding and scale as the field, but raw coverage, inverted to match its polarity.
        let padded = ops::pad(&mask, job.spread, 0);
        let small = if job.scale < 1.0 { ops::scale_down(&padded, job.scale) } else { padded };
        let inverted = filter::invert(&small);
        let comparison = if job.pad_to_pot { ops::pad_to_pot(&inverted, 255) } else { inverted };
        let path = ctx.save(&comparison, name)?;
        written.push(path.clone());
        written.extend(ctx.pack(&PackRequest::new(&path, PixelFormat::Ogl8))?);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn comparison_matches_field_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Shape.png");
        let mut mask = GrayImage::new(20, 12);
        for y in 3..9 {
            for x in 4..16 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask.save(&input).unwrap();
        let ctx = JobContext::offline(dir.path().join("out"));
        let job = DistanceFieldJob {
            input,
            output: "Field.png".into(),
            comparison: Some("Small.png".into()),
            spread: 4,
            scale: 0.5,
            pad_to_pot: true,
        };
        let written = run(&ctx, &job).unwrap();
        assert_eq!(written.len(), 2);
        let field = image::open(&written[0]).unwrap().to_luma8();
        let small = image::open(&written[1]).unwrap().to_luma8();
        // 28x20 padded, halved to 14x10, then centred on 16x16
        assert_eq!(field.dimensions(), (16, 16));
        assert_eq!(small.dimensions(), field.dimensions());
        assert_eq!(field.get_pixel(0, 0)[0], 255);
        assert!(field.get_pixel(8, 8)[0] < 128);
        assert!(small.get_pixel(8, 8)[0] < 128);
    }
}

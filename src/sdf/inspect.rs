//! Histogram summary of an encoded distance-field texture.

use std::path::Path;

use anyhow::{Context, Result};
use image::GrayImage;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub width: u32,
    pub height: u32,
    pub mean: f64,
    /// Percent of pixels exactly on the boundary value (128).
    pub boundary_pct: f64,
    /// Percent of pixels saturated at 0 (deep inside).
    pub inside_pct: f64,
    /// Percent of pixels saturated at 255 (far outside).
    pub outside_pct: f64,
}

pub fn summarize(field: &GrayImage) -> FieldSummary {
    let mut hist = [0u64; 256];
    for p in field.pixels() {
        hist[p[0] as usize] += 1;
    }
    let total = hist.iter().sum::<u64>().max(1) as f64;
    let mean = hist.iter().enumerate().map(|(i, c)| i as f64 * *c as f64).sum::<f64>() / total;
    FieldSummary {
        width: field.width(),
        height: field.height(),
        mean,
        boundary_pct: hist[128] as f64 / total * 100.0,
        inside_pct: hist[0] as f64 / total * 100.0,
        outside_pct: hist[255] as f64 / total * 100.0,
    }
}

pub fn summarize_file(path: &Path) -> Result<FieldSummary> {
    let img = image::open(path).with_context(|| format!("decode {}", path.display()))?;
    Ok(summarize(&img.to_luma8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_cover_saturated_pixels() {
        let mut img = GrayImage::from_pixel(4, 1, image::Luma([255]));
        img.put_pixel(0, 0, image::Luma([0]));
        img.put_pixel(1, 0, image::Luma([128]));
        let s = summarize(&img);
        assert_eq!(s.inside_pct, 25.0);
        assert_eq!(s.boundary_pct, 25.0);
        assert_eq!(s.outside_pct, 50.0);
        assert!((s.mean - (128.0 + 510.0) / 4.0).abs() < 1e-9);
    }
}

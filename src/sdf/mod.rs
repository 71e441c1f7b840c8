//! Signed distance field generation.
//!
//! Approximates the Euclidean distance transform of an alpha mask with an
//! 8-points sequential (chamfer) propagation over a flat grid of offsets, then
//! encodes the signed distance into an 8-bit image where 128 marks the mask
//! boundary, 0 is `spread` pixels or more inside the opaque region and 255 is
//! `spread` pixels or more outside it.

pub mod inspect;

use std::path::Path;

use anyhow::{bail, Context, Result};
use bevy::log::{debug, info};
use bevy::math::IVec2;
use image::{DynamicImage, GrayImage, Luma};

/// Offset stored in cells that have not reached a seed yet.
pub const SENTINEL: i32 = 1 << 24;
/// Upper bound for width + height and for the spread; keeps every stored offset within `SENTINEL ± MAX_EXTENT`.
pub const MAX_EXTENT: u32 = 1 << 20;

const UNREACHED: IVec2 = IVec2::splat(SENTINEL);

#[inline]
fn dist_sq(v: IVec2) -> i64 {
    let (x, y) = (v.x as i64, v.y as i64);
    x * x + y * y
}

/// Per-pixel offsets to the nearest seed cell found so far, indexed `y * width + x`.
#[derive(Clone, Debug)]
pub struct DistanceGrid {
    width: u32,
    height: u32,
    cells: Vec<IVec2>,
}

impl DistanceGrid {
    /// Seeds every cell whose mask value satisfies `seed` with a zero offset.
    pub fn from_mask(mask: &GrayImage, seed: impl Fn(u8) -> bool) -> Self {
        let cells = mask.pixels().map(|p| if seed(p[0]) { IVec2::ZERO } else { UNREACHED }).collect();
        Self { width: mask.width(), height: mask.height(), cells }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Stored offset at `(x, y)`; out-of-bounds reads see an unreached cell.
    pub fn offset(&self, x: i64, y: i64) -> IVec2 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return UNREACHED;
        }
        self.cells[self.index(x as u32, y as u32)]
    }

    /// Euclidean distance from `(x, y)` to its nearest seed.
    pub fn distance(&self, x: u32, y: u32) -> f64 {
        (dist_sq(self.cells[self.index(x, y)]) as f64).sqrt()
    }

    #[inline]
    fn compare(&self, cell: IVec2, x: u32, y: u32, ox: i32, oy: i32) -> IVec2 {
        let other = self.offset(x as i64 + ox as i64, y as i64 + oy as i64) + IVec2::new(ox, oy);
        if dist_sq(other) < dist_sq(cell) { other } else { cell }
    }

    #[inline]
    fn relax(&mut self, x: u32, y: u32, dirs: &[(i32, i32)]) {
        let i = self.index(x, y);
        let mut cell = self.cells[i];
        for &(ox, oy) in dirs {
            cell = self.compare(cell, x, y, ox, oy);
        }
        self.cells[i] = cell;
    }

    /// Two full sweeps: forward (W, N, NW, NE then E within the row) and
    /// backward (E, S, SW, SE then W within the row).
    pub fn propagate(&mut self) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            for x in 0..w {
                self.relax(x, y, &[(-1, 0), (0, -1), (-1, -1), (1, -1)]);
            }
            for x in (0..w).rev() {
                self.relax(x, y, &[(1, 0)]);
            }
        }
        for y in (0..h).rev() {
            for x in (0..w).rev() {
                self.relax(x, y, &[(1, 0), (0, 1), (-1, 1), (1, 1)]);
            }
            for x in 0..w {
                self.relax(x, y, &[(-1, 0)]);
            }
        }
    }
}

fn check_dimensions(width: u32, height: u32, spread: u32) -> Result<()> {
    if width == 0 || height == 0 {
        bail!("image has zero width or height ({width}x{height})");
    }
    if spread == 0 {
        bail!("spread must be at least 1 pixel");
    }
    if width as u64 + height as u64 >= MAX_EXTENT as u64 || spread >= MAX_EXTENT {
        bail!("image too large for distance field: {width}x{height} with spread {spread}");
    }
    Ok(())
}

/// Maps a signed distance in pixels onto 0..=255 with 128 at the boundary.
pub fn normalize(dist: f64, spread: u32) -> u8 {
    let s = spread as f64;
    let v = if dist < 0.0 { 128.0 * (dist + s) / s } else { 128.0 + 128.0 * dist / s };
    v.clamp(0.0, 255.0) as u8
}

/// Encodes `mask` without padding. Positive distances lie where the mask is
/// transparent (0), negative ones where it is fully opaque (255).
pub fn encode_distance_field(mask: &GrayImage, spread: u32) -> Result<GrayImage> {
    check_dimensions(mask.width(), mask.height(), spread)?;
    let mut transparent = DistanceGrid::from_mask(mask, |p| p == 0);
    let mut opaque = DistanceGrid::from_mask(mask, |p| p == 255);
    debug!("propagating {}x{} distance grids", mask.width(), mask.height());
    transparent.propagate();
    opaque.propagate();

    Ok(GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        let signed = opaque.distance(x, y) - transparent.distance(x, y);
        Luma([normalize(signed, spread)])
    }))
}

/// Pads `mask` by `spread` transparent pixels on every side, then encodes it.
pub fn signed_distance_field(mask: &GrayImage, spread: u32) -> Result<GrayImage> {
    check_dimensions(mask.width(), mask.height(), spread)?;
    let padded = crate::raster::ops::pad(mask, spread, 0);
    encode_distance_field(&padded, spread)
}

/// Alpha channel for four-channel images, otherwise the first channel.
pub fn alpha_or_first_channel(img: &DynamicImage) -> GrayImage {
    let color = img.color();
    if color.channel_count() == 4 {
        let rgba = img.to_rgba8();
        GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| Luma([rgba.get_pixel(x, y)[3]]))
    } else if color.has_color() {
        let rgb = img.to_rgb8();
        GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| Luma([rgb.get_pixel(x, y)[0]]))
    } else {
        let la = img.to_luma_alpha8();
        GrayImage::from_fn(la.width(), la.height(), |x, y| Luma([la.get_pixel(x, y)[0]]))
    }
}

/// Loads the mask channel of `path`, failing with the file name on decode errors.
pub fn load_mask(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).with_context(|| format!("decode {}", path.display()))?;
    if img.width() == 0 || img.height() == 0 {
        bail!("{}: image has zero width or height", path.display());
    }
    Ok(alpha_or_first_channel(&img))
}

/// Reads `input`, writes its padded distance field to `output`.
pub fn generate_distance_field(input: &Path, output: &Path, spread: u32) -> Result<GrayImage> {
    let mask = load_mask(input)?;
    info!("distance field: {} ({}x{}) spread={spread}", input.display(), mask.width(), mask.height());
    let field = signed_distance_field(&mask, spread).with_context(|| format!("distance field for {}", input.display()))?;
    field.save(output).with_context(|| format!("write {}", output.display()))?;
    info!("wrote {} ({}x{})", output.display(), field.width(), field.height());
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> GrayImage {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        GrayImage::from_fn(w, h, |x, y| Luma([if rows[y as usize].as_bytes()[x as usize] == b'#' { 255 } else { 0 }]))
    }

    #[test]
    fn single_seed_distances_are_exact() {
        let mut grid = DistanceGrid::from_mask(&mask_from(&["......", "......", "..#...", "......", "......"]), |p| p == 255);
        grid.propagate();
        assert_eq!(grid.distance(2, 2), 0.0);
        assert_eq!(grid.distance(5, 2), 3.0);
        assert!((grid.distance(0, 0) - 8f64.sqrt()).abs() < 1e-9);
        assert!((grid.distance(5, 4) - 13f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn unreached_cells_stay_far() {
        let mut grid = DistanceGrid::from_mask(&GrayImage::new(8, 4), |p| p == 255);
        grid.propagate();
        for y in 0..4 {
            for x in 0..8 {
                assert!(grid.distance(x, y) > (SENTINEL / 2) as f64);
            }
        }
    }

    #[test]
    fn normalize_endpoints() {
        assert_eq!(normalize(0.0, 4), 128);
        assert_eq!(normalize(4.0, 4), 255);
        assert_eq!(normalize(100.0, 4), 255);
        assert_eq!(normalize(-4.0, 4), 0);
        assert_eq!(normalize(-2.0, 4), 64);
    }

    #[test]
    fn rejects_zero_spread_and_empty_masks() {
        assert!(signed_distance_field(&GrayImage::new(4, 4), 0).is_err());
        assert!(signed_distance_field(&GrayImage::new(0, 4), 2).is_err());
    }

    #[test]
    fn first_channel_used_without_alpha() {
        let rgb = image::RgbImage::from_pixel(2, 2, image::Rgb([200, 10, 10]));
        let mask = alpha_or_first_channel(&DynamicImage::ImageRgb8(rgb));
        assert_eq!(mask.get_pixel(1, 1)[0], 200);
        let rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 10, 10, 77]));
        let mask = alpha_or_first_channel(&DynamicImage::ImageRgba8(rgba));
        assert_eq!(mask.get_pixel(0, 0)[0], 77);
    }
}

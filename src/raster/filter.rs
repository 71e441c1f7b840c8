//! Small fixed-kernel filters.

use image::{GrayImage, Luma};

/// 5x5 ring kernel (outer border weights 1, inner 3x3 zero), normalized by 16.
const BLUR_KERNEL: [[u32; 5]; 5] = [
    [1, 1, 1, 1, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 0, 0, 0, 1],
    [1, 1, 1, 1, 1],
];

/// One blur pass with edge pixels clamped.
pub fn blur(img: &GrayImage) -> GrayImage {
    let (w, h) = (img.width() as i64, img.height() as i64);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let mut acc = 0u32;
        for (ky, row) in BLUR_KERNEL.iter().enumerate() {
            for (kx, k) in row.iter().enumerate() {
                if *k == 0 {
                    continue;
                }
                let sx = (x as i64 + kx as i64 - 2).clamp(0, w - 1) as u32;
                let sy = (y as i64 + ky as i64 - 2).clamp(0, h - 1) as u32;
                acc += k * img.get_pixel(sx, sy)[0] as u32;
            }
        }
        Luma([((acc + 8) / 16).min(255) as u8])
    })
}

pub fn blur_passes(img: &GrayImage, passes: u32) -> GrayImage {
    (0..passes).fold(img.clone(), |acc, _| blur(&acc))
}

pub fn invert(img: &GrayImage) -> GrayImage {
    let mut out = img.clone();
    image::imageops::invert(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_preserves_flat_fields() {
        let img = GrayImage::from_pixel(7, 5, Luma([200]));
        assert_eq!(blur_passes(&img, 3), img);
    }

    #[test]
    fn blur_spreads_a_point() {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, Luma([255]));
        let out = blur(&img);
        // the ring kernel skips the centre
        assert_eq!(out.get_pixel(4, 4)[0], 0);
        assert_eq!(out.get_pixel(2, 2)[0], 16);
        assert_eq!(out.get_pixel(6, 4)[0], 16);
    }

    #[test]
    fn invert_flips_values() {
        let img = GrayImage::from_pixel(2, 2, Luma([10]));
        assert_eq!(invert(&img).get_pixel(1, 1)[0], 245);
    }
}

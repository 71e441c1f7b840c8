//! Canvas-level image operations: padding, power-of-two canvases, thumbnails, cube-map crosses.

use anyhow::{bail, Result};
use image::imageops::{self, FilterType};
use image::{GenericImageView, ImageBuffer, Pixel};

/// Smallest power of two `>= n` (1 for 0).
pub fn next_pot(n: u32) -> u32 {
    n.max(1).next_power_of_two()
}

/// Grows `img` by `border` pixels on every side filled with `fill`.
pub fn pad<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>, border: u32, fill: P::Subpixel) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let mut out = ImageBuffer::from_pixel(img.width() + border * 2, img.height() + border * 2, *P::from_slice(&vec![fill; P::CHANNEL_COUNT as usize]));
    imageops::replace(&mut out, img, border as i64, border as i64);
    out
}

/// Centres `img` on the next power-of-two canvas, filling the border with `fill`.
pub fn pad_to_pot<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>, fill: P::Subpixel) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    let (w, h) = (next_pot(img.width()), next_pot(img.height()));
    let mut out = ImageBuffer::from_pixel(w, h, *P::from_slice(&vec![fill; P::CHANNEL_COUNT as usize]));
    imageops::replace(&mut out, img, ((w - img.width()) / 2) as i64, ((h - img.height()) / 2) as i64);
    out
}

/// Size that fits `(w, h)` inside `(max_w, max_h)` keeping the aspect ratio; never grows.
pub fn thumbnail_size(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let (mut x, mut y) = (w as f64, h as f64);
    if x > max_w as f64 {
        y = (y * max_w as f64 / x).round().max(1.0);
        x = max_w as f64;
    }
    if y > max_h as f64 {
        x = (x * max_h as f64 / y).round().max(1.0);
        y = max_h as f64;
    }
    (x as u32, y as u32)
}

pub fn thumbnail<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>, max_w: u32, max_h: u32) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    let (w, h) = thumbnail_size(img.width(), img.height(), max_w.max(1), max_h.max(1));
    if (w, h) == img.dimensions() {
        return img.clone();
    }
    imageops::resize(img, w, h, FilterType::Lanczos3)
}

/// Scales by `factor` (shrink only) the way a thumbnail request of `size * factor` would.
pub fn scale_down<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>, factor: f32) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    let max_w = (img.width() as f32 * factor) as u32;
    let max_h = (img.height() as f32 * factor) as u32;
    thumbnail(img, max_w, max_h)
}

/// Flips both axes (180° rotation).
pub fn rotate_half<P>(img: &ImageBuffer<P, Vec<P::Subpixel>>) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel + 'static,
    P::Subpixel: 'static,
{
    imageops::rotate180(img)
}

/// Cube-map face order used by the demos.
pub const CUBE_FACES: [&str; 6] = ["+X", "-X", "+Y", "-Y", "+Z", "-Z"];

/// Cuts a vertical-cross layout (3 faces wide, 4 tall) into +X, -X, +Y, -Y, +Z, -Z.
pub fn split_cross_cubemap<I>(cross: &I) -> Result<Vec<ImageBuffer<I::Pixel, Vec<<I::Pixel as Pixel>::Subpixel>>>>
where
    I: GenericImageView + 'static,
    I::Pixel: 'static,
    <I::Pixel as Pixel>::Subpixel: 'static,
{
    let w = cross.width() / 3;
    let h = cross.height() / 4;
    if w != h {
        bail!("cubemap faces are non-square ({w}x{h})");
    }
    if w == 0 {
        bail!("cubemap cross too small ({}x{})", cross.width(), cross.height());
    }
    let cells = [(2, 1), (0, 1), (1, 2), (1, 0), (1, 1), (1, 3)];
    Ok(cells.iter().map(|&(cx, cy)| cross.view(cx * w, cy * h, w, h).to_image()).collect())
}

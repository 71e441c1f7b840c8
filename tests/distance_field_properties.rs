// Properties of the encoded distance field on small hand-built masks.

use demo_assets::sdf::{encode_distance_field, normalize, signed_distance_field};
use image::{GrayImage, Luma};

fn mask(w: u32, h: u32, opaque: impl Fn(u32, u32) -> bool) -> GrayImage {
    GrayImage::from_fn(w, h, |x, y| Luma([if opaque(x, y) { 255 } else { 0 }]))
}

#[test]
fn empty_mask_is_far_outside_everywhere() {
    let field = signed_distance_field(&mask(10, 10, |_, _| false), 3).unwrap();
    assert_eq!(field.dimensions(), (16, 16));
    assert!(field.pixels().all(|p| p[0] == 255));
}

#[test]
fn single_pixel_falls_off_within_spread() {
    let field = signed_distance_field(&mask(7, 7, |x, y| x == 3 && y == 3), 3).unwrap();
    assert_eq!(field.dimensions(), (13, 13));
    let centre = field.get_pixel(6, 6)[0];
    assert!(centre < 128, "centre {centre}");
    assert_eq!(centre, 85);
    // direct neighbours sit one pixel outside
    assert_eq!(field.get_pixel(7, 6)[0], 170);
    for (x, y, p) in field.enumerate_pixels() {
        let cheb = (x as i32 - 6).abs().max((y as i32 - 6).abs());
        if cheb >= 3 {
            assert_eq!(p[0], 255, "({x}, {y})");
        }
    }
}

#[test]
fn deep_interior_saturates_at_zero() {
    let field = encode_distance_field(&mask(20, 20, |x, y| (2..18).contains(&x) && (2..18).contains(&y)), 3).unwrap();
    assert_eq!(field.get_pixel(10, 10)[0], 0);
    assert!(field.get_pixel(0, 0)[0] > 200);
}

#[test]
fn inverting_the_mask_mirrors_the_field() {
    let shape = |x: u32, y: u32| (x as i32 - 8).pow(2) + (y as i32 - 6).pow(2) <= 20;
    let spread = 4;
    let field = encode_distance_field(&mask(17, 13, shape), spread).unwrap();
    let inverse = encode_distance_field(&mask(17, 13, |x, y| !shape(x, y)), spread).unwrap();
    for (a, b) in field.pixels().zip(inverse.pixels()) {
        let mirrored = 255 - b[0] as i32;
        assert!((a[0] as i32 - mirrored).abs() <= 1, "{} vs {}", a[0], mirrored);
    }
}

#[test]
fn encoding_is_deterministic() {
    let m = mask(15, 9, |x, y| (x + y) % 5 == 0);
    assert_eq!(encode_distance_field(&m, 3).unwrap(), encode_distance_field(&m, 3).unwrap());
}

#[test]
fn boundary_pixels_stay_near_midpoint() {
    let spread = 8;
    let m = mask(16, 16, |x, _| x >= 8);
    let field = encode_distance_field(&m, spread).unwrap();
    let step = (128 / spread) as i32 + 1;
    for y in 0..16 {
        assert!((field.get_pixel(7, y)[0] as i32 - 128).abs() <= step);
        assert!((field.get_pixel(8, y)[0] as i32 - 128).abs() <= step);
    }
    assert_eq!(normalize(0.0, spread), 128);
}

#[test]
fn oversized_spread_is_rejected() {
    assert!(signed_distance_field(&mask(4, 4, |_, _| true), 1 << 21).is_err());
}

//! Camera demo buttons: a rounded rectangle in a pale tint of `hue`, an
//! optional darker outline, and a centred label in the darker tint.

use std::path::{Path, PathBuf};

use ab_glyph::Font;
use anyhow::Result;
use bevy::math::Vec2;

use super::JobContext;
use crate::raster::{hsv_to_rgb, load_font, rounded_rect, Canvas, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonSpec {
    pub name: String,
    pub label: String,
    pub hue: f32,
    pub outline: bool,
}

impl ButtonSpec {
    pub fn take_picture() -> Self {
        Self { name: "TakePicture".into(), label: "Take Picture".into(), hue: 180.0, outline: true }
    }

    pub fn please_wait() -> Self {
        Self { name: "PleaseWait".into(), label: "Please Wait".into(), hue: 90.0, outline: false }
    }

    /// Body and outline on a 128x32 canvas spanning a 4x1 viewport. The
    /// source is left at the label tint.
    pub fn render_body(&self, ctx: &JobContext) -> Canvas {
        let mut c = ctx.canvas(128, 32, Vec2::new(4.0, 1.0));
        c.set_line_width(0.07);
        let body = rounded_rect(Vec2::new(2.0, 0.5), 1.9, 0.8, 0.125);
        let (r, g, b) = hsv_to_rgb(self.hue, 0.25, 0.9);
        c.set_source_rgb(r, g, b).fill(&Shape::Path(body.clone()));
        let (r, g, b) = hsv_to_rgb(self.hue, 0.25, 0.5);
        c.set_source_rgb(r, g, b);
        if self.outline {
            c.stroke(&body);
        }
        c
    }

    pub fn render<F: Font>(&self, ctx: &JobContext, font: &F) -> Canvas {
        let mut c = self.render_body(ctx);
        c.fill_text_centered(font, 0.5, 2.0, 0.5, &self.label);
        c
    }
}

pub fn run(ctx: &JobContext, font: &Path, buttons: &[ButtonSpec]) -> Result<Vec<PathBuf>> {
    let font = load_font(font)?;
    buttons
        .iter()
        .map(|b| ctx.save(&b.render(ctx, &font).to_rgba8(), &format!("{}.png", b.name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [u8; 4], b: [u8; 4]) -> bool {
        a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 1)
    }

    #[test]
    fn body_fill_and_outline_tints() {
        let ctx = JobContext::offline("unused");
        let img = ButtonSpec::take_picture().render_body(&ctx).to_rgba8();
        assert!(close(img.get_pixel(64, 16).0, [172, 230, 230, 255]), "{:?}", img.get_pixel(64, 16));
        assert!(close(img.get_pixel(64, 3).0, [96, 128, 128, 255]), "{:?}", img.get_pixel(64, 3));
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn please_wait_has_no_outline() {
        let ctx = JobContext::offline("unused");
        let img = ButtonSpec::please_wait().render_body(&ctx).to_rgba8();
        let (mut top, centre) = (img.get_pixel(64, 3).0, img.get_pixel(64, 16).0);
        // partial coverage along the top edge
        assert!(top[3] < 255);
        top[3] = 255;
        assert!(close(top, centre), "{top:?} vs {centre:?}");
    }
}

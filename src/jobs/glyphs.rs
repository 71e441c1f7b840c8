//! Glyph atlas textures with their metrics appended to the packed header and
//! mirrored into a JSON sidecar.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bevy::log::info;
use clap::ValueEnum;
use serde::Serialize;

use super::JobContext;
use crate::glyphs::{self, GlyphAtlas, GlyphEntry, KerningPair};
use crate::header;
use crate::packer::{PackRequest, PixelFormat};
use crate::raster::load_font;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GlyphPreset {
    /// Glyph indices 1..98 wrapped into a 256x128 atlas.
    Atlas,
    /// Digits 0-9 in a 256x32 strip.
    Numerals,
}

impl GlyphPreset {
    pub fn texture_name(self) -> &'static str {
        match self {
            GlyphPreset::Atlas => "GlyphsTexture",
            GlyphPreset::Numerals => "NumeralsTexture",
        }
    }

    pub fn array_name(self) -> &'static str {
        match self {
            GlyphPreset::Atlas => "Glyphs",
            GlyphPreset::Numerals => "NumeralGlyphs",
        }
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    texture: String,
    width: u32,
    height: u32,
    size: f32,
    glyphs: &'a [GlyphEntry],
    kerning: &'a [KerningPair],
}

pub fn run(ctx: &JobContext, font_path: &Path, preset: GlyphPreset, size: Option<f32>, kerning: bool) -> Result<Vec<PathBuf>> {
    let font = load_font(font_path)?;
    let (set, layout, preset_size) = match preset {
        GlyphPreset::Atlas => glyphs::atlas_preset(),
        GlyphPreset::Numerals => glyphs::numerals_preset(),
    };
    let size = size.unwrap_or(preset_size);
    let atlas = GlyphAtlas::render(&font, size, &set, &layout)
        .with_context(|| format!("{} atlas from {}", preset.texture_name(), font_path.display()))?;
    info!("{} glyphs, {:.1}% coverage", atlas.entries.len(), atlas.coverage() * 100.0);

    let pairs = if kerning {
        let data = fs::read(font_path).with_context(|| format!("read font {}", font_path.display()))?;
        atlas.kerning(&data)?
    } else {
        Vec::new()
    };

    let name = preset.texture_name();
    let png = ctx.save(&atlas.image, &format!("{name}.png"))?;
    let request = PackRequest::new(&png, PixelFormat::Ogl8);
    let mut text = header::glyph_table(preset.array_name(), &atlas.entries);
    text.push_str(&header::kerning_table(&format!("{}Kerning", preset.array_name()), &pairs));
    // Without the packer the tables get a header of their own.
    let header_path = match ctx.pack(&request)? {
        Some(h) => {
            header::append(&h, &text)?;
            h
        }
        None => ctx.write_text(&format!("{name}.h"), &text)?,
    };

    let sidecar = Sidecar {
        texture: format!("{name}.png"),
        width: atlas.image.width(),
        height: atlas.image.height(),
        size,
        glyphs: &atlas.entries,
        kerning: &pairs,
    };
    let json = ctx.write_text(&format!("{name}.json"), &serde_json::to_string_pretty(&sidecar)?)?;

    Ok(vec![png, header_path, json])
}

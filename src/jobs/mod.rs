//! Generation jobs, one per demo texture set.
//!
//! Each job is a short linear pipeline: render or load, post-process, write the
//! raster into the output directory, then hand it to the packer. Jobs return
//! every file they wrote so callers (and tests) can check the results.

pub mod billboards;
pub mod buttons;
pub mod circle;
pub mod cubemap;
pub mod distance_field;
pub mod dome;
pub mod glyphs;
pub mod heightmap;
pub mod labels;
pub mod pack;
pub mod triangle;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bevy::log::info;
use bevy::math::Vec2;
use image::{EncodableLayout, ImageBuffer, PixelWithColorType};

use crate::config::AssetsConfig;
use crate::header;
use crate::packer::{PackRequest, TexturePacker};
use crate::raster::Canvas;

/// Shared settings every job reads.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub out_dir: PathBuf,
    pub packer: TexturePacker,
    pub supersamples: u32,
    pub rewrite_declarations: bool,
}

impl JobContext {
    pub fn from_config(cfg: &AssetsConfig) -> Self {
        Self {
            out_dir: cfg.output_dir.clone(),
            packer: cfg.packer.packer(),
            supersamples: cfg.render.supersamples,
            rewrite_declarations: cfg.packer.rewrite_declarations,
        }
    }

    /// Writes into `out_dir` without running any external tool.
    pub fn offline(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            packer: TexturePacker { enabled: false, ..Default::default() },
            supersamples: 4,
            rewrite_declarations: true,
        }
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }

    fn ensure_out_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir).with_context(|| format!("create output dir {}", self.out_dir.display()))
    }

    pub fn canvas(&self, width: u32, height: u32, viewport: Vec2) -> Canvas {
        let mut c = Canvas::with_viewport(width, height, viewport);
        c.set_supersamples(self.supersamples);
        c
    }

    pub fn save<P>(&self, img: &ImageBuffer<P, Vec<P::Subpixel>>, name: &str) -> Result<PathBuf>
    where
        P: PixelWithColorType,
        [P::Subpixel]: EncodableLayout,
    {
        self.ensure_out_dir()?;
        let path = self.output(name);
        img.save(&path).with_context(|| format!("write {}", path.display()))?;
        info!("wrote {} ({}x{})", path.display(), img.width(), img.height());
        Ok(path)
    }

    pub fn write_text(&self, name: &str, text: &str) -> Result<PathBuf> {
        self.ensure_out_dir()?;
        let path = self.output(name);
        fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Packs and, when configured, rewrites the declarations of the produced header.
    pub fn pack(&self, req: &PackRequest) -> Result<Option<PathBuf>> {
        let header = self.packer.pack(req)?;
        if let Some(h) = &header {
            if self.rewrite_declarations {
                header::rewrite_declarations(h)?;
            }
        }
        Ok(header)
    }
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "texture".into())
}

//! Toolchain configuration loaded from RON.
//!
//! Every section is `#[serde(default)]`, so a config file only has to name the
//! values it changes. Several files can be layered (later files win per key),
//! which keeps machine-specific packer paths out of the shared config.

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::dome::{BasePolyhedron, DEFAULT_MAX_HEIGHT};
use crate::packer::TexturePacker;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PackerConfig {
    /// When false, rasters are still written but no external tool is run.
    pub enabled: bool,
    pub pvr_tex_tool: PathBuf,
    pub filewrap: PathBuf,
    /// Pass `-yflip1` so textures load bottom-up in GL.
    pub flip_y: bool,
    /// Replace `static const unsigned long` with `const unsigned int` in packed headers.
    pub rewrite_declarations: bool,
}
impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pvr_tex_tool: "PVRTexTool".into(),
            filewrap: "Filewrap".into(),
            flip_y: true,
            rewrite_declarations: true,
        }
    }
}
impl PackerConfig {
    pub fn packer(&self) -> TexturePacker {
        TexturePacker {
            tool: self.pvr_tex_tool.clone(),
            filewrap: self.filewrap.clone(),
            flip_y: self.flip_y,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Supersample grid per axis used by the canvas rasterizer.
    pub supersamples: u32,
}
impl Default for RenderConfig {
    fn default() -> Self {
        Self { supersamples: 4 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DistanceFieldConfig {
    pub spread: u32,
    /// Thumbnail factor applied after encoding (1.0 keeps full size).
    pub scale: f32,
    pub pad_to_pot: bool,
}
impl Default for DistanceFieldConfig {
    fn default() -> Self {
        Self { spread: 32, scale: 0.25, pad_to_pot: true }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DomeConfig {
    pub level_of_detail: u32,
    pub base: BasePolyhedron,
    pub max_height: f32,
}
impl Default for DomeConfig {
    fn default() -> Self {
        Self { level_of_detail: 2, base: BasePolyhedron::Icosahedron, max_height: DEFAULT_MAX_HEIGHT }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AssetsConfig {
    pub output_dir: PathBuf,
    pub packer: PackerConfig,
    pub render: RenderConfig,
    pub distance_field: DistanceFieldConfig,
    pub dome: DomeConfig,
}
impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            output_dir: "out".into(),
            packer: PackerConfig::default(),
            render: RenderConfig::default(),
            distance_field: DistanceFieldConfig::default(),
            dome: DomeConfig::default(),
        }
    }
}

fn merge_value(base: &mut ron::Value, overlay: ron::Value) {
    use ron::Value;
    match (base, overlay) {
        (Value::Map(bm), Value::Map(om)) => {
            for (k, v) in om.into_iter() {
                let existing = bm.iter_mut().find(|(ek, _)| **ek == k).map(|(_, ev)| ev);
                if let Some(ev) = existing {
                    merge_value(ev, v);
                } else {
                    bm.insert(k, v);
                }
            }
        }
        (b, o) => *b = o,
    }
}

impl AssetsConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        ron::from_str(&data).with_context(|| format!("parse RON {}", path.display()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(format!("{e:#}"))),
        }
    }

    /// Merges the files in order, later keys overriding earlier ones.
    /// Returns the config, the files that were used and the errors met on the way.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let mut merged: Option<ron::Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        for p in paths {
            let path = p.as_ref();
            let val = match fs::read_to_string(path) {
                Ok(txt) => match ron::from_str::<ron::Value>(&txt) {
                    Ok(v) => v,
                    Err(e) => {
                        errors.push(format!("{}: parse error: {e}", path.display()));
                        continue;
                    }
                },
                Err(e) => {
                    errors.push(format!("{}: read error: {e}", path.display()));
                    continue;
                }
            };
            match &mut merged {
                Some(cur) => merge_value(cur, val),
                None => merged = Some(val),
            }
            used.push(path.display().to_string());
        }
        let Some(val) = merged else {
            return (Self::default(), used, errors);
        };
        match val.into_rust::<AssetsConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!("failed to deserialize merged config; using defaults: {e}"));
                (Self::default(), used, errors)
            }
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.distance_field.spread == 0 {
            w.push("distance_field.spread is 0; distance-field jobs will fail".into());
        } else if self.distance_field.spread > 256 {
            w.push(format!("distance_field.spread {} is very large; encoding will be slow", self.distance_field.spread));
        }
        if !(self.distance_field.scale > 0.0 && self.distance_field.scale <= 1.0) {
            w.push(format!(
                "distance_field.scale {} outside (0, 1]; thumbnails only shrink",
                self.distance_field.scale
            ));
        }
        if self.render.supersamples == 0 || self.render.supersamples > 16 {
            w.push(format!("render.supersamples {} clamped to 1..=16", self.render.supersamples));
        }
        if self.dome.level_of_detail > 6 {
            w.push(format!(
                "dome.level_of_detail {} produces {} faces before the cut",
                self.dome.level_of_detail,
                self.dome.base.face_count() * 4usize.pow(self.dome.level_of_detail)
            ));
        }
        if self.dome.max_height <= -1.0 {
            w.push(format!("dome.max_height {} removes every face", self.dome.max_height));
        }
        if self.packer.enabled && self.packer.pvr_tex_tool.as_os_str().is_empty() {
            w.push("packer.pvr_tex_tool is empty while the packer is enabled".into());
        }
        w
    }
}

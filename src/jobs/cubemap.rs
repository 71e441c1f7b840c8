//! Cube-map faces cut from a vertical-cross image, plus any extra textures the
//! demo packs in the same 565 format.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::log::info;

use super::JobContext;
use crate::packer::{PackRequest, PixelFormat};
use crate::raster::ops;

#[derive(Debug, Clone, PartialEq)]
pub struct CubemapJob {
    pub cross: PathBuf,
    /// Faces are shrunk to fit this square.
    pub face_size: u32,
    pub extras: Vec<PathBuf>,
}

pub fn run(ctx: &JobContext, job: &CubemapJob) -> Result<Vec<PathBuf>> {
    let cross = image::open(&job.cross).with_context(|| format!("decode {}", job.cross.display()))?.to_rgb8();
    let faces = ops::split_cross_cubemap(&cross).with_context(|| format!("split {}", job.cross.display()))?;
    info!("cubemap faces are {0}x{0}", faces[0].width());

    let last = faces.len() - 1;
    let mut written = Vec::new();
    for (i, face) in faces.iter().enumerate() {
        let small = ops::thumbnail(face, job.face_size, job.face_size);
        // The -Z face is stored upside down and mirrored.
        let small = if i == last { ops::rotate_half(&small) } else { small };
        let path = ctx.save(&small, &format!("Face{i}.png"))?;
        written.push(path.clone());
        written.extend(ctx.pack(&PackRequest::new(&path, PixelFormat::Ogl565))?);
    }
    for extra in &job.extras {
        written.extend(ctx.pack(&PackRequest::new(extra, PixelFormat::Ogl565))?);
    }
    Ok(written)
}

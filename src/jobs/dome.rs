//! `GeodesicDome.h`: the flattened dome vertex buffer as C source.

use std::path::PathBuf;

use anyhow::{bail, Result};
use bevy::log::info;

use super::JobContext;
use crate::config::DomeConfig;
use crate::dome::geodesic_dome;
use crate::header;

pub fn run(ctx: &JobContext, cfg: &DomeConfig) -> Result<Vec<PathBuf>> {
    let mesh = geodesic_dome(cfg.base, cfg.level_of_detail, cfg.max_height);
    if mesh.faces.is_empty() {
        bail!("dome cut at y < {} leaves no faces", cfg.max_height);
    }
    info!(
        "{:?} level {}: {} vertices, {} faces kept",
        cfg.base,
        cfg.level_of_detail,
        mesh.vertices.len(),
        mesh.faces.len()
    );
    let text = header::dome_header(&mesh.flat_vertices());
    Ok(vec![ctx.write_text("GeodesicDome.h", &text)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dome::BasePolyhedron;

    #[test]
    fn header_counts_kept_faces() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = JobContext::offline(dir.path());
        let cfg = DomeConfig { level_of_detail: 0, base: BasePolyhedron::Octahedron, max_height: 0.125 };
        let written = run(&ctx, &cfg).unwrap();
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert!(text.starts_with("const int DomeFaceCount = 4;\n"));
        // 12 corners, two lines each, plus three header lines and the closing brace
        assert_eq!(text.lines().count(), 3 + 24 + 1);
    }

    #[test]
    fn empty_cut_is_an_error() {
        let ctx = JobContext::offline("unused");
        let cfg = DomeConfig { level_of_detail: 1, base: BasePolyhedron::Icosahedron, max_height: -2.0 };
        assert!(run(&ctx, &cfg).is_err());
    }
}

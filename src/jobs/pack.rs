//! Packing of arbitrary files: photos, precomputed maps and sprite sheets that
//! need no rendering, optionally followed by appended tables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{file_stem, JobContext};
use crate::header;
use crate::packer::PackRequest;

/// One `static float <name>[]` table of sprite boxes, read from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoxTable {
    pub name: String,
    #[serde(default)]
    pub indexed: bool,
    pub boxes: Vec<[i32; 4]>,
}

pub fn load_box_tables(path: &Path) -> Result<Vec<BoxTable>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse box tables {}", path.display()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackJob {
    pub request: PackRequest,
    /// Text file appended verbatim to the header.
    pub append: Option<PathBuf>,
    pub boxes: Option<PathBuf>,
}

pub fn run(ctx: &JobContext, job: &PackJob) -> Result<Vec<PathBuf>> {
    let mut tail = String::new();
    if let Some(path) = &job.append {
        tail.push_str(&fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?);
    }
    if let Some(path) = &job.boxes {
        for table in load_box_tables(path)? {
            tail.push_str(&header::box_table(&table.name, &table.boxes, table.indexed));
        }
    }
    let Some(header_path) = ctx.pack(&job.request)? else {
        if !tail.is_empty() {
            let name = format!("{}.tables.h", file_stem(&job.request.input));
            return Ok(vec![ctx.write_text(&name, &tail)?]);
        }
        return Ok(Vec::new());
    };
    if !tail.is_empty() {
        header::append(&header_path, &tail)?;
    }
    Ok(vec![header_path])
}

/// Filewrap for data the packer can't read (e.g. precompressed PVRTC).
pub fn wrap(ctx: &JobContext, input: &Path, header: Option<&Path>) -> Result<Vec<PathBuf>> {
    let header = header.map(Path::to_path_buf).unwrap_or_else(|| ctx.output(&format!("{}.h", file_stem(input))));
    Ok(ctx.packer.wrap(input, &header)?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::PixelFormat;

    #[test]
    fn box_tables_parse_with_default_index_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boxes.json");
        fs::write(&path, r#"[{"name": "EyeLayerBoxes", "boxes": [[0, 0, 116, 70]]}, {"name": "U", "indexed": true, "boxes": []}]"#).unwrap();
        let tables = load_box_tables(&path).unwrap();
        assert_eq!(tables.len(), 2);
        assert!(!tables[0].indexed);
        assert_eq!(tables[0].boxes, vec![[0, 0, 116, 70]]);
        assert!(tables[1].indexed);
    }

    #[test]
    fn tables_kept_when_packer_is_off() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("EyesLayer.png");
        fs::write(&png, b"png").unwrap();
        let boxes = dir.path().join("boxes.json");
        fs::write(&boxes, r#"[{"name": "EyeLayerBoxes", "boxes": [[0, 0, 116, 70], [116, 0, 228, 70]]}]"#).unwrap();
        let ctx = JobContext::offline(dir.path().join("out"));
        let job = PackJob { request: PackRequest::new(&png, PixelFormat::Ogl88), append: None, boxes: Some(boxes) };
        let written = run(&ctx, &job).unwrap();
        assert_eq!(written.len(), 1);
        let text = fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("static float EyeLayerBoxes[] = {\n    0, 0, 116, 70,\n    116, 0, 228, 70,\n};"));
    }
}

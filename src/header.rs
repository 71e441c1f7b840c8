//! C source text appended to (or written as) the headers the demos include.

use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use bevy::log::debug;

use crate::dome::DomeVertex;
use crate::glyphs::{GlyphEntry, KerningPair};

/// Declaration emitted by the packer that the demos cannot use as-is.
pub const PACKER_DECLARATION: &str = "static const unsigned long";
pub const PORTABLE_DECLARATION: &str = "const unsigned int";

/// Rewrites packer declarations in place. Returns how many were replaced.
pub fn rewrite_declarations(path: &Path) -> Result<usize> {
    let text = fs::read_to_string(path).with_context(|| format!("read header {}", path.display()))?;
    let count = text.matches(PACKER_DECLARATION).count();
    if count > 0 {
        fs::write(path, text.replace(PACKER_DECLARATION, PORTABLE_DECLARATION))
            .with_context(|| format!("write header {}", path.display()))?;
    }
    debug!("rewrote {count} declarations in {}", path.display());
    Ok(count)
}

/// Appends `text` to `path`, creating the file when missing.
pub fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {} for append", path.display()))?;
    file.write_all(text.as_bytes()).with_context(|| format!("append to {}", path.display()))
}

const GLYPH_STRUCTS: &str = "
struct GlyphPosition {
    int X;
    int Y;
};

struct GlyphMetrics {
    int XBearing;
    int YBearing;
    int Width;
    int Height;
    int XAdvance;
    int YAdvance;
};

struct Glyph {
    GlyphPosition Position;
    GlyphMetrics Metrics;
};

";

/// Struct definitions followed by `static const Glyph <name>[]`.
pub fn glyph_table(name: &str, entries: &[GlyphEntry]) -> String {
    let mut s = String::from(GLYPH_STRUCTS);
    let _ = writeln!(s, "static const Glyph {name}[] = {{");
    for e in entries {
        let m = &e.metrics;
        let _ = writeln!(
            s,
            "    {{{{ {}, {} }}, {{ {}, {}, {}, {}, {}, {} }}}},",
            e.x, e.y, m.x_bearing, m.y_bearing, m.width, m.height, m.x_advance, m.y_advance
        );
    }
    s.push_str("};\n");
    s
}

/// Kerning pairs as `{ left, right, adjust }` rows; empty string when there are none.
pub fn kerning_table(name: &str, pairs: &[KerningPair]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut s = String::from("\nstruct KerningPair {\n    int Left;\n    int Right;\n    float XAdjust;\n};\n\n");
    let _ = writeln!(s, "static const int {name}Count = {};", pairs.len());
    let _ = writeln!(s, "static const KerningPair {name}[] = {{");
    for p in pairs {
        let _ = writeln!(s, "    {{ {}, {}, {:.6} }},", p.left, p.right, p.x_adjust);
    }
    s.push_str("};\n");
    s
}

/// Sprite boxes `left, top, right, bottom` as a flat float array.
pub fn box_table(name: &str, boxes: &[[i32; 4]], indexed: bool) -> String {
    let mut s = format!("\nstatic float {name}[] = {{\n");
    for (i, b) in boxes.iter().enumerate() {
        let _ = write!(s, "    {}, {}, {}, {},", b[0], b[1], b[2], b[3]);
        if indexed {
            let _ = write!(s, " // {i}");
        }
        s.push('\n');
    }
    s.push_str("};\n");
    s
}

/// Interleaved `x, y, z, u, v` per corner.
pub fn dome_header(vertices: &[DomeVertex]) -> String {
    let faces = vertices.len() / 3;
    let mut s = String::new();
    let _ = writeln!(s, "const int DomeFaceCount = {faces};");
    let _ = writeln!(s, "const int DomeVertexCount = DomeFaceCount * 3;");
    let _ = writeln!(s, "const float DomeVertices[DomeVertexCount * 5] = {{");
    for v in vertices {
        let _ = writeln!(s, "    {:.6}, {:.6}, {:.6},", v.position.x, v.position.y, v.position.z);
        let _ = writeln!(s, "    {:.6}, {:.6},", v.uv.x, v.uv.y);
    }
    s.push_str("};\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::GlyphMetrics;
    use bevy::math::{Vec2, Vec3};

    #[test]
    fn glyph_rows_match_struct_layout() {
        let e = GlyphEntry {
            glyph: 3,
            x: 12,
            y: 0,
            metrics: GlyphMetrics { x_bearing: 1, y_bearing: -14, width: 9, height: 14, x_advance: 11, y_advance: 0 },
        };
        let text = glyph_table("Glyphs", &[e]);
        assert!(text.contains("struct GlyphMetrics {\n    int XBearing;"));
        assert!(text.contains("static const Glyph Glyphs[] = {\n    {{ 12, 0 }, { 1, -14, 9, 14, 11, 0 }},\n};\n"));
    }

    #[test]
    fn kerning_table_is_empty_without_pairs() {
        assert_eq!(kerning_table("Kerning", &[]), "");
        let text = kerning_table("Kerning", &[KerningPair { left: 4, right: 9, x_adjust: -1.5 }]);
        assert!(text.contains("static const int KerningCount = 1;"));
        assert!(text.contains("    { 4, 9, -1.500000 },"));
    }

    #[test]
    fn box_rows_carry_optional_index() {
        let text = box_table("EyeLayerBoxes", &[[0, 0, 116, 70], [116, 0, 228, 70]], true);
        assert!(text.starts_with("\nstatic float EyeLayerBoxes[] = {\n"));
        assert!(text.contains("    116, 0, 228, 70, // 1\n"));
        assert!(!box_table("B", &[[1, 2, 3, 4]], false).contains("//"));
    }

    #[test]
    fn dome_header_layout() {
        let v = |x: f32| DomeVertex { position: Vec3::new(x, -0.5, 0.25), uv: Vec2::new(0.5, 1.0) };
        let text = dome_header(&[v(1.0), v(0.0), v(-1.0)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "const int DomeFaceCount = 1;");
        assert_eq!(lines[1], "const int DomeVertexCount = DomeFaceCount * 3;");
        assert_eq!(lines[2], "const float DomeVertices[DomeVertexCount * 5] = {");
        assert_eq!(lines[3], "    1.000000, -0.500000, 0.250000,");
        assert_eq!(lines[4], "    0.500000, 1.000000,");
        assert_eq!(*lines.last().unwrap(), "};");
    }

    #[test]
    fn declarations_rewritten_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Tex.h");
        fs::write(&path, "static const unsigned long _Tex[] = {1};\nstatic const unsigned long _Tex2[] = {2};\n").unwrap();
        assert_eq!(rewrite_declarations(&path).unwrap(), 2);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("const unsigned int _Tex[]"));
        assert!(!text.contains("unsigned long"));
        append(&path, "// tail\n").unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with("// tail\n"));
    }
}

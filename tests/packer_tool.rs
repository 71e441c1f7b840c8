// Runs a stand-in packer script end to end. Kept to a single test so no other
// thread forks while the script is still open for writing.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;

use demo_assets::jobs::pack::{self, PackJob};
use demo_assets::jobs::JobContext;
use demo_assets::packer::{PackRequest, PixelFormat, TexturePacker};

const FAKE_PACKER: &str = r#"#!/bin/sh
for a in "$@"; do
  case "$a" in
    -i*) in="${a#-i}" ;;
    -o*) out="${a#-o}" ;;
  esac
done
[ -z "$out" ] && out="${in%.*}.h"
printf 'static const unsigned long Data[] = { 1 };\n' > "$out"
"#;

#[test]
fn packed_header_is_rewritten_and_extended() {
    let dir = tempfile::tempdir().unwrap();
    let tool = dir.path().join("fake-packer");
    fs::write(&tool, FAKE_PACKER).unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

    let png = dir.path().join("EyesLayer.png");
    fs::write(&png, b"not really a png").unwrap();
    let boxes = dir.path().join("boxes.json");
    fs::write(&boxes, r#"[{"name": "EyeLayerBoxes", "indexed": true, "boxes": [[0, 0, 116, 70]]}]"#).unwrap();

    let mut ctx = JobContext::offline(dir.path().join("out"));
    ctx.packer = TexturePacker { tool, enabled: true, ..Default::default() };
    let job = PackJob { request: PackRequest::new(&png, PixelFormat::Ogl8888), append: None, boxes: Some(boxes) };
    let written = pack::run(&ctx, &job).unwrap();

    assert_eq!(written, vec![dir.path().join("EyesLayer.h")]);
    let text = fs::read_to_string(&written[0]).unwrap();
    assert!(text.starts_with("const unsigned int Data[] = { 1 };\n"), "{text}");
    assert!(text.ends_with("static float EyeLayerBoxes[] = {\n    0, 0, 116, 70, // 0\n};\n"), "{text}");
}

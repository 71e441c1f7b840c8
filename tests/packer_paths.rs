// Header locations when the packer runs in the input's directory. One test only:
// it changes the process working directory and writes an executable script.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use demo_assets::config::DistanceFieldConfig;
use demo_assets::jobs::distance_field::{self, DistanceFieldJob};
use demo_assets::jobs::pack::{self, PackJob};
use demo_assets::jobs::JobContext;
use demo_assets::packer::{PackRequest, PixelFormat, TexturePacker};
use image::{GrayImage, Luma};

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
fn headers_land_where_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let tool = dir.path().join("fake-packer");
    fs::write(&tool, FAKE_PACKER).unwrap();
    fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
    fs::create_dir_all("textures").unwrap();
    fs::create_dir_all("headers").unwrap();

    let mut ctx = JobContext::offline("out");
    ctx.packer = TexturePacker { tool, enabled: true, ..Default::default() };

    // relative output in another directory than the input
    fs::write("textures/a.png", b"raster").unwrap();
    let request = PackRequest::new("textures/a.png", PixelFormat::Ogl8).output("headers/a.h");
    let written = pack::run(&ctx, &PackJob { request, append: None, boxes: None }).unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("headers/a.h"));
    assert!(Path::new("headers/a.h").is_file());
    assert!(!Path::new("textures/headers/a.h").exists());
    assert!(fs::read_to_string("headers/a.h").unwrap().starts_with("const unsigned int Data[]"));

    // every texture is followed by its own header
    GrayImage::from_fn(12, 8, |x, y| Luma([if (3..9).contains(&x) && (2..6).contains(&y) { 255 } else { 0 }]))
        .save("textures/Mask.png")
        .unwrap();
    let cfg = DistanceFieldConfig { spread: 2, scale: 1.0, pad_to_pot: false };
    let job = DistanceFieldJob { comparison: Some("Plain.png".into()), ..DistanceFieldJob::new("textures/Mask.png", &cfg) };
    let written = distance_field::run(&ctx, &job).unwrap();
    let expected: Vec<PathBuf> =
        ["DistanceField.png", "DistanceField.h", "Plain.png", "Plain.h"].iter().map(|n| Path::new("out").join(n)).collect();
    assert_eq!(written, expected);
    assert!(written.iter().all(|p| p.is_file()));
}

//! Demo asset CLI
//!
//! One subcommand per texture set. Every run loads the RON config (layered when
//! `--config` is repeated), writes into the output directory and invokes the
//! packer unless it is disabled.
//!
//! Example:
//!   cargo run -- --out-dir build/textures distance-field Aum.png \
//!       --comparison SmallAum.png --spread 25

use std::path::PathBuf;

use anyhow::Result;
use bevy::log::{info, warn};
use clap::{Args, Parser, Subcommand, ValueEnum};

use demo_assets::config::AssetsConfig;
use demo_assets::dome::BasePolyhedron;
use demo_assets::jobs::{
    billboards, buttons, circle, cubemap, distance_field, dome, glyphs, heightmap, labels, pack, triangle, JobContext,
};
use demo_assets::packer::{PackRequest, PixelFormat};
use demo_assets::{logging, sdf};

const DEFAULT_CONFIG: &str = "assets/config/demo_assets.ron";
const DEFAULT_FONT: &str = "assets/fonts/DroidSansMono.ttf";

#[derive(Parser, Debug)]
#[command(author, version, about = "Texture, glyph, distance-field and dome generators for the GL ES demos", long_about = None)]
struct Cli {
    /// RON config; repeat to layer files (later wins)
    #[arg(long, global = true)]
    config: Vec<PathBuf>,
    /// Overrides `output_dir` from the config
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    /// Write rasters only, never run the packer
    #[arg(long, global = true)]
    no_pack: bool,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Padded distance field of an image, no scaling or packing
    Sdf(SdfArgs),
    /// Distance-field texture (and comparison texture), scaled, padded to a power of two and packed
    DistanceField(DistanceFieldArgs),
    /// Centred text label sheets
    Labels(LabelsArgs),
    /// Glyph atlas or numeral strip with metrics appended to the header
    Glyphs(GlyphsArgs),
    /// Cube-map faces from a vertical cross
    Cubemap(CubemapArgs),
    /// Circle or ring sprite, optionally blurred
    Circle(CircleArgs),
    /// Dotted height map packed as tangent-space normals
    Heightmap(HeightmapArgs),
    /// Camera demo buttons
    Buttons(FontArgs),
    /// Cloud billboard triangle mask
    Triangle(TriangleArgs),
    /// Outlined word billboards
    Billboards(BillboardArgs),
    /// GeodesicDome.h vertex data
    Dome(DomeArgs),
    /// Pack an existing file, optionally appending text and sprite box tables
    Pack(PackArgs),
    /// Wrap a binary file into a header with Filewrap
    Wrap(WrapArgs),
    /// Statistics of an existing distance-field texture
    Inspect(InspectArgs),
    /// Print the effective configuration as RON
    Config,
}

#[derive(Args, Debug)]
struct SdfArgs {
    input: PathBuf,
    output: PathBuf,
    #[arg(long)] spread: Option<u32>,
}

#[derive(Args, Debug)]
struct DistanceFieldArgs {
    input: PathBuf,
    #[arg(long, default_value = "DistanceField.png")] output: String,
    /// File name for the padded, inverted alpha at the same canvas size
    #[arg(long)] comparison: Option<String>,
    #[arg(long)] spread: Option<u32>,
    #[arg(long)] scale: Option<f32>,
    #[arg(long)] no_pot: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Sheet {
    Text,
    SmallText,
}

#[derive(Args, Debug)]
struct LabelsArgs {
    #[arg(long, default_value = DEFAULT_FONT)] font: PathBuf,
    #[arg(long, value_enum, default_values_t = [Sheet::Text, Sheet::SmallText])] sheet: Vec<Sheet>,
}

#[derive(Args, Debug)]
struct GlyphsArgs {
    #[arg(long, default_value = DEFAULT_FONT)] font: PathBuf,
    #[arg(long, value_enum, default_value_t = glyphs::GlyphPreset::Atlas)] preset: glyphs::GlyphPreset,
    #[arg(long)] size: Option<f32>,
    /// Append horizontal kerning pairs from the font's kern table
    #[arg(long)] kerning: bool,
}

#[derive(Args, Debug)]
struct CubemapArgs {
    cross: PathBuf,
    #[arg(long, default_value_t = 256)] face_size: u32,
    /// Extra textures packed as 565 next to the faces
    #[arg(long)] extra: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct CircleArgs {
    #[arg(long, default_value = "Circle")] name: String,
    #[arg(long, default_value_t = 16)] size: u32,
    #[arg(long)] ring: bool,
    #[arg(long, default_value_t = 0)] blur_passes: u32,
    #[arg(long)] rgba: bool,
}

#[derive(Args, Debug)]
struct HeightmapArgs {
    #[arg(long, default_value_t = 512)] width: u32,
    #[arg(long, default_value_t = 1024)] height: u32,
    #[arg(long, default_value_t = 2)] blur_passes: u32,
    #[arg(long, default_value_t = 2.0)] bump_scale: f32,
    #[arg(long)] object_space: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FontArgs {
    #[arg(long, default_value = DEFAULT_FONT)] font: PathBuf,
}

#[derive(Args, Debug)]
struct TriangleArgs {
    #[arg(long, default_value_t = 128)] size: u32,
}

#[derive(Args, Debug)]
struct BillboardArgs {
    #[arg(long, default_value = DEFAULT_FONT)] font: PathBuf,
    /// Words to render; the four compass points when empty
    words: Vec<String>,
}

#[derive(Args, Debug)]
struct DomeArgs {
    #[arg(long)] level: Option<u32>,
    #[arg(long, value_enum)] base: Option<BasePolyhedron>,
    #[arg(long)] max_height: Option<f32>,
}

#[derive(Args, Debug)]
struct PackArgs {
    input: PathBuf,
    #[arg(long, value_enum, default_value_t = PixelFormat::Ogl565)] format: PixelFormat,
    #[arg(long)] output: Option<PathBuf>,
    /// Treat the input as a height map with this bump scale
    #[arg(long)] normal_map: Option<f32>,
    #[arg(long)] append: Option<PathBuf>,
    /// JSON list of sprite box tables to append
    #[arg(long)] boxes: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct WrapArgs {
    input: PathBuf,
    #[arg(long)] header: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    input: PathBuf,
}

fn load_config(cli: &Cli) -> AssetsConfig {
    let mut cfg = if cli.config.is_empty() {
        let (cfg, err) = AssetsConfig::load_or_default(DEFAULT_CONFIG);
        if let Some(e) = err {
            warn!("using default config: {e}");
        }
        cfg
    } else {
        let (cfg, used, errors) = AssetsConfig::load_layered(&cli.config);
        for e in errors {
            warn!("config: {e}");
        }
        info!("config layers: {}", used.join(", "));
        cfg
    };
    if let Some(dir) = &cli.out_dir {
        cfg.output_dir = dir.clone();
    }
    if cli.no_pack {
        cfg.packer.enabled = false;
    }
    for w in cfg.validate() {
        warn!("config: {w}");
    }
    cfg
}

fn cmd_sdf(cfg: &AssetsConfig, a: SdfArgs) -> Result<Vec<PathBuf>> {
    let spread = a.spread.unwrap_or(cfg.distance_field.spread);
    sdf::generate_distance_field(&a.input, &a.output, spread)?;
    Ok(vec![a.output])
}

fn cmd_distance_field(ctx: &JobContext, cfg: &AssetsConfig, a: DistanceFieldArgs) -> Result<Vec<PathBuf>> {
    let mut job = distance_field::DistanceFieldJob::new(a.input, &cfg.distance_field);
    job.output = a.output;
    job.comparison = a.comparison;
    job.spread = a.spread.unwrap_or(job.spread);
    job.scale = a.scale.unwrap_or(job.scale);
    job.pad_to_pot &= !a.no_pot;
    distance_field::run(ctx, &job)
}

fn cmd_labels(ctx: &JobContext, a: LabelsArgs) -> Result<Vec<PathBuf>> {
    let sheets: Vec<_> = a
        .sheet
        .iter()
        .map(|s| match s {
            Sheet::Text => labels::LabelSheet::text(),
            Sheet::SmallText => labels::LabelSheet::small_text(),
        })
        .collect();
    labels::run(ctx, &a.font, &sheets)
}

fn cmd_dome(ctx: &JobContext, cfg: &AssetsConfig, a: DomeArgs) -> Result<Vec<PathBuf>> {
    let mut dome_cfg = cfg.dome.clone();
    dome_cfg.level_of_detail = a.level.unwrap_or(dome_cfg.level_of_detail);
    dome_cfg.base = a.base.unwrap_or(dome_cfg.base);
    dome_cfg.max_height = a.max_height.unwrap_or(dome_cfg.max_height);
    dome::run(ctx, &dome_cfg)
}

fn cmd_pack(ctx: &JobContext, a: PackArgs) -> Result<Vec<PathBuf>> {
    let request = PackRequest { input: a.input, format: a.format, output: a.output, normal_map: a.normal_map };
    pack::run(ctx, &pack::PackJob { request, append: a.append, boxes: a.boxes })
}

fn cmd_inspect(a: &InspectArgs) -> Result<Vec<PathBuf>> {
    let s = sdf::inspect::summarize_file(&a.input)?;
    println!(
        "{}: {}x{} mean={:.1} inside={:.1}% boundary={:.1}% outside={:.1}%",
        a.input.display(),
        s.width,
        s.height,
        s.mean,
        s.inside_pct,
        s.boundary_pct,
        s.outside_pct
    );
    Ok(Vec::new())
}

fn cmd_config(cfg: &AssetsConfig) -> Result<Vec<PathBuf>> {
    println!("{}", ron::ser::to_string_pretty(cfg, ron::ser::PrettyConfig::default())?);
    Ok(Vec::new())
}

fn billboard_words(words: Vec<String>) -> Vec<String> {
    if words.is_empty() {
        billboards::COMPASS_WORDS.iter().map(|w| w.to_string()).collect()
    } else {
        words
    }
}

fn report(paths: &[PathBuf]) {
    for p in paths {
        println!("{}", p.display());
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let cfg = load_config(&cli);
    let ctx = JobContext::from_config(&cfg);
    let written = match cli.command {
        Commands::Sdf(a) => cmd_sdf(&cfg, a),
        Commands::DistanceField(a) => cmd_distance_field(&ctx, &cfg, a),
        Commands::Labels(a) => cmd_labels(&ctx, a),
        Commands::Glyphs(a) => glyphs::run(&ctx, &a.font, a.preset, a.size, a.kerning),
        Commands::Cubemap(a) => cubemap::run(
            &ctx,
            &cubemap::CubemapJob { cross: a.cross, face_size: a.face_size, extras: a.extra },
        ),
        Commands::Circle(a) => circle::run(
            &ctx,
            &circle::CircleJob { name: a.name, size: a.size, ring: a.ring, blur_passes: a.blur_passes, rgba: a.rgba, pack: true },
        ),
        Commands::Heightmap(a) => heightmap::run(
            &ctx,
            &heightmap::HeightmapJob {
                width: a.width,
                height: a.height,
                blur_passes: a.blur_passes,
                bump_scale: a.bump_scale,
                object_space: a.object_space,
                ..Default::default()
            },
        ),
        Commands::Buttons(a) => buttons::run(
            &ctx,
            &a.font,
            &[buttons::ButtonSpec::take_picture(), buttons::ButtonSpec::please_wait()],
        ),
        Commands::Triangle(a) => triangle::run(&ctx, a.size),
        Commands::Billboards(a) => {
            billboards::run(&ctx, &a.font, &billboards::BillboardStyle::default(), &billboard_words(a.words))
        }
        Commands::Dome(a) => cmd_dome(&ctx, &cfg, a),
        Commands::Pack(a) => cmd_pack(&ctx, a),
        Commands::Wrap(a) => pack::wrap(&ctx, &a.input, a.header.as_deref()),
        Commands::Inspect(a) => cmd_inspect(&a),
        Commands::Config => cmd_config(&cfg),
    }?;
    report(&written);
    Ok(())
}

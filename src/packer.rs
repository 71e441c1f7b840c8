//! External texture packer invocation (PVRTexTool and Filewrap).
//!
//! Both tools are run synchronously with the raster's directory as the working
//! directory, so the header lands next to the input and its path is known
//! before the tool runs.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use bevy::log::{info, warn};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// OpenGL pixel layouts understood by the packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum PixelFormat {
    Ogl8,
    Ogl88,
    Ogl565,
    Ogl888,
    Ogl8888,
}

impl PixelFormat {
    pub fn flag(self) -> &'static str {
        match self {
            PixelFormat::Ogl8 => "OGL8",
            PixelFormat::Ogl88 => "OGL88",
            PixelFormat::Ogl565 => "OGL565",
            PixelFormat::Ogl888 => "OGL888",
            PixelFormat::Ogl8888 => "OGL8888",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackRequest {
    pub input: PathBuf,
    pub format: PixelFormat,
    /// Explicit header path; defaults to the input with a `.h` extension.
    pub output: Option<PathBuf>,
    /// Treat the input as a height map and emit normals with this bump scale.
    pub normal_map: Option<f32>,
}

impl PackRequest {
    pub fn new(input: impl Into<PathBuf>, format: PixelFormat) -> Self {
        Self { input: input.into(), format, output: None, normal_map: None }
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn normal_map(mut self, scale: f32) -> Self {
        self.normal_map = Some(scale);
        self
    }

    /// Where the header ends up. A relative output outside the input's directory
    /// is anchored to the current directory.
    pub fn header_path(&self) -> PathBuf {
        match &self.output {
            Some(out) if !self.output_beside_input(out) && out.is_relative() => {
                std::path::absolute(out).unwrap_or_else(|_| out.clone())
            }
            Some(out) => out.clone(),
            None => self.input.with_extension("h"),
        }
    }

    fn output_beside_input(&self, out: &Path) -> bool {
        working_dir(out) == working_dir(&self.input)
    }

    /// Packer arguments; paths are given relative to the input's directory.
    pub fn args(&self, flip_y: bool) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-h".into()];
        if flip_y {
            args.push("-yflip1".into());
        }
        if let Some(scale) = self.normal_map {
            args.push("-b".into());
            args.push(format!("-c{scale:.1}").into());
        }
        args.push(format!("-f{}", self.format.flag()).into());
        args.push(prefixed("-i", file_name(&self.input)));
        if let Some(out) = &self.output {
            if self.output_beside_input(out) {
                args.push(prefixed("-o", file_name(out)));
            } else {
                args.push(prefixed("-o", self.header_path().as_os_str()));
            }
        }
        args
    }
}

fn file_name(p: &Path) -> &std::ffi::OsStr {
    p.file_name().unwrap_or(p.as_os_str())
}

fn prefixed(flag: &str, value: &std::ffi::OsStr) -> OsString {
    let mut s = OsString::from(flag);
    s.push(value);
    s
}

fn working_dir(p: &Path) -> &Path {
    match p.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    }
}

fn command_line(cmd: &Command) -> String {
    let mut s = cmd.get_program().to_string_lossy().into_owned();
    for a in cmd.get_args() {
        s.push(' ');
        s.push_str(&a.to_string_lossy());
    }
    s
}

fn run(mut cmd: Command) -> Result<()> {
    let line = command_line(&cmd);
    info!("running {line}");
    let status = cmd.status().with_context(|| format!("spawn `{line}`"))?;
    if !status.success() {
        bail!("`{line}` failed with {status}");
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct TexturePacker {
    pub tool: PathBuf,
    pub filewrap: PathBuf,
    pub flip_y: bool,
    pub enabled: bool,
}

impl Default for TexturePacker {
    fn default() -> Self {
        Self { tool: "PVRTexTool".into(), filewrap: "Filewrap".into(), flip_y: true, enabled: true }
    }
}

impl TexturePacker {
    pub fn command(&self, req: &PackRequest) -> Command {
        let mut cmd = Command::new(&self.tool);
        cmd.args(req.args(self.flip_y)).current_dir(working_dir(&req.input));
        cmd
    }

    /// Converts `req.input` into a header. `Ok(None)` when packing is disabled.
    pub fn pack(&self, req: &PackRequest) -> Result<Option<PathBuf>> {
        if !req.input.is_file() {
            bail!("packer input {} does not exist", req.input.display());
        }
        if !self.enabled {
            warn!("packer disabled, skipping {}", req.input.display());
            return Ok(None);
        }
        run(self.command(req))?;
        Ok(Some(req.header_path()))
    }

    /// Filewrap `-h -o <header> <input>` for data the packer can't read.
    pub fn wrap(&self, input: &Path, header: &Path) -> Result<Option<PathBuf>> {
        if !input.is_file() {
            bail!("filewrap input {} does not exist", input.display());
        }
        if !self.enabled {
            warn!("packer disabled, skipping {}", input.display());
            return Ok(None);
        }
        let mut cmd = Command::new(&self.filewrap);
        cmd.arg("-h").arg("-o").arg(header).arg(input);
        run(cmd)?;
        Ok(Some(header.to_path_buf()))
    }
}

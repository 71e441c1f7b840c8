//! Offline asset generators for the OpenGL ES demos: procedural textures,
//! glyph atlases, signed distance fields and geodesic dome meshes, handed to an
//! external texture packer that turns them into C headers.

pub mod config;
pub mod dome;
pub mod glyphs;
pub mod header;
pub mod jobs;
pub mod logging;
pub mod packer;
pub mod raster;
pub mod sdf;

// Curated re-exports
pub use config::AssetsConfig;
pub use dome::{geodesic_dome, BasePolyhedron, DomeMesh};
pub use jobs::JobContext;
pub use sdf::{encode_distance_field, generate_distance_field, signed_distance_field};

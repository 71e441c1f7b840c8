//! Geodesic dome: a subdivided unit polyhedron cut down to its lower cap.

use std::collections::HashMap;

use bevy::math::{Vec2, Vec3};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Faces whose corners all sit below this height survive the dome cut.
pub const DEFAULT_MAX_HEIGHT: f32 = 0.125;

/// Per-corner texture coordinates shared by every face.
pub fn corner_uvs() -> [Vec2; 3] {
    [Vec2::new(0.0, 1.0), Vec2::new(0.5, 1.0 - 3f32.sqrt() / 2.0), Vec2::new(1.0, 1.0)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum BasePolyhedron {
    #[default]
    Icosahedron,
    Octahedron,
}

impl BasePolyhedron {
    pub fn face_count(self) -> usize {
        match self {
            BasePolyhedron::Icosahedron => 20,
            BasePolyhedron::Octahedron => 8,
        }
    }

    pub fn mesh(self) -> DomeMesh {
        match self {
            BasePolyhedron::Icosahedron => icosahedron(),
            BasePolyhedron::Octahedron => octahedron(),
        }
    }
}

fn icosahedron() -> DomeMesh {
    let sqrt5 = 5f32.sqrt();
    let phi = (1.0 + sqrt5) * 0.5;
    let ratio = (10.0 + 2.0 * sqrt5).sqrt() / (4.0 * phi);
    let a = (1.0 / ratio) * 0.5;
    let b = (1.0 / ratio) / (2.0 * phi);
    let vertices = vec![
        Vec3::new(0.0, b, -a),
        Vec3::new(b, a, 0.0),
        Vec3::new(-b, a, 0.0),
        Vec3::new(0.0, b, a),
        Vec3::new(0.0, -b, a),
        Vec3::new(-a, 0.0, b),
        Vec3::new(0.0, -b, -a),
        Vec3::new(a, 0.0, -b),
        Vec3::new(a, 0.0, b),
        Vec3::new(-a, 0.0, -b),
        Vec3::new(b, -a, 0.0),
        Vec3::new(-b, -a, 0.0),
    ];
    let faces = vec![
        [0, 1, 2], [3, 2, 1], [3, 4, 5], [3, 8, 4], [0, 6, 7],
        [0, 9, 6], [4, 10, 11], [6, 11, 10], [2, 5, 9], [11, 9, 5],
        [1, 7, 8], [10, 8, 7], [3, 5, 2], [3, 1, 8], [0, 2, 9],
        [0, 7, 1], [6, 9, 11], [6, 10, 7], [4, 11, 5], [4, 8, 10],
    ];
    DomeMesh::new(vertices, faces)
}

fn octahedron() -> DomeMesh {
    let f = 2f32.sqrt() / 2.0;
    let vertices = vec![
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::new(-f, 0.0, f),
        Vec3::new(f, 0.0, f),
        Vec3::new(f, 0.0, -f),
        Vec3::new(-f, 0.0, -f),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let faces = vec![
        [0, 2, 1], [0, 3, 2], [0, 4, 3], [0, 1, 4],
        [5, 1, 2], [5, 2, 3], [5, 3, 4], [5, 4, 1],
    ];
    DomeMesh::new(vertices, faces)
}

/// One corner of the flattened vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomeVertex {
    pub position: Vec3,
    pub uv: Vec2,
}

#[derive(Debug, Clone, Default)]
pub struct DomeMesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
    midpoints: HashMap<(u32, u32), u32>,
}

impl DomeMesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces, midpoints: HashMap::new() }
    }

    /// Base polyhedron refined `level` times. Nothing is cut yet.
    pub fn build(base: BasePolyhedron, level: u32) -> Self {
        let mut mesh = base.mesh();
        for _ in 0..level {
            mesh.subdivide();
        }
        mesh
    }

    fn midpoint(&mut self, a: u32, b: u32) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&i) = self.midpoints.get(&key) {
            return i;
        }
        let m = (self.vertices[a as usize] + self.vertices[b as usize]).normalize();
        let i = self.vertices.len() as u32;
        self.vertices.push(m);
        self.midpoints.insert(key, i);
        i
    }

    /// Splits every face into four; the corner face at `c` reuses the parent's slot.
    pub fn subdivide(&mut self) {
        let count = self.faces.len();
        self.faces.reserve(count * 3);
        for fi in 0..count {
            let [a, b, c] = self.faces[fi];
            let i = self.midpoint(a, b);
            let j = self.midpoint(b, c);
            let k = self.midpoint(a, c);
            self.faces.push([i, j, k]);
            self.faces.push([a, i, k]);
            self.faces.push([i, b, j]);
            self.faces[fi] = [k, j, c];
        }
    }

    pub fn retain_below(&mut self, max_height: f32) {
        let vertices = &self.vertices;
        self.faces.retain(|f| f.iter().all(|&i| vertices[i as usize].y < max_height));
    }

    /// Three vertices per face, each with its fixed corner UV.
    pub fn flat_vertices(&self) -> Vec<DomeVertex> {
        let uvs = corner_uvs();
        self.faces
            .iter()
            .flat_map(|f| (0..3).map(move |c| (f[c], uvs[c])))
            .map(|(i, uv)| DomeVertex { position: self.vertices[i as usize], uv })
            .collect()
    }
}

/// Subdivides `base`, then keeps only the faces under `max_height`.
pub fn geodesic_dome(base: BasePolyhedron, level: u32, max_height: f32) -> DomeMesh {
    let mut mesh = DomeMesh::build(base, level);
    mesh.retain_below(max_height);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_vertices_are_unit_length() {
        for base in [BasePolyhedron::Icosahedron, BasePolyhedron::Octahedron] {
            for v in base.mesh().vertices {
                assert!((v.length() - 1.0).abs() < 1e-5, "{base:?} vertex {v} not on sphere");
            }
        }
    }

    #[test]
    fn midpoints_are_shared_between_neighbours() {
        let mesh = DomeMesh::build(BasePolyhedron::Icosahedron, 1);
        // 12 corners + one vertex per edge (30 edges)
        assert_eq!(mesh.vertices.len(), 42);
        assert_eq!(mesh.faces.len(), 80);
    }

    #[test]
    fn cut_keeps_only_low_faces() {
        let mesh = geodesic_dome(BasePolyhedron::Icosahedron, 2, DEFAULT_MAX_HEIGHT);
        assert!(!mesh.faces.is_empty());
        for f in &mesh.faces {
            for &i in f {
                assert!(mesh.vertices[i as usize].y < DEFAULT_MAX_HEIGHT);
            }
        }
    }

    #[test]
    fn flat_vertices_carry_corner_uvs() {
        let mesh = geodesic_dome(BasePolyhedron::Octahedron, 0, DEFAULT_MAX_HEIGHT);
        // the four faces around the south pole
        assert_eq!(mesh.faces.len(), 4);
        let flat = mesh.flat_vertices();
        assert_eq!(flat.len(), 12);
        let uvs = corner_uvs();
        for (n, v) in flat.iter().enumerate() {
            assert_eq!(v.uv, uvs[n % 3]);
        }
    }
}

// src/mesh/mesh.rs

use crate::types::{Bounds3D, Point3D};

/// Dreiecksnetz der extrahierten Isofläche. Wird einmal pro
/// Generierungslauf erzeugt und danach nicht mehr verändert.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Point3D>,
    pub indices: Vec<u32>,
    pub normals: Option<Vec<Point3D>>,
}

impl Mesh {
    pub fn new(positions: Vec<Point3D>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iteriert über die Dreiecke als Index-Tripel.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    pub fn bounds(&self) -> Bounds3D {
        Bounds3D::from_points_iter(self.positions.iter().copied())
            .unwrap_or_else(Bounds3D::empty)
    }
}

// src/mesh/voxel.rs

use crate::field::ScalarField;
use crate::types::{Point3D, Vec3};

/// Dreidimensionales Raster für Skalarwerte.
/// Speicherung zeilenweise (row-major: x, dann y, dann z).
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    data: Vec<f32>,
    /// Zellen pro Achse.
    pub resolution: usize,
    /// Minimum der gepolsterten Feld-Bounds.
    pub origin: Point3D,
    /// Zellgröße pro Achse in Weltkoordinaten.
    pub cell: Vec3,
}

impl VoxelGrid {
    /// Sampelt das Feld auf einem R³-Raster über den um drei Voxelbreiten
    /// gepolsterten Feld-Bounds. Deterministisch; `None` bei leerem Feld.
    pub fn sample(field: &ScalarField, resolution: usize) -> Option<Self> {
        if resolution < 2 {
            return None;
        }
        let bounds = field.bounds();
        if bounds.is_empty() {
            return None;
        }

        let voxel_size = bounds.max_extent() / (resolution as f32 - 1.0);
        let padded = bounds.expand(3.0 * voxel_size);
        let cell = padded.size() / resolution as f32;

        let mut grid = Self {
            data: vec![0.0; resolution * resolution * resolution],
            resolution,
            origin: padded.min,
            cell,
        };

        for z in 0..resolution {
            for y in 0..resolution {
                for x in 0..resolution {
                    let value = field.value(grid.cell_center(x, y, z));
                    let index = grid.idx(x, y, z);
                    grid.data[index] = value;
                }
            }
        }
        Some(grid)
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.resolution + z * self.resolution * self.resolution
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> f32 {
        if x < self.resolution && y < self.resolution && z < self.resolution {
            self.data[self.idx(x, y, z)]
        } else {
            0.0
        }
    }

    /// Weltkoordinate des Zellzentrums (x, y, z).
    pub fn cell_center(&self, x: usize, y: usize, z: usize) -> Point3D {
        self.origin + self.cell * (Vec3::new(x as f32, y as f32, z as f32) + Vec3::splat(0.5))
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Falloff;

    #[test]
    fn test_empty_field_yields_no_grid() {
        let field = ScalarField::new();
        assert!(VoxelGrid::sample(&field, 16).is_none());
    }

    #[test]
    fn test_grid_covers_field_bounds_with_padding() {
        let mut field = ScalarField::new();
        field.add_ball(1.0, Vec3::ZERO, Falloff::POLYNOMIAL2);
        let grid = VoxelGrid::sample(&field, 16).unwrap();

        let bounds = field.bounds();
        // Ursprung liegt unter den Feld-Bounds (drei Voxel Polster)
        assert!(grid.origin.x < bounds.min.x);
        assert!(grid.origin.y < bounds.min.y);
        assert!(grid.origin.z < bounds.min.z);

        // Zentrum des Rasters trägt den höchsten Wert
        let mid = grid.resolution / 2;
        assert!(grid.get(mid, mid, mid) > grid.get(0, 0, 0));
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let mut field = ScalarField::new();
        field.add_ball(0.5, Vec3::ONE, Falloff::PERLIN_THICK);
        let a = VoxelGrid::sample(&field, 8).unwrap();
        let b = VoxelGrid::sample(&field, 8).unwrap();
        assert_eq!(a.data(), b.data());
    }
}

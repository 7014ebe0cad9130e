// src/mesh/extract.rs

use crate::mesh::voxel::VoxelGrid;
use crate::types::Point3D;
use crate::utils::constants;
use std::collections::HashMap;

/// Externer Vertrag der Isoflächen-Extraktion: deterministisch und
/// seiteneffektfrei. Die mitgelieferte Implementierung ist Marching
/// Tetrahedra; ein schnellerer Extraktor kann dahinter getauscht werden.
pub trait IsosurfaceExtractor {
    fn extract(&self, grid: &VoxelGrid, threshold: f32) -> (Vec<Point3D>, Vec<u32>);
}

/// Marching Tetrahedra: jede Rasterzelle wird in sechs Tetraeder zerlegt,
/// pro Tetraeder entstehen höchstens zwei Dreiecke. Vertices werden über
/// eine Positions-Hashmap verschweißt, damit Dreiecke echte Nachbarn
/// teilen (wichtig für den Laplace-Operator der Rig-Solver).
#[derive(Debug, Clone, Default)]
pub struct MarchingTetrahedra;

/// Eckenreihenfolge des Würfels: erst die z-Ebene, gegen den Uhrzeigersinn.
const CUBE_CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// Zerlegung des Würfels in sechs Tetraeder um die Diagonale 0-6.
const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 5, 1, 6],
    [0, 1, 2, 6],
    [0, 2, 3, 6],
    [0, 3, 7, 6],
    [0, 7, 4, 6],
    [0, 4, 5, 6],
];

/// Schnittkanten pro Konfiguration (Bit gesetzt = Ecke unter der
/// Schwelle), nur für die Fälle 0x01..0x07; die Komplementfälle nutzen
/// dieselben Kanten mit umgekehrter Umlaufrichtung.
const TETRA_EDGE_TABLE: [&[[(usize, usize); 3]]; 8] = [
    &[],                                               // 0x00: Tetraeder ganz drinnen
    &[[(0, 1), (0, 2), (0, 3)]],                       // 0x01
    &[[(1, 0), (1, 3), (1, 2)]],                       // 0x02
    &[[(0, 3), (0, 2), (1, 3)], [(1, 3), (0, 2), (1, 2)]], // 0x03
    &[[(2, 0), (2, 1), (2, 3)]],                       // 0x04
    &[[(0, 1), (2, 3), (0, 3)], [(0, 1), (1, 2), (2, 3)]], // 0x05
    &[[(0, 1), (1, 3), (2, 3)], [(0, 1), (2, 3), (0, 2)]], // 0x06
    &[[(3, 0), (3, 2), (3, 1)]],                       // 0x07
];

impl IsosurfaceExtractor for MarchingTetrahedra {
    fn extract(&self, grid: &VoxelGrid, threshold: f32) -> (Vec<Point3D>, Vec<u32>) {
        let mut builder = IndexedMeshBuilder::default();
        let r = grid.resolution;
        if r < 2 {
            return builder.finish();
        }

        let mut corners = [(Point3D::ZERO, 0.0f32); 8];
        for z in 0..r - 1 {
            for y in 0..r - 1 {
                for x in 0..r - 1 {
                    for (i, (dx, dy, dz)) in CUBE_CORNERS.iter().enumerate() {
                        let (cx, cy, cz) = (x + dx, y + dy, z + dz);
                        corners[i] = (grid.cell_center(cx, cy, cz), grid.get(cx, cy, cz));
                    }
                    for tetra in &TETRAHEDRA {
                        polygonise_tetrahedron(
                            [
                                corners[tetra[0]],
                                corners[tetra[1]],
                                corners[tetra[2]],
                                corners[tetra[3]],
                            ],
                            threshold,
                            &mut builder,
                        );
                    }
                }
            }
        }
        builder.finish()
    }
}

fn polygonise_tetrahedron(
    corners: [(Point3D, f32); 4],
    threshold: f32,
    builder: &mut IndexedMeshBuilder,
) {
    let mut config = 0usize;
    for (bit, (_, value)) in corners.iter().enumerate() {
        if *value < threshold {
            config |= 1 << bit;
        }
    }
    if config == 0x00 || config == 0x0F {
        return;
    }

    let (triangles, flipped) = if config <= 0x07 {
        (TETRA_EDGE_TABLE[config], false)
    } else {
        (TETRA_EDGE_TABLE[0x0F - config], true)
    };

    for triangle in triangles {
        let mut points = [Point3D::ZERO; 3];
        for (slot, (a, b)) in triangle.iter().enumerate() {
            points[slot] = interpolate_edge(corners[*a], corners[*b], threshold);
        }
        if flipped {
            points.swap(1, 2);
        }
        builder.add_triangle(points[0], points[1], points[2]);
    }
}

/// Linear interpolierter Schnittpunkt der Isofläche auf der Kante a-b.
fn interpolate_edge(a: (Point3D, f32), b: (Point3D, f32), threshold: f32) -> Point3D {
    let (pa, va) = a;
    let (pb, vb) = b;
    if (va - vb).abs() < constants::EPSILON {
        return (pa + pb) * 0.5; // Midpoint
    }
    let t = ((threshold - va) / (vb - va)).clamp(0.0, 1.0);
    pa.lerp(pb, t)
}

/// Verschweißt identische Positionen über einen quantisierten Schlüssel.
#[derive(Default)]
struct IndexedMeshBuilder {
    positions: Vec<Point3D>,
    indices: Vec<u32>,
    lookup: HashMap<(i64, i64, i64), u32>,
}

impl IndexedMeshBuilder {
    const QUANTIZATION: f32 = 1e4;

    fn vertex_index(&mut self, p: Point3D) -> u32 {
        let key = (
            (p.x * Self::QUANTIZATION).round() as i64,
            (p.y * Self::QUANTIZATION).round() as i64,
            (p.z * Self::QUANTIZATION).round() as i64,
        );
        *self.lookup.entry(key).or_insert_with(|| {
            self.positions.push(p);
            (self.positions.len() - 1) as u32
        })
    }

    fn add_triangle(&mut self, a: Point3D, b: Point3D, c: Point3D) {
        let ia = self.vertex_index(a);
        let ib = self.vertex_index(b);
        let ic = self.vertex_index(c);
        // degenerierte Dreiecke aus verschweißten Ecken überspringen
        if ia == ib || ib == ic || ia == ic {
            return;
        }
        self.indices.extend_from_slice(&[ia, ib, ic]);
    }

    fn finish(self) -> (Vec<Point3D>, Vec<u32>) {
        (self.positions, self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Falloff, ScalarField};
    use crate::types::Vec3;
    use crate::utils::constants::SURFACE_THRESHOLD;

    fn ball_grid(resolution: usize) -> VoxelGrid {
        let mut field = ScalarField::new();
        field.add_ball(1.0, Vec3::ZERO, Falloff::POLYNOMIAL2);
        VoxelGrid::sample(&field, resolution).unwrap()
    }

    #[test]
    fn test_extracts_closed_surface_around_ball() {
        let grid = ball_grid(16);
        let extractor = MarchingTetrahedra;
        let (positions, indices) = extractor.extract(&grid, SURFACE_THRESHOLD);

        assert!(!positions.is_empty());
        assert_eq!(indices.len() % 3, 0);
        // alle Indizes gültig
        assert!(indices.iter().all(|&i| (i as usize) < positions.len()));
        // Vertices liegen nahe der Kugeloberfläche (Radius 1)
        for p in &positions {
            let r = p.length();
            assert!(r > 0.5 && r < 1.5, "vertex at radius {}", r);
        }
    }

    #[test]
    fn test_welding_shares_vertices() {
        let grid = ball_grid(12);
        let (positions, indices) = MarchingTetrahedra.extract(&grid, SURFACE_THRESHOLD);
        // ohne Verschweißen gäbe es einen Vertex pro Index
        assert!(positions.len() < indices.len());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let grid = ball_grid(10);
        let a = MarchingTetrahedra.extract(&grid, SURFACE_THRESHOLD);
        let b = MarchingTetrahedra.extract(&grid, SURFACE_THRESHOLD);
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
    }
}

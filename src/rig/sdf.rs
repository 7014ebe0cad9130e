// src/rig/sdf.rs

use crate::error::{MorphError, MorphResult};
use crate::mesh::Mesh;
use crate::types::Vec3;
use crate::utils::constants;
use bevy::log::debug;

/// Vorzeichenbehaftetes Distanzfeld eines Dreiecksnetzes auf einem
/// kubischen Gitter. Konvention wie beim Ray-March-Abbruch: positiv
/// außerhalb des Körpers, negativ innerhalb.
///
/// Der Aufbau ist O(Auflösung³ × Dreiecke) und für die üblichen
/// Auflösungen (32–128) als Vorberechnung gedacht, nicht pro Abfrage.
pub struct SignedDistanceField {
    resolution: usize,
    min_extent: Vec3,
    size: f32,
    data: Vec<f32>,
}

impl SignedDistanceField {
    /// Baut das Feld über einem Würfel um das Mesh: längste Seite der
    /// Mesh-Bounds plus 5 % Polster auf jeder Seite.
    pub fn from_mesh(mesh: &Mesh, resolution: usize) -> MorphResult<Self> {
        if mesh.is_empty() {
            return Err(MorphError::EmptyMesh);
        }
        if resolution < 2 {
            return Err(MorphError::InvalidConfiguration {
                message: format!("sdf resolution must be at least 2, got {resolution}"),
            });
        }

        let bounds = mesh.bounds();
        let largest_side = bounds.size().max_element();
        let padding = largest_side / 20.0;
        let half = largest_side * 0.5 + padding;
        let min_extent = bounds.center() - Vec3::splat(half);
        let size = half * 2.0;

        let triangles: Vec<[Vec3; 3]> = mesh
            .triangles()
            .map(|[a, b, c]| {
                [
                    mesh.positions[a as usize],
                    mesh.positions[b as usize],
                    mesh.positions[c as usize],
                ]
            })
            .collect();

        let cell = size / resolution as f32;
        let mut data = vec![0.0; resolution * resolution * resolution];
        for z in 0..resolution {
            for y in 0..resolution {
                for x in 0..resolution {
                    let pos = min_extent
                        + Vec3::new(
                            (x as f32 + 0.5) * cell,
                            (y as f32 + 0.5) * cell,
                            (z as f32 + 0.5) * cell,
                        );
                    let distance = triangles
                        .iter()
                        .map(|tri| point_triangle_distance(pos, tri))
                        .fold(f32::INFINITY, f32::min);
                    let signed = if is_inside(pos, &triangles) {
                        -distance
                    } else {
                        distance
                    };
                    data[x + y * resolution + z * resolution * resolution] = signed;
                }
            }
        }

        debug!(
            "sdf built: resolution {resolution}, {} triangles",
            triangles.len()
        );
        Ok(Self {
            resolution,
            min_extent,
            size,
            data,
        })
    }

    /// Nächstliegender Gitterwert. Punkte außerhalb des Würfels werden
    /// auf die Randzelle geklemmt und erscheinen damit als "außen".
    pub fn sample(&self, v: Vec3) -> f32 {
        let scale = self.resolution as f32 / self.size;
        let coord = (v - self.min_extent) * scale;
        let clamp = |c: f32| (c as isize).clamp(0, self.resolution as isize - 1) as usize;
        let (x, y, z) = (clamp(coord.x), clamp(coord.y), clamp(coord.z));
        self.data[x + y * self.resolution + z * self.resolution * self.resolution]
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }
}

/// Innen/Außen über Paritätstest: ein Strahl schneidet die Oberfläche
/// eines geschlossenen Netzes von innen ungerade oft. Die Richtung ist
/// bewusst schief zu allen Achsen, damit der Strahl bei achsparallelen
/// Netzen keine gemeinsame Dreieckskante exakt trifft (die würde
/// doppelt zählen).
fn is_inside(point: Vec3, triangles: &[[Vec3; 3]]) -> bool {
    let dir = Vec3::new(0.824_532, 0.412_678, 0.387_941).normalize();
    let mut crossings = 0;
    for tri in triangles {
        if ray_hits_triangle(point, dir, tri) {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}

/// Möller–Trumbore, nur Treffer mit t > 0 zählen.
fn ray_hits_triangle(origin: Vec3, dir: Vec3, tri: &[Vec3; 3]) -> bool {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    let p = dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < constants::EPSILON {
        return false;
    }
    let inv_det = 1.0 / det;
    let s = origin - tri[0];
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return false;
    }
    let q = s.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return false;
    }
    edge2.dot(q) * inv_det > constants::EPSILON
}

/// Kleinster Abstand Punkt–Dreieck (Regionentest nach Voronoi-Zonen).
fn point_triangle_distance(p: Vec3, tri: &[Vec3; 3]) -> f32 {
    let [a, b, c] = *tri;
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return ap.length();
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return bp.length();
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let t = d1 / (d1 - d3);
        return (ap - ab * t).length();
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return cp.length();
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let t = d2 / (d2 - d6);
        return (ap - ac * t).length();
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let t = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (p - (b + (c - b) * t)).length();
    }

    // Projektion liegt im Dreiecksinneren
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    (p - (a + ab * v + ac * w)).length()
}

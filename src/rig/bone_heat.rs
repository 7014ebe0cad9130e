// src/rig/bone_heat.rs
//
// Bone-Heat-Gewichtung: jeder Knochen heizt die ihm nächsten sichtbaren
// Vertices, und die Wärme diffundiert über den Kotangens-Laplace-Operator
// des Netzes. Pro Knochen wird ein SPD-System gelöst; die Lösung ist das
// (noch unnormierte) Gewicht des Knochens an jedem Vertex.

use crate::config::RigConfig;
use crate::error::{MorphError, MorphResult};
use crate::mesh::Mesh;
use crate::observe::{RigObserver, RigStage};
use crate::rig::sparse::{SparseSolver, SparseSystem};
use crate::rig::visibility::VisibilityTester;
use crate::rig::weights::VertexWeights;
use crate::skeleton::Bone;
use crate::types::Vec3;
use crate::utils::constants;
use std::collections::HashMap;
use std::time::Instant;

pub fn calc_bone_weights(
    mesh: &Mesh,
    tester: &dyn VisibilityTester,
    bones: &[Bone],
    config: &RigConfig,
    solver: &dyn SparseSolver,
    observer: &mut dyn RigObserver,
) -> MorphResult<Vec<VertexWeights>> {
    let nv = mesh.vertex_count();

    // Kantengewichte: pro Kante die Summe der Kotangenten der beiden
    // gegenüberliegenden Dreieckswinkel, auf >= 0 geklemmt.
    let started = Instant::now();
    let edge_weights = cotangent_edge_weights(mesh);
    observer.on_stage(RigStage::Adjacency, started.elapsed());

    // Distanz- und Sichtbarkeitsdurchlauf Vertex × Knochen: pro Vertex
    // die Minimaldistanz und die Menge der sichtbaren nächsten Knochen.
    let started = Instant::now();
    let mut min_dist = vec![f32::INFINITY; nv];
    let mut visible_closest: Vec<Vec<usize>> = vec![Vec::new(); nv];
    for (v, &vertex) in mesh.positions.iter().enumerate() {
        let distances: Vec<f32> = bones
            .iter()
            .map(|bone| bone.segment().distance_to_point(vertex))
            .collect();
        min_dist[v] = distances.iter().copied().fold(f32::INFINITY, f32::min);

        // knapp gleich nahe Knochen zählen mit, damit an Gelenken beide
        // Seiten Wärme einspeisen
        for (j, &dist) in distances.iter().enumerate() {
            if dist > min_dist[v] * config.distance_epsilon {
                continue;
            }
            let foot = bones[j].segment().closest_point(vertex);
            if tester.can_see(vertex, foot) {
                visible_closest[v].push(j);
            }
        }
    }
    observer.on_stage(RigStage::BoneVisibility, started.elapsed());

    // Wärmeterm und Systemmatrix. H[v] koppelt die rein geometrische
    // Diffusion an die Knochennähe; ohne ihn wäre die Matrix singulär.
    let started = Instant::now();
    let heat: Vec<f32> = (0..nv)
        .map(|v| {
            let per_bone =
                config.heat_weight / (min_dist[v] * min_dist[v] + constants::EPSILON_SQUARED);
            visible_closest[v].len() as f32 * per_bone
        })
        .collect();

    let mut row_sum = vec![0.0f32; nv];
    let mut matrix = SparseSystem::new(nv, nv);
    for (&(a, b), &weight) in &edge_weights {
        row_sum[a] += weight;
        row_sum[b] += weight;
        // nur unteres Dreieck, Schlüssel sind (klein, groß) sortiert
        matrix.push(b, a, -weight);
    }
    for v in 0..nv {
        matrix.push(v, v, row_sum[v] + heat[v]);
    }
    observer.on_stage(RigStage::Laplacian, started.elapsed());

    // Ein Solve pro Knochen. Scheitert einer, scheitert der ganze
    // Durchlauf; es werden keine Teilgewichte übernommen.
    let started = Instant::now();
    let mut weights: Vec<VertexWeights> = vec![VertexWeights::new(); nv];
    let mut rhs = vec![0.0f32; nv];
    for j in 0..bones.len() {
        rhs.fill(0.0);
        for v in 0..nv {
            if visible_closest[v].contains(&j) {
                rhs[v] = heat[v] / visible_closest[v].len() as f32;
            }
        }

        let solution =
            solver
                .solve(&matrix, &rhs)
                .map_err(|failure| MorphError::SolverFailed {
                    bone_index: j,
                    reason: failure.to_string(),
                })?;

        for (v, &value) in solution.iter().enumerate() {
            let clipped = value.clamp(0.0, 1.0);
            if clipped > 1e-8 {
                weights[v].push(j, clipped);
            }
        }
    }
    observer.on_stage(RigStage::Solve, started.elapsed());

    // numerisch nicht angebundene Vertices reparieren und zählen
    let mut unattached = 0;
    for vertex in &mut weights {
        if vertex.is_empty() {
            *vertex = VertexWeights::single(config.fallback_bone);
            unattached += 1;
        } else {
            vertex.normalize();
        }
    }
    if unattached > 0 {
        observer.on_unattached_vertices(unattached);
    }

    Ok(weights)
}

/// Diskreter Laplace-Beltrami-Operator: pro Dreieck trägt jeder Winkel
/// seinen Kotangens zur gegenüberliegenden Kante bei. Negative Summen
/// (stumpfe Winkelpaare) werden auf null geklemmt, damit die Matrix
/// diagonaldominant bleibt.
fn cotangent_edge_weights(mesh: &Mesh) -> HashMap<(usize, usize), f32> {
    let mut edges: HashMap<(usize, usize), f32> = HashMap::new();
    let edge_key = |a: usize, b: usize| if a < b { (a, b) } else { (b, a) };

    for [ia, ib, ic] in mesh.triangles() {
        let (ia, ib, ic) = (ia as usize, ib as usize, ic as usize);
        let (a, b, c) = (
            mesh.positions[ia],
            mesh.positions[ib],
            mesh.positions[ic],
        );

        let cot = |tip: Vec3, p: Vec3, q: Vec3| {
            let u = p - tip;
            let v = q - tip;
            u.dot(v) / (u.cross(v).length() + constants::EPSILON)
        };

        *edges.entry(edge_key(ib, ic)).or_insert(0.0) += cot(a, b, c);
        *edges.entry(edge_key(ia, ic)).or_insert(0.0) += cot(b, a, c);
        *edges.entry(edge_key(ia, ib)).or_insert(0.0) += cot(c, a, b);
    }

    for weight in edges.values_mut() {
        *weight = weight.max(0.0);
    }
    edges
}

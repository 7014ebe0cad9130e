// src/rig/closest.rs

use crate::mesh::Mesh;
use crate::rig::weights::VertexWeights;
use crate::skeleton::Bone;

/// Nächster Knochen nach Abstand zum proximalen Punkt, Gewicht 1.0.
/// Keine Sichtbarkeit, keine Segmentdistanz; Baseline und Fallback.
pub fn calc_bone_weights(mesh: &Mesh, bones: &[Bone]) -> Vec<VertexWeights> {
    mesh.positions
        .iter()
        .map(|&vertex| {
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for (index, bone) in bones.iter().enumerate() {
                let dist = vertex.distance_squared(bone.proximal);
                if dist < best_dist {
                    best_dist = dist;
                    best = index;
                }
            }
            VertexWeights::single(best)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::BoneCategory;
    use crate::types::Vec3;

    #[test]
    fn test_vertices_split_between_two_bones() {
        let mesh = Mesh::new(
            vec![Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            vec![],
        );
        let bones = [
            Bone::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(-1.0, 1.0, 0.0), BoneCategory::Arm),
            Bone::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), BoneCategory::Arm),
        ];
        let weights = calc_bone_weights(&mesh, &bones);

        assert_eq!(weights[0].entries()[0].bone, 0);
        assert_eq!(weights[1].entries()[0].bone, 1);
        assert_eq!(weights[0].entries()[0].weight, 1.0);
    }
}

// src/rig/metaball.rs

use crate::config::RigConfig;
use crate::field::ScalarField;
use crate::mesh::Mesh;
use crate::rig::weights::VertexWeights;
use crate::skeleton::Bone;
use std::collections::HashMap;

/// Gewichte direkt aus den Pro-Primitiv-Beiträgen des Skalarfeldes:
/// das Feld, das die Oberfläche geformt hat, bestimmt auch die Bindung.
///
/// Beiträge mehrerer Primitive desselben Knochens werden aufsummiert;
/// Primitive ohne Knochenzuordnung tragen nicht bei. Vertices, an denen
/// kein Beitrag überlebt, fallen auf den Fallback-Knochen.
pub fn calc_bone_weights(
    mesh: &Mesh,
    field: &ScalarField,
    bones: &[Bone],
    config: &RigConfig,
) -> Vec<VertexWeights> {
    mesh.positions
        .iter()
        .map(|&vertex| {
            let mut per_bone: HashMap<usize, f32> = HashMap::new();
            for contribution in field.weights(vertex, bones) {
                if let Some(bone) = contribution.bone {
                    *per_bone.entry(bone).or_insert(0.0) += contribution.share;
                }
            }

            if per_bone.is_empty() {
                return VertexWeights::single(config.fallback_bone);
            }

            let mut weights = VertexWeights::new();
            for (bone, share) in per_bone {
                weights.push(bone, share);
            }
            weights.normalize();
            weights
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Falloff;
    use crate::skeleton::BoneCategory;
    use crate::types::{Segment, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_follow_field_contributions() {
        let bones = [
            Bone::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0), BoneCategory::Torso),
            Bone::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), BoneCategory::Torso),
        ];
        let field = ScalarField::from_bones(&bones, Falloff::POLYNOMIAL2);

        // ein Vertex tief im linken Segment, einer tief im rechten
        let mesh = Mesh::new(
            vec![Vec3::new(-0.8, 0.0, 0.0), Vec3::new(0.8, 0.0, 0.0)],
            vec![],
        );
        let weights = calc_bone_weights(&mesh, &field, &bones, &RigConfig::default());

        assert_eq!(weights[0].entries()[0].bone, 0);
        assert_eq!(weights[1].entries()[0].bone, 1);
        for vertex in &weights {
            assert_relative_eq!(vertex.total(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_unassociated_primitives_fall_back() {
        let bones = [Bone::new(Vec3::ZERO, Vec3::X, BoneCategory::Torso)];
        // Feld ohne Knochenzuordnung an den Primitiven
        let field = ScalarField::from_segments(
            &[Segment::new(Vec3::ZERO, Vec3::X, 0.5)],
            Falloff::POLYNOMIAL2,
        );
        let mesh = Mesh::new(vec![Vec3::new(0.5, 0.0, 0.0)], vec![]);
        let weights = calc_bone_weights(&mesh, &field, &bones, &RigConfig::default());

        assert_eq!(weights[0].entries().len(), 1);
        assert_eq!(weights[0].entries()[0].bone, 0);
        assert_eq!(weights[0].entries()[0].weight, 1.0);
    }
}

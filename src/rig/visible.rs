// src/rig/visible.rs

use crate::config::RigConfig;
use crate::mesh::Mesh;
use crate::rig::visibility::VisibilityTester;
use crate::rig::weights::VertexWeights;
use crate::skeleton::Bone;
use crate::utils::constants;

/// Kandidatenfenster über der Minimaldistanz. Heuristik: Knochen
/// jenseits des Anderthalbfachen sind anatomisch nicht mehr plausibel.
const DISTANCE_GATE: f32 = 1.5;

/// Distanz- und sichtbarkeitsgefilterte Knochen, Gewicht 1/Distanz.
///
/// Pro Vertex: Segmentdistanz zu jedem Knochen, Kandidaten innerhalb
/// `DISTANCE_GATE` mal der Minimaldistanz, davon nur die per Tester
/// sichtbaren (Vertex gegen Fußpunkt auf dem Segment). Vertices ohne
/// sichtbaren Kandidaten fallen auf den Fallback-Knochen.
pub fn calc_bone_weights(
    mesh: &Mesh,
    tester: &dyn VisibilityTester,
    bones: &[Bone],
    config: &RigConfig,
) -> Vec<VertexWeights> {
    mesh.positions
        .iter()
        .map(|&vertex| {
            let distances: Vec<f32> = bones
                .iter()
                .map(|bone| bone.segment().distance_to_point(vertex))
                .collect();
            let min_dist = distances.iter().copied().fold(f32::INFINITY, f32::min);

            let mut weights = VertexWeights::new();
            for (index, bone) in bones.iter().enumerate() {
                if distances[index] > min_dist * DISTANCE_GATE {
                    continue;
                }
                let foot = bone.segment().closest_point(vertex);
                if !tester.can_see(vertex, foot) {
                    continue;
                }
                weights.push(index, 1.0 / distances[index].max(constants::EPSILON));
            }

            if weights.is_empty() {
                return VertexWeights::single(config.fallback_bone);
            }
            weights.normalize();
            weights
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::BoneCategory;
    use crate::types::Vec3;
    use approx::assert_relative_eq;

    struct AlwaysVisible;
    impl VisibilityTester for AlwaysVisible {
        fn can_see(&self, _a: Vec3, _b: Vec3) -> bool {
            true
        }
    }

    struct NeverVisible;
    impl VisibilityTester for NeverVisible {
        fn can_see(&self, _a: Vec3, _b: Vec3) -> bool {
            false
        }
    }

    fn two_bones() -> [Bone; 2] {
        [
            Bone::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(-1.0, 1.0, 0.0), BoneCategory::Leg),
            Bone::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), BoneCategory::Leg),
        ]
    }

    #[test]
    fn test_distant_bone_is_gated_out() {
        // Vertex nahe am linken Knochen: der rechte liegt weit jenseits
        // des 1.5-fachen Fensters
        let mesh = Mesh::new(vec![Vec3::new(-0.9, 0.5, 0.0)], vec![]);
        let weights =
            calc_bone_weights(&mesh, &AlwaysVisible, &two_bones(), &RigConfig::default());

        assert_eq!(weights[0].entries().len(), 1);
        assert_eq!(weights[0].entries()[0].bone, 0);
    }

    #[test]
    fn test_equidistant_bones_share_weight() {
        let mesh = Mesh::new(vec![Vec3::new(0.0, 0.5, 0.0)], vec![]);
        let weights =
            calc_bone_weights(&mesh, &AlwaysVisible, &two_bones(), &RigConfig::default());

        assert_eq!(weights[0].entries().len(), 2);
        assert_relative_eq!(weights[0].entries()[0].weight, 0.5, epsilon = 1e-6);
        assert_relative_eq!(weights[0].total(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_blocked_vertex_falls_back_to_default_bone() {
        let mesh = Mesh::new(vec![Vec3::new(0.0, 0.5, 0.0)], vec![]);
        let weights =
            calc_bone_weights(&mesh, &NeverVisible, &two_bones(), &RigConfig::default());

        assert_eq!(weights[0].entries().len(), 1);
        assert_eq!(weights[0].entries()[0].bone, 0);
        assert_eq!(weights[0].entries()[0].weight, 1.0);
    }
}

// src/rig/mod.rs
pub mod bone_heat;
pub mod closest;
pub mod metaball;
pub mod sdf;
pub mod sparse;
pub mod visibility;
pub mod visible;
pub mod weights;

pub use sdf::SignedDistanceField;
pub use sparse::{ConjugateGradient, SolveFailure, SparseSystem, SparseSolver, Triplet};
pub use visibility::{FieldVisibilityTester, SdfVisibilityTester, VisibilityTester};
pub use weights::{BoneWeight, VertexWeights};

use crate::config::RigConfig;
use crate::error::{MorphError, MorphResult};
use crate::field::ScalarField;
use crate::mesh::Mesh;
use crate::observe::RigObserver;
use crate::skeleton::Bone;

/// Geschlossene Familie der Gewichtsstrategien. Jede Variante ist eine
/// reine Funktion von (Mesh, Knochen, Sichtbarkeitstester, Konfiguration);
/// zwischen Aufrufen wird kein Zustand gehalten.
pub enum RigSolver<'a> {
    /// Nächster Knochen nach Distanz zum proximalen Punkt, Gewicht 1.0.
    /// Triviale Baseline und Fallback.
    ClosestBone,
    /// Distanz- plus sichtbarkeitsgefilterte Knochen, Gewicht 1/Distanz.
    VisibleBones,
    /// Gewichte direkt aus den Pro-Primitiv-Beiträgen des Skalarfeldes.
    MetaballWeights(&'a ScalarField),
    /// Wärmediffusion über den Kotangens-Laplace-Operator, gelöst als
    /// dünnbesetztes SPD-System pro Knochen.
    BoneHeat(&'a dyn SparseSolver),
}

impl RigSolver<'_> {
    /// Berechnet pro Vertex die Knochengewichte. Jeder Eintrag referenziert
    /// einen gültigen Knochenindex; die Gewichte eines Vertex summieren
    /// sich auf 1.0 (±1e-6).
    pub fn calc_bone_weights(
        &self,
        mesh: &Mesh,
        tester: &dyn VisibilityTester,
        bones: &[Bone],
        config: &RigConfig,
        observer: &mut dyn RigObserver,
    ) -> MorphResult<Vec<VertexWeights>> {
        if bones.is_empty() {
            return Err(MorphError::EmptyBoneList);
        }
        if mesh.is_empty() {
            return Err(MorphError::EmptyMesh);
        }
        config.validate(bones.len())?;

        match self {
            RigSolver::ClosestBone => Ok(closest::calc_bone_weights(mesh, bones)),
            RigSolver::VisibleBones => {
                Ok(visible::calc_bone_weights(mesh, tester, bones, config))
            }
            RigSolver::MetaballWeights(field) => {
                Ok(metaball::calc_bone_weights(mesh, field, bones, config))
            }
            RigSolver::BoneHeat(solver) => {
                bone_heat::calc_bone_weights(mesh, tester, bones, config, *solver, observer)
            }
        }
    }
}

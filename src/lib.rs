// src/lib.rs
//
// morphogen: prozedurale Erzeugung eines Kreaturen-Meshes aus einem
// Skelett (implizites Skalarfeld -> Isofläche) und Berechnung der
// Skin-Gewichte pro Vertex (Rig-Solver-Familie bis Bone-Heat-Diffusion).

pub mod config;
pub mod error;
pub mod field;
pub mod mesh;
pub mod observe;
pub mod rig;
pub mod skeleton;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{MorphError, MorphResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        config::{MeshSettings, RigConfig},
        error::{MorphError, MorphResult},
        field::{Falloff, InfluencePrimitive, PrimitiveShape, ScalarField},
        mesh::{IsosurfaceExtractor, MarchingTetrahedra, Mesh, VoxelGrid, generate_mesh},
        observe::{NoOpRigObserver, RigObserver, RigStage},
        rig::{
            BoneWeight, ConjugateGradient, FieldVisibilityTester, RigSolver, SdfVisibilityTester,
            SparseSolver, SparseSystem, VertexWeights, VisibilityTester,
        },
        skeleton::{Bone, BoneCategory},
        types::*,
    };
}

// src/mesh/mod.rs
pub mod extract;
pub mod generator;
pub mod mesh;
pub mod voxel;

pub use extract::{IsosurfaceExtractor, MarchingTetrahedra};
pub use generator::generate_mesh;
pub use mesh::Mesh;
pub use voxel::VoxelGrid;

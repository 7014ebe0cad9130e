// src/field/mod.rs
pub mod falloff;
pub mod primitive;
pub mod scalar_field;

pub use falloff::Falloff;
pub use primitive::{InfluencePrimitive, PrimitiveShape};
pub use scalar_field::{PrimitiveContribution, ScalarField};

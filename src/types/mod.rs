// src/types/mod.rs
pub mod bounds;
pub mod segment;

pub use bounds::*;
pub use segment::*;

// Re-export häufig verwendete externe Typen
pub use bevy::math::{Mat3, Quat, Vec3};

// Einheitliche Typen für das gesamte Modul
pub type Point3D = Vec3;

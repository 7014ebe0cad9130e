// src/error.rs
use thiserror::Error;

/// Fehler der Mesh- und Rig-Pipeline.
///
/// Geometrische Anomalien (Länge-0-Segmente, zusammenfallende Punkte,
/// Radius 0) werden lokal mit Epsilon-Schutz abgefangen und tauchen hier
/// nie auf. Nur fehlerhafte externe Eingaben und Solver-Abbrüche sind hart.
#[derive(Error, Debug)]
pub enum MorphError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Bone list is empty, cannot compute bone weights")]
    EmptyBoneList,

    #[error("Mesh has no vertices, cannot compute bone weights")]
    EmptyMesh,

    #[error("Sparse solve failed for bone {bone_index}: {reason}")]
    SolverFailed { bone_index: usize, reason: String },
}

pub type MorphResult<T> = Result<T, MorphError>;

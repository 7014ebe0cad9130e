// src/utils.rs

/// Mathematische Konstanten
pub mod constants {
    pub const EPSILON: f32 = 1e-6;
    pub const EPSILON_SQUARED: f32 = EPSILON * EPSILON; // Für Vergleiche mit Längen

    /// Feldwert, der die Oberfläche definiert. Muss zwischen Voxel-Sampling
    /// und allen Gewichts-/Sichtbarkeitsrechnungen exakt übereinstimmen.
    pub const SURFACE_THRESHOLD: f32 = 1.0;
}

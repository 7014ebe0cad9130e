// src/config.rs

use crate::error::{MorphError, MorphResult};
use serde::{Deserialize, Serialize};

/// Einstellungen für das Voxel-Sampling und die Isoflächen-Extraktion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSettings {
    /// Anzahl der Zellen pro Achse (Würfel pro Achse).
    pub resolution: usize,
    /// Glatte Normalen aus dem Feldgradienten statt Facetten-Normalen.
    pub smooth_normals: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            resolution: 32,
            smooth_normals: false,
        }
    }
}

impl MeshSettings {
    pub fn validate(&self) -> MorphResult<()> {
        if self.resolution < 2 {
            return Err(MorphError::InvalidConfiguration {
                message: format!("resolution must be at least 2, got {}", self.resolution),
            });
        }
        Ok(())
    }
}

/// Konstanten der Rig-Solver. Explizit statt prozessweiter Statics,
/// damit Läufe reproduzierbar und isoliert testbar bleiben.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigConfig {
    /// Wärmegewicht des Bone-Heat-Verfahrens (CWeight).
    pub heat_weight: f32,
    /// Faktor über der Minimaldistanz, bis zu dem ein Knochen noch als
    /// "nächster" gilt.
    pub distance_epsilon: f32,
    /// Anzahl Schritte beim Ray-Marching der Sichtbarkeitstests.
    pub visibility_steps: usize,
    /// Knochen, an den numerisch nicht anbindbare Vertices fallen.
    pub fallback_bone: usize,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            heat_weight: 0.22,
            distance_epsilon: 1.1,
            visibility_steps: 100,
            fallback_bone: 0,
        }
    }
}

impl RigConfig {
    pub fn validate(&self, bone_count: usize) -> MorphResult<()> {
        if self.distance_epsilon < 1.0 {
            return Err(MorphError::InvalidConfiguration {
                message: format!(
                    "distance_epsilon must be >= 1.0, got {}",
                    self.distance_epsilon
                ),
            });
        }
        if self.heat_weight <= 0.0 {
            return Err(MorphError::InvalidConfiguration {
                message: format!("heat_weight must be positive, got {}", self.heat_weight),
            });
        }
        if self.visibility_steps == 0 {
            return Err(MorphError::InvalidConfiguration {
                message: "visibility_steps must be at least 1".to_string(),
            });
        }
        if self.fallback_bone >= bone_count {
            return Err(MorphError::InvalidConfiguration {
                message: format!(
                    "fallback_bone {} out of range for {} bones",
                    self.fallback_bone, bone_count
                ),
            });
        }
        Ok(())
    }
}

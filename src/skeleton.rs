// src/skeleton.rs
//
// Read-only Eingabemodell: das Skelett kommt von außen (Generator,
// Datei, Editor), dieser Kern liest nur Weltpositionen und Kategorie.

use crate::types::{Point3D, Segment};
use serde::{Deserialize, Serialize};

/// Körperregion, zu der ein Knochen gehört.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoneCategory {
    Leg,
    Arm,
    LowerArm,
    Torso,
    Head,
    Hand,
    Foot,
    Shoulder,
    Hip,
    Paw,
    FrontLeg,
    HindLeg,
    Other,
}

/// Ein Knochen in Weltkoordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    /// Körpernahes Ende (Richtung Rumpf).
    pub proximal: Point3D,
    /// Körperfernes Ende.
    pub distal: Point3D,
    pub category: BoneCategory,
    /// Dicke quer zur Knochenachse, falls bekannt.
    pub width: Option<f32>,
}

impl Bone {
    pub fn new(proximal: Point3D, distal: Point3D, category: BoneCategory) -> Self {
        Self {
            proximal,
            distal,
            category,
            width: None,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn length(&self) -> f32 {
        (self.distal - self.proximal).length()
    }

    /// Segment-Sicht auf den Knochen für die Distanzrechnung.
    pub fn segment(&self) -> Segment {
        Segment::new(self.proximal, self.distal, self.width.unwrap_or(0.0))
    }
}

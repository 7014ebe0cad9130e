// src/types/segment.rs

use crate::types::Point3D;
use crate::utils::constants;

/// Liniensegment mit Dicke. Grundbaustein für Kapsel-/Kegel-Primitive
/// und für die Distanzrechnung der Rig-Solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3D,
    pub end: Point3D,
    pub thickness: f32,
}

impl Segment {
    pub fn new(start: Point3D, end: Point3D, thickness: f32) -> Self {
        Self {
            start,
            end,
            thickness,
        }
    }

    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    pub fn direction(&self) -> Point3D {
        self.end - self.start
    }

    /// Projiziert einen Punkt auf das Segment (geklemmt auf [start, end]).
    ///
    /// Drei-Regionen-Test: hinter dem Ende, vor dem Anfang, oder senkrecht
    /// über dem Segment.
    pub fn closest_point(&self, point: Point3D) -> Point3D {
        let dir = self.direction();
        let length_sq = dir.length_squared();

        if length_sq < constants::EPSILON_SQUARED {
            // Segment ist ein Punkt
            return self.start;
        }

        if (self.end - point).dot(dir) < 0.0 {
            self.end
        } else if (point - self.start).dot(dir) <= 0.0 {
            self.start
        } else {
            self.start + dir * ((point - self.start).dot(dir) / length_sq)
        }
    }

    /// Kürzester Abstand eines Punktes zum Segment.
    pub fn distance_to_point(&self, point: Point3D) -> f32 {
        point.distance(self.closest_point(point))
    }
}

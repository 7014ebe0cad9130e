// src/types/bounds.rs

use crate::types::Point3D;
use std::fmt;

/// 3D Bounding Box (Axis-Aligned Bounding Box)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds3D {
    pub min: Point3D,
    pub max: Point3D,
}

impl Bounds3D {
    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: Point3D, p2: Point3D) -> Self {
        Self {
            min: p1.min(p2),
            max: p1.max(p2),
        }
    }

    /// Erstellt eine Bounding Box aus Zentrum und Größe
    pub fn from_center_size(center: Point3D, size: Point3D) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Erstellt eine Bounding Box die alle Punkte umschließt
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3D>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut min = first_point;
        let mut max = first_point;

        for point in points_iter {
            min = min.min(point);
            max = max.max(point);
        }

        Some(Self { min, max })
    }

    /// Leere Bounding Box (ungültig)
    pub fn empty() -> Self {
        Self {
            min: Point3D::splat(f32::INFINITY),
            max: Point3D::splat(f32::NEG_INFINITY),
        }
    }

    /// Prüft ob die Bounding Box leer ist
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Größe der Bounding Box
    pub fn size(&self) -> Point3D {
        (self.max - self.min).max(Point3D::ZERO)
    }

    /// Längste Kante der Bounding Box
    pub fn max_extent(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    /// Zentrum der Bounding Box
    pub fn center(&self) -> Point3D {
        (self.min + self.max) * 0.5
    }

    /// Volumen der Bounding Box
    pub fn volume(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            let size = self.size();
            size.x * size.y * size.z
        }
    }

    /// Prüft ob ein Punkt in der Bounding Box liegt
    pub fn contains_point(&self, point: Point3D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Vereinigt zwei Bounding Boxes
    pub fn union(&self, other: &Bounds3D) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Erweitert die Bounding Box um einen Punkt
    pub fn expand_to_include_point(&mut self, point: Point3D) {
        if self.is_empty() {
            self.min = point;
            self.max = point;
        } else {
            self.min = self.min.min(point);
            self.max = self.max.max(point);
        }
    }

    /// Erweitert die Bounding Box um einen Margin auf allen Seiten
    pub fn expand(&self, margin: f32) -> Self {
        if self.is_empty() {
            return *self;
        }

        Self {
            min: self.min - Point3D::splat(margin),
            max: self.max + Point3D::splat(margin),
        }
    }

    /// Erzeugt die acht Eckpunkte der Bounding Box
    pub fn corners(&self) -> [Point3D; 8] {
        [
            Point3D::new(self.min.x, self.min.y, self.min.z),
            Point3D::new(self.max.x, self.min.y, self.min.z),
            Point3D::new(self.min.x, self.max.y, self.min.z),
            Point3D::new(self.max.x, self.max.y, self.min.z),
            Point3D::new(self.min.x, self.min.y, self.max.z),
            Point3D::new(self.max.x, self.min.y, self.max.z),
            Point3D::new(self.min.x, self.max.y, self.max.z),
            Point3D::new(self.max.x, self.max.y, self.max.z),
        ]
    }
}

impl fmt::Display for Bounds3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Bounds3D(empty)")
        } else {
            write!(f, "Bounds3D({:?} to {:?})", self.min, self.max)
        }
    }
}

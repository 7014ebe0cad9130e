// src/field/primitive.rs

use crate::field::falloff::Falloff;
use crate::types::{Bounds3D, Mat3, Point3D, Quat, Segment, Vec3};
use crate::utils::constants;

/// Geschlossene Familie der Einflussformen. Jede Form reduziert einen
/// 3D-Punkt auf eine effektive Distanz plus Referenzradius, die dann in
/// die Abklingfunktion gehen.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveShape {
    Ball {
        center: Point3D,
        radius: f32,
    },
    Capsule {
        segment: Segment,
    },
    /// Kapsel mit linear verjüngter Dicke; `ratio` = Basisdicke / Spitzendicke.
    Cone {
        segment: Segment,
        ratio: f32,
    },
    /// Kapsel, deren Querschnitt entlang `axis` gestaucht ist.
    FlattenedCapsule {
        segment: Segment,
        axis: Vec3,
        width: f32,
    },
    /// Orientierte Box; Chebyshev-Distanz im lokalen, auf die Halbkanten
    /// normierten Raum ergibt ein flaches statt rundes Feldplateau.
    Box {
        center: Point3D,
        half_extents: Vec3,
        rotation: Quat,
        radius: f32,
    },
}

impl PrimitiveShape {
    pub fn ball(center: Point3D, radius: f32) -> Self {
        PrimitiveShape::Ball { center, radius }
    }

    pub fn capsule(segment: Segment) -> Self {
        PrimitiveShape::Capsule { segment }
    }

    pub fn cone(segment: Segment, tip_thickness: f32) -> Self {
        let ratio = segment.thickness / tip_thickness.max(constants::EPSILON);
        PrimitiveShape::Cone { segment, ratio }
    }

    /// Das Segment wird nach innen verkürzt, damit die abgeflachten Enden
    /// nicht über die Gelenkpunkte hinausragen.
    pub fn flattened_capsule(segment: Segment, scale_axis: Vec3, width: f32) -> Self {
        let fwd = segment.direction();
        let mut seg = segment;
        if segment.length() > 2.0 * segment.thickness {
            seg.start += segment.thickness * 0.5 * fwd;
            seg.end -= segment.thickness * 0.5 * fwd;
        } else {
            seg.start += 0.25 * fwd;
            seg.end -= 0.25 * fwd;
        }
        let axis = scale_axis.normalize_or_zero().abs();
        PrimitiveShape::FlattenedCapsule {
            segment: seg,
            axis,
            width,
        }
    }

    /// Box aus Gesamtabmessungen, Ankerposition und Blickrichtung.
    /// Das Zentrum liegt eine halbe Tiefe vor dem Anker.
    pub fn oriented_box(dimensions: Vec3, pos: Point3D, fwd: Vec3, up: Vec3) -> Self {
        let half_extents = dimensions * 0.5;
        let center = pos + fwd.normalize_or_zero() * half_extents.z;
        let rotation = look_rotation(fwd, up).inverse();
        PrimitiveShape::Box {
            center,
            half_extents,
            rotation,
            // Referenzradius wie beim Original: die volle x-Abmessung
            radius: dimensions.x,
        }
    }

    /// Effektive (Distanz, Referenzradius) für einen Abfragepunkt.
    fn effective_distance(&self, point: Point3D) -> (f32, f32) {
        match self {
            PrimitiveShape::Ball { center, radius } => (point.distance(*center), *radius),
            PrimitiveShape::Capsule { segment } => {
                (segment.distance_to_point(point), segment.thickness)
            }
            PrimitiveShape::Cone { segment, ratio } => {
                let dir = segment.direction();
                let to_point = point - segment.start;
                let dist = if dir.dot(segment.end - point) < 0.0 {
                    // hinter der Spitze: Distanz zählt im Spitzenmaßstab
                    point.distance(segment.end) * ratio
                } else if dir.dot(to_point) < 0.0 {
                    point.distance(segment.start)
                } else {
                    let length = dir.length().max(constants::EPSILON);
                    let perpendicular = dir.cross(to_point).length() / length;
                    let along = (to_point.length_squared() - perpendicular * perpendicular)
                        .max(0.0)
                        .sqrt();
                    perpendicular * ((along / length) * (ratio - 1.0) + 1.0)
                };
                (dist, segment.thickness)
            }
            PrimitiveShape::FlattenedCapsule {
                segment,
                axis,
                width,
            } => {
                let offset = point - segment.closest_point(point);
                let scale_factor = segment.thickness / width.max(constants::EPSILON) - 1.0;
                let scaled = offset * (Vec3::ONE + *axis * scale_factor);
                (scaled.length(), segment.thickness)
            }
            PrimitiveShape::Box {
                center,
                half_extents,
                rotation,
                radius,
            } => {
                let local = *rotation * (point - *center);
                let normalized = local / half_extents.max(Vec3::splat(constants::EPSILON));
                let chebyshev = normalized.abs().max_element();
                (chebyshev, *radius)
            }
        }
    }

    /// Konservative AABB des Bereichs, in dem der Feldwert die
    /// Oberflächenschwelle erreichen kann.
    pub fn bounds(&self) -> Bounds3D {
        match self {
            PrimitiveShape::Ball { center, radius } => {
                Bounds3D::from_center_size(*center, Vec3::splat(radius * 2.0))
            }
            PrimitiveShape::Capsule { segment } | PrimitiveShape::Cone { segment, .. } => {
                let size = Vec3::splat(segment.thickness * 2.0);
                let bounds = Bounds3D::from_center_size(segment.start, size)
                    .union(&Bounds3D::from_center_size(segment.end, size));
                // Sicherheitsmarge: benachbarte Primitive heben das Feld
                // auch knapp außerhalb des Eigenradius über die Schwelle
                bounds.expand(0.375)
            }
            PrimitiveShape::FlattenedCapsule { segment, width, .. } => {
                let max_edge = 2.0 * segment.thickness.max(*width);
                let size = Vec3::splat(max_edge);
                Bounds3D::from_center_size(segment.start, size)
                    .union(&Bounds3D::from_center_size(segment.end, size))
            }
            PrimitiveShape::Box {
                center,
                half_extents,
                rotation,
                ..
            } => {
                let to_world = rotation.inverse();
                let mut max = Vec3::splat(f32::MIN);
                for corner in Bounds3D::from_center_size(Vec3::ZERO, *half_extents * 2.0).corners()
                {
                    max = max.max((to_world * corner).abs());
                }
                Bounds3D::from_center_size(*center, max * 2.0)
            }
        }
    }
}

/// Rotation, deren lokale +z-Achse auf `fwd` zeigt (Look-Rotation).
fn look_rotation(fwd: Vec3, up: Vec3) -> Quat {
    let forward = fwd.normalize_or_zero();
    if forward == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut right = up.cross(forward);
    if right.length_squared() < constants::EPSILON_SQUARED {
        // up und fwd kollinear: beliebige orthogonale Achse wählen
        right = forward.any_orthogonal_vector();
    }
    let right = right.normalize();
    let new_up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, new_up, forward))
}

/// Ein Einflussvolumen: Form plus Abklingfunktion, optional einem Knochen
/// zugeordnet (Index ins externe Knochen-Array, nie eine owning Referenz).
#[derive(Debug, Clone, PartialEq)]
pub struct InfluencePrimitive {
    pub shape: PrimitiveShape,
    pub falloff: Falloff,
    pub bone: Option<usize>,
    pub color: Option<Vec3>,
}

impl InfluencePrimitive {
    pub fn new(shape: PrimitiveShape, falloff: Falloff) -> Self {
        Self {
            shape,
            falloff,
            bone: None,
            color: None,
        }
    }

    pub fn with_bone(mut self, bone: usize) -> Self {
        self.bone = Some(bone);
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = Some(color);
        self
    }

    /// Feldbeitrag dieses Primitivs am Punkt `point`. Immer endlich.
    pub fn value(&self, point: Point3D) -> f32 {
        let (distance, radius) = self.shape.effective_distance(point);
        self.falloff.calc(distance * distance, radius)
    }

    pub fn bounds(&self) -> Bounds3D {
        self.shape.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ball_value_on_center_equals_falloff_at_zero() {
        let p = InfluencePrimitive::new(
            PrimitiveShape::ball(Vec3::new(1.0, 2.0, 3.0), 0.5),
            Falloff::POLYNOMIAL2,
        );
        let at_center = p.value(Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(
            at_center,
            Falloff::POLYNOMIAL2.calc(0.0, 0.5),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_ball_value_decreases_with_distance() {
        let p = InfluencePrimitive::new(
            PrimitiveShape::ball(Vec3::ZERO, 1.0),
            Falloff::POLYNOMIAL2,
        );
        let mut previous = f32::INFINITY;
        for i in 1..20 {
            let v = p.value(Vec3::new(i as f32 * 0.25, 0.0, 0.0));
            assert!(v < previous);
            previous = v;
        }
    }

    #[test]
    fn test_capsule_value_on_axis_matches_falloff() {
        let seg = Segment::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.4);
        let p = InfluencePrimitive::new(PrimitiveShape::capsule(seg), Falloff::POLYNOMIAL2);
        // Punkt auf der Mittelachse: Distanz 0
        assert_relative_eq!(
            p.value(Vec3::new(1.0, 0.0, 0.0)),
            Falloff::POLYNOMIAL2.calc(0.0, 0.4),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_capsule_bounds_contain_surface() {
        let seg = Segment::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.4);
        let p = InfluencePrimitive::new(PrimitiveShape::capsule(seg), Falloff::POLYNOMIAL2);
        let bounds = p.bounds();
        // Überall außerhalb der Bounds liegt der Wert unter der Schwelle
        for point in [
            bounds.min - Vec3::splat(0.01),
            bounds.max + Vec3::splat(0.01),
            Vec3::new(3.0, 0.0, 0.0),
        ] {
            assert!(p.value(point) < crate::utils::constants::SURFACE_THRESHOLD);
        }
    }

    #[test]
    fn test_cone_tapers_toward_tip() {
        let seg = Segment::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 1.0);
        let p = InfluencePrimitive::new(PrimitiveShape::cone(seg, 0.5), Falloff::POLYNOMIAL2);
        // gleiche Querdistanz, aber näher an der Spitze => kleinerer Wert
        let near_base = p.value(Vec3::new(0.5, 0.8, 0.0));
        let near_tip = p.value(Vec3::new(3.5, 0.8, 0.0));
        assert!(near_tip < near_base);
    }

    #[test]
    fn test_flattened_capsule_is_anisotropic() {
        let seg = Segment::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 1.0);
        let p = InfluencePrimitive::new(
            PrimitiveShape::flattened_capsule(seg, Vec3::Y, 0.5),
            Falloff::POLYNOMIAL2,
        );
        // entlang der gestauchten Achse fällt das Feld schneller ab
        let along_y = p.value(Vec3::new(2.0, 0.8, 0.0));
        let along_z = p.value(Vec3::new(2.0, 0.0, 0.8));
        assert!(along_y < along_z);
    }

    #[test]
    fn test_box_field_is_flat_topped() {
        let shape = PrimitiveShape::oriented_box(
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::ZERO,
            Vec3::Z,
            Vec3::Y,
        );
        let p = InfluencePrimitive::new(shape, Falloff::POLYNOMIAL2);
        let center = Vec3::new(0.0, 0.0, 1.0);
        // Chebyshev-Distanz: gleicher Wert überall auf einer Würfelschale
        let a = p.value(center + Vec3::new(0.5, 0.0, 0.0));
        let b = p.value(center + Vec3::new(0.5, 0.3, 0.0));
        assert_relative_eq!(a, b, epsilon = 1e-5);
    }

    #[test]
    fn test_box_bounds_contain_rotated_corners() {
        let shape = PrimitiveShape::oriented_box(
            Vec3::new(2.0, 1.0, 3.0),
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::Y,
        );
        let bounds = shape.bounds();
        if let PrimitiveShape::Box {
            center,
            half_extents,
            rotation,
            ..
        } = &shape
        {
            let to_world = rotation.inverse();
            for corner in
                Bounds3D::from_center_size(Vec3::ZERO, *half_extents * 2.0).corners()
            {
                assert!(bounds.contains_point(*center + to_world * corner));
            }
        }
    }
}

// src/field/scalar_field.rs

use crate::field::falloff::Falloff;
use crate::field::primitive::{InfluencePrimitive, PrimitiveShape};
use crate::skeleton::{Bone, BoneCategory};
use crate::types::{Bounds3D, Point3D, Segment, Vec3};
use rand::Rng;

/// Anteil, den ein Primitiv am Gesamtfeld eines Punktes hat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveContribution {
    /// Index des Primitivs im Feld.
    pub primitive: usize,
    /// Knochen des Primitivs, falls zugeordnet.
    pub bone: Option<usize>,
    /// Geschärfter Anteil (normiert, dann hoch 4).
    pub share: f32,
}

/// Summenfeld über eine einfügegeordnete Menge von Einflussprimitiven.
///
/// Wird pro Generierungslauf frisch aufgebaut, einmal für das Voxel-
/// Sampling benutzt und danach verworfen. Kein Dedup, keine räumliche
/// Beschleunigungsstruktur; Primitivzahlen liegen im Hunderterbereich.
#[derive(Debug, Clone, Default)]
pub struct ScalarField {
    primitives: Vec<InfluencePrimitive>,
}

impl ScalarField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_primitive(&mut self, primitive: InfluencePrimitive) {
        self.primitives.push(primitive);
    }

    pub fn add_ball(&mut self, radius: f32, position: Point3D, falloff: Falloff) {
        self.add_primitive(InfluencePrimitive::new(
            PrimitiveShape::ball(position, radius),
            falloff,
        ));
    }

    pub fn add_capsule(&mut self, segment: Segment, falloff: Falloff) {
        self.add_primitive(InfluencePrimitive::new(
            PrimitiveShape::capsule(segment),
            falloff,
        ));
    }

    pub fn add_cone(&mut self, segment: Segment, tip_thickness: f32, falloff: Falloff) {
        self.add_primitive(InfluencePrimitive::new(
            PrimitiveShape::cone(segment, tip_thickness),
            falloff,
        ));
    }

    pub fn primitives(&self) -> &[InfluencePrimitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Gesamtfeldwert: Summe aller Primitivbeiträge.
    pub fn value(&self, point: Point3D) -> f32 {
        self.primitives.iter().map(|p| p.value(point)).sum()
    }

    /// Vereinigung aller Primitiv-Bounds; leer ohne Primitive.
    pub fn bounds(&self) -> Bounds3D {
        self.primitives
            .iter()
            .fold(Bounds3D::empty(), |acc, p| acc.union(&p.bounds()))
    }

    /// Pro-Primitiv-Beiträge am Punkt, gefiltert und geschärft.
    ///
    /// Ein Beitrag überlebt, wenn sein Anteil am Rohwert über 0.1 liegt
    /// und er nicht zu einem Schulterknochen gehört — es sei denn, der
    /// Anteil übersteigt 0.6. Überlebende Anteile werden hoch 4 genommen
    /// und absteigend sortiert. Die Schärfung plus Schulter-Ausnahme
    /// verhindert Doppelbindung an Gelenken; Verhalten ist bewusst exakt
    /// so übernommen und nicht verallgemeinert.
    pub fn weights(&self, point: Point3D, bones: &[Bone]) -> Vec<PrimitiveContribution> {
        let raw: Vec<f32> = self.primitives.iter().map(|p| p.value(point)).collect();
        let total: f32 = raw.iter().sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut contributions: Vec<PrimitiveContribution> = raw
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| {
                let share = v / total;
                if share <= 0.1 {
                    return None;
                }
                let bone = self.primitives[i].bone;
                let is_shoulder = bone
                    .and_then(|b| bones.get(b))
                    .is_some_and(|b| b.category == BoneCategory::Shoulder);
                if is_shoulder && share <= 0.6 {
                    return None;
                }
                Some(PrimitiveContribution {
                    primitive: i,
                    bone,
                    share: share.powi(4),
                })
            })
            .collect();

        contributions.sort_by(|a, b| b.share.total_cmp(&a.share));
        contributions
    }

    /// Eine Kapsel pro Segment.
    pub fn from_segments(segments: &[Segment], falloff: Falloff) -> Self {
        let mut field = Self::new();
        for segment in segments {
            field.add_capsule(*segment, falloff);
        }
        field
    }

    /// Gestreute Bälle entlang der Segmente statt Kapseln: pro Segment die
    /// Mindestanzahl regulärer Bälle plus gaussisch verstreute Varianten.
    pub fn from_segments_scattered<R: Rng>(
        segments: &[Segment],
        falloff: Falloff,
        variation: f32,
        rng: &mut R,
    ) -> Self {
        let mut field = Self::new();
        for segment in segments {
            let count = falloff
                .minimum_sample_count(segment.length(), segment.thickness)
                .max(1);
            let fwd = segment.direction();
            let jitter = fwd.length() / (2.0 * count as f32);

            for i in 0..=count {
                let position = segment.start + (i as f32 / count as f32) * fwd;
                let random_offset = Vec3::new(
                    gaussian(rng, -jitter, jitter),
                    gaussian(rng, -jitter, jitter),
                    gaussian(rng, -jitter, jitter),
                ) * variation;
                let radius = (gaussian(rng, 0.5, 1.5) * variation).abs() * segment.thickness;
                field.add_ball(radius, position + random_offset, falloff);
                field.add_ball(segment.thickness, position, falloff);
            }
        }
        field
    }

    /// Eine Kapsel pro Knochen, mit Rückverweis auf den Knochenindex.
    pub fn from_bones(bones: &[Bone], falloff: Falloff) -> Self {
        let mut field = Self::new();
        for (index, bone) in bones.iter().enumerate() {
            let thickness = bone.width.unwrap_or(bone.length() * 0.25);
            let segment = Segment::new(bone.proximal, bone.distal, thickness);
            field.add_primitive(
                InfluencePrimitive::new(PrimitiveShape::capsule(segment), falloff)
                    .with_bone(index),
            );
        }
        field
    }
}

/// Normalverteilter Wert zwischen min und max, geklemmt nach der
/// Drei-Sigma-Regel (Box-Muller).
fn gaussian<R: Rng>(rng: &mut R, min_value: f32, max_value: f32) -> f32 {
    let (mut u, mut v, mut s);
    loop {
        u = 2.0 * rng.random::<f32>() - 1.0;
        v = 2.0 * rng.random::<f32>() - 1.0;
        s = u * u + v * v;
        if s < 1.0 && s > 0.0 {
            break;
        }
    }
    let std = u * (-2.0 * s.ln() / s).sqrt();

    let mean = (min_value + max_value) / 2.0;
    let sigma = (max_value - mean) / 3.0;
    (std * sigma + mean).clamp(min_value, max_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::SURFACE_THRESHOLD;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_field_has_empty_bounds() {
        let field = ScalarField::new();
        assert!(field.bounds().is_empty());
        assert_relative_eq!(field.value(Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_value_is_superposition() {
        // zwei parallele Kapseln mit Radius 1 im Abstand 0.5: der Wert in
        // der Mitte übersteigt jeden Einzelbeitrag
        let a = Segment::new(
            Vec3::new(0.0, 0.25, -1.0),
            Vec3::new(0.0, 0.25, 1.0),
            1.0,
        );
        let b = Segment::new(
            Vec3::new(0.0, -0.25, -1.0),
            Vec3::new(0.0, -0.25, 1.0),
            1.0,
        );
        let mut field = ScalarField::new();
        field.add_capsule(a, Falloff::POLYNOMIAL2);
        field.add_capsule(b, Falloff::POLYNOMIAL2);

        let midpoint = Vec3::ZERO;
        let single = InfluencePrimitive::new(PrimitiveShape::capsule(a), Falloff::POLYNOMIAL2)
            .value(midpoint);
        assert!(field.value(midpoint) > single);
    }

    #[test]
    fn test_bounds_contain_surface_region() {
        let mut field = ScalarField::new();
        field.add_ball(1.0, Vec3::ZERO, Falloff::POLYNOMIAL2);
        let bounds = field.bounds();

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let p = Vec3::new(
                rng.random_range(-4.0..4.0),
                rng.random_range(-4.0..4.0),
                rng.random_range(-4.0..4.0),
            );
            if field.value(p) >= SURFACE_THRESHOLD {
                assert!(bounds.contains_point(p), "surface point {:?} outside bounds", p);
            }
        }
    }

    #[test]
    fn test_weights_filter_and_sharpen() {
        let bones = vec![
            Bone::new(Vec3::ZERO, Vec3::X, BoneCategory::Torso),
            Bone::new(Vec3::X, Vec3::X * 2.0, BoneCategory::Shoulder),
        ];
        let mut field = ScalarField::new();
        field.add_primitive(
            InfluencePrimitive::new(PrimitiveShape::ball(Vec3::ZERO, 1.0), Falloff::POLYNOMIAL2)
                .with_bone(0),
        );
        field.add_primitive(
            InfluencePrimitive::new(
                PrimitiveShape::ball(Vec3::new(3.0, 0.0, 0.0), 1.0),
                Falloff::POLYNOMIAL2,
            )
            .with_bone(1),
        );

        // dicht am Torso-Ball: Schulterbeitrag liegt unter 0.6 und fliegt raus
        let contributions = field.weights(Vec3::new(0.2, 0.0, 0.0), &bones);
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].bone, Some(0));

        // Anteile sind absteigend sortiert und summieren sich höchstens
        // auf den normierten Rohwert (Schärfung verkleinert)
        let contributions = field.weights(Vec3::new(1.5, 0.0, 0.0), &bones);
        for pair in contributions.windows(2) {
            assert!(pair[0].share >= pair[1].share);
        }
        let total: f32 = contributions.iter().map(|c| c.share).sum();
        assert!(total <= 1.0 + 1e-6);
    }

    #[test]
    fn test_scattered_builder_is_seeded_deterministic() {
        let segments = [Segment::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 0.2)];
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = ScalarField::from_segments_scattered(
            &segments,
            Falloff::POLYNOMIAL2,
            0.75,
            &mut rng_a,
        );
        let b = ScalarField::from_segments_scattered(
            &segments,
            Falloff::POLYNOMIAL2,
            0.75,
            &mut rng_b,
        );
        assert_eq!(a.primitives().len(), b.primitives().len());
        assert_relative_eq!(a.value(Vec3::X), b.value(Vec3::X));
    }
}

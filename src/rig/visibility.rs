// src/rig/visibility.rs

use crate::field::ScalarField;
use crate::rig::sdf::SignedDistanceField;
use crate::types::Vec3;
use crate::utils::constants;

/// Sichtbarkeit zweier Punkte durch den Körper hindurch. Die Solver
/// fragen das O(Vertices × Knochen) mal ab; Implementierungen müssen
/// entsprechend billig pro Aufruf sein.
pub trait VisibilityTester {
    /// `true`, wenn die Strecke von `a` nach `b` den Körper nie verlässt.
    /// Für `a == b` (Strahl der Länge null) trivially `true`.
    fn can_see(&self, a: Vec3, b: Vec3) -> bool;
}

/// Sichtbarkeitstest direkt auf dem Skalarfeld: der Strahl wird in
/// gleichmäßigen Schritten abgetastet, und sobald ein Sample unter die
/// Oberflächenschwelle fällt, hat er den Körper verlassen.
pub struct FieldVisibilityTester<'a> {
    field: &'a ScalarField,
    threshold: f32,
    steps: usize,
}

impl<'a> FieldVisibilityTester<'a> {
    pub fn new(field: &'a ScalarField, steps: usize) -> Self {
        Self {
            field,
            threshold: constants::SURFACE_THRESHOLD,
            steps: steps.max(1),
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

impl VisibilityTester for FieldVisibilityTester<'_> {
    fn can_see(&self, a: Vec3, b: Vec3) -> bool {
        let dir = b - a;
        if dir.length_squared() < constants::EPSILON_SQUARED {
            return true;
        }

        let step = dir / self.steps as f32;
        // Endpunkte liegen per Konstruktion auf bzw. in der Oberfläche;
        // geprüft werden nur die inneren Stützstellen.
        for i in 1..self.steps {
            let pos = a + step * i as f32;
            if self.field.value(pos) < self.threshold {
                return false;
            }
        }
        true
    }
}

/// Sichtbarkeitstest über ein vorberechnetes Distanzfeld des extrahierten
/// Meshes. Die Schranke `curDist + distAtB + rest` nutzt aus, dass sich
/// der SDF-Wert pro Wegstück höchstens um die Schrittlänge ändern kann:
/// liegt die Summe unter der Toleranz, kann der Reststrahl die
/// Oberfläche nicht mehr erreichen und der Marsch bricht früh ab.
pub struct SdfVisibilityTester {
    sdf: SignedDistanceField,
    steps: usize,
    tolerance: f32,
}

impl SdfVisibilityTester {
    pub fn new(sdf: SignedDistanceField, steps: usize) -> Self {
        Self {
            sdf,
            steps: steps.max(1),
            tolerance: 0.002,
        }
    }

    pub fn sdf(&self) -> &SignedDistanceField {
        &self.sdf
    }
}

impl VisibilityTester for SdfVisibilityTester {
    // schneller, wenn `b` tiefer im Körper liegt als `a`
    fn can_see(&self, a: Vec3, b: Vec3) -> bool {
        let dir = b - a;
        if dir.length_squared() < constants::EPSILON_SQUARED {
            return true;
        }

        let dist_at_b = self.sdf.sample(b);
        let mut remaining = dir.length();
        let step_len = remaining / self.steps as f32;
        let step = dir / self.steps as f32;
        let mut cur = a + step;

        while remaining >= 0.0 {
            let cur_dist = self.sdf.sample(cur);
            if cur_dist > self.tolerance {
                return false;
            }
            if cur_dist + dist_at_b + remaining <= self.tolerance {
                return true;
            }
            cur += step;
            remaining -= step_len;
        }
        true
    }
}

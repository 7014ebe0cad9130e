// src/rig/weights.rs

/// Gewicht eines einzelnen Knochens an einem Vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneWeight {
    /// Index ins externe Knochen-Array.
    pub bone: usize,
    /// Nicht-negatives Gewicht.
    pub weight: f32,
}

/// Gewichtsliste eines Vertex. Nach `normalize` summieren sich die
/// Gewichte auf 1.0 und sind absteigend sortiert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexWeights(Vec<BoneWeight>);

impl VertexWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Einzelgewicht 1.0 auf einen Knochen (Baseline und Fallback).
    pub fn single(bone: usize) -> Self {
        Self(vec![BoneWeight { bone, weight: 1.0 }])
    }

    pub fn push(&mut self, bone: usize, weight: f32) {
        self.0.push(BoneWeight { bone, weight });
    }

    pub fn entries(&self) -> &[BoneWeight] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f32 {
        self.0.iter().map(|w| w.weight).sum()
    }

    /// Sortiert absteigend und normiert die Summe auf 1.0.
    pub fn normalize(&mut self) {
        let total = self.total();
        if total <= 0.0 {
            return;
        }
        self.0
            .sort_by(|a, b| b.weight.total_cmp(&a.weight));
        for entry in &mut self.0 {
            entry.weight /= total;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_sums_to_one_and_sorts() {
        let mut weights = VertexWeights::new();
        weights.push(2, 0.5);
        weights.push(0, 2.0);
        weights.push(1, 1.5);
        weights.normalize();

        assert_relative_eq!(weights.total(), 1.0, epsilon = 1e-6);
        assert_eq!(weights.entries()[0].bone, 0);
        assert_eq!(weights.entries()[2].bone, 2);
        for pair in weights.entries().windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
    }

    #[test]
    fn test_single_is_already_normalized() {
        let weights = VertexWeights::single(3);
        assert_relative_eq!(weights.total(), 1.0);
        assert_eq!(weights.entries()[0].bone, 3);
    }
}

// src/field/falloff.rs

use crate::utils::constants;
use serde::{Deserialize, Serialize};

/// Abklingfunktion: bildet (quadrierte) Distanz und Referenzradius auf
/// einen Einflusswert ab. Muss monoton nicht-steigend in der Distanz sein;
/// darauf verlassen sich alle Schwellwert- und Gewichtsrechnungen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Falloff {
    /// `(R / r)^e` — hartes Abklingen, Wert 1.0 bei Distanz R.
    Polynomial { exponent: f32 },
    /// `exp(b - b * r² / R²)` — weicheres, Perlin-artiges Abklingen.
    Perlin { sharpness: f32 },
}

impl Falloff {
    pub const POLYNOMIAL2: Falloff = Falloff::Polynomial { exponent: 2.0 };
    pub const POLYNOMIAL3: Falloff = Falloff::Polynomial { exponent: 3.0 };
    pub const PERLIN_THICK: Falloff = Falloff::Perlin { sharpness: 0.5 };
    pub const PERLIN_THIN: Falloff = Falloff::Perlin { sharpness: 0.9 };

    /// Einflusswert für die quadrierte Distanz `distance_squared` bei
    /// Referenzradius `radius`.
    pub fn calc(&self, distance_squared: f32, radius: f32) -> f32 {
        match *self {
            Falloff::Polynomial { exponent } => {
                // Epsilon verhindert Division durch 0 bei r == 0
                let r = (distance_squared + constants::EPSILON_SQUARED).sqrt();
                (radius / r).powf(exponent)
            }
            Falloff::Perlin { sharpness } => {
                let r_sq = radius * radius + constants::EPSILON_SQUARED;
                (sharpness - sharpness * distance_squared / r_sq).exp()
            }
        }
    }

    /// Mindestanzahl von Primitiven entlang eines Segments, damit der
    /// Feldwert zwischen zwei Nachbarn nicht unter die Oberflächenschwelle
    /// fällt (50%-Überlappungspunkt bleibt über der Schwelle).
    pub fn minimum_sample_count(&self, segment_length: f32, segment_thickness: f32) -> usize {
        match *self {
            Falloff::Polynomial { exponent } => {
                let spacing = 2f32.powf(1.0 / exponent) * segment_thickness * 2.0;
                (segment_length / spacing.max(constants::EPSILON)).ceil() as usize
            }
            Falloff::Perlin { sharpness } => {
                let min_dist = (segment_thickness * segment_thickness
                    * (std::f32::consts::LN_2 + sharpness)
                    / sharpness)
                    .sqrt();
                let spacing = (min_dist * segment_thickness).max(constants::EPSILON);
                (segment_length / spacing).ceil() as usize + 1
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polynomial_is_one_at_radius() {
        let f = Falloff::POLYNOMIAL2;
        assert_relative_eq!(f.calc(4.0, 2.0), 1.0, epsilon = 1e-5);
        assert_relative_eq!(Falloff::POLYNOMIAL3.calc(9.0, 3.0), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_monotonically_non_increasing() {
        for falloff in [
            Falloff::POLYNOMIAL2,
            Falloff::POLYNOMIAL3,
            Falloff::PERLIN_THICK,
            Falloff::PERLIN_THIN,
        ] {
            let mut previous = f32::INFINITY;
            for i in 0..100 {
                let d = i as f32 * 0.1;
                let v = falloff.calc(d * d, 1.0);
                assert!(
                    v <= previous + 1e-6,
                    "{:?} not monotonic at d={}: {} > {}",
                    falloff,
                    d,
                    v,
                    previous
                );
                previous = v;
            }
        }
    }

    #[test]
    fn test_zero_distance_does_not_panic() {
        // Epsilon-Schutz: r == 0 darf keine Division-durch-Null erzeugen
        let v = Falloff::POLYNOMIAL2.calc(0.0, 1.0);
        assert!(v.is_finite());
        assert!(v > 1.0);
    }

    #[test]
    fn test_perlin_value_at_center() {
        // r = 0 => exp(b)
        let b = 0.5;
        let f = Falloff::Perlin { sharpness: b };
        assert_relative_eq!(f.calc(0.0, 1.0), b.exp(), epsilon = 1e-4);
    }

    #[test]
    fn test_minimum_sample_count_grows_with_length() {
        let f = Falloff::POLYNOMIAL2;
        let short = f.minimum_sample_count(1.0, 0.1);
        let long = f.minimum_sample_count(10.0, 0.1);
        assert!(long > short);
        assert!(Falloff::PERLIN_THICK.minimum_sample_count(1.0, 0.1) >= 1);
    }
}

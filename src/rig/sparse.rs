// src/rig/sparse.rs

use nalgebra::DVector;
use thiserror::Error;

/// Eintrag einer dünnbesetzten symmetrischen Matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triplet {
    pub row: usize,
    pub col: usize,
    pub value: f32,
}

impl Triplet {
    pub fn new(row: usize, col: usize, value: f32) -> Self {
        Self { row, col, value }
    }
}

/// Symmetrische Matrix in Triplet-Form. Es wird nur das untere Dreieck
/// plus Diagonale abgelegt; das obere Dreieck folgt aus der Symmetrie.
/// Halbiert Speicher und Solver-Eingabe.
#[derive(Debug, Clone)]
pub struct SparseSystem {
    pub rows: usize,
    pub cols: usize,
    pub triplets: Vec<Triplet>,
}

impl SparseSystem {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            triplets: Vec::new(),
        }
    }

    pub fn push(&mut self, row: usize, col: usize, value: f32) {
        debug_assert!(col <= row, "only lower triangle plus diagonal is stored");
        self.triplets.push(Triplet::new(row, col, value));
    }

    /// y = A·x unter Ausnutzung der Symmetrie.
    fn multiply(&self, x: &DVector<f64>, y: &mut DVector<f64>) {
        y.fill(0.0);
        for t in &self.triplets {
            let v = t.value as f64;
            y[t.row] += v * x[t.col];
            if t.row != t.col {
                y[t.col] += v * x[t.row];
            }
        }
    }
}

/// Fehler eines Sparse-Solve-Aufrufs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveFailure {
    #[error("rhs length {rhs} does not match system dimension {rows}")]
    DimensionMismatch { rows: usize, rhs: usize },

    #[error("no convergence after {iterations} iterations (residual {residual})")]
    NotConverged { iterations: usize, residual: f64 },
}

/// Injizierter SPD-Solver. Die Referenzimplementierung rechnet im
/// Prozess; ein nativer Backend kann hinter demselben Trait stehen.
pub trait SparseSolver {
    fn solve(&self, system: &SparseSystem, rhs: &[f32]) -> Result<Vec<f32>, SolveFailure>;
}

/// Konjugierte Gradienten in f64 über der symmetrischen
/// Triplet-Expansion. Für die SPD-Matrizen des Bone-Heat-Verfahrens
/// (diagonal dominant durch den Wärmeterm) konvergiert das zuverlässig.
#[derive(Debug, Clone)]
pub struct ConjugateGradient {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-10,
        }
    }
}

impl SparseSolver for ConjugateGradient {
    fn solve(&self, system: &SparseSystem, rhs: &[f32]) -> Result<Vec<f32>, SolveFailure> {
        let n = system.rows;
        if rhs.len() != n {
            return Err(SolveFailure::DimensionMismatch {
                rows: n,
                rhs: rhs.len(),
            });
        }

        let b = DVector::from_iterator(n, rhs.iter().map(|&v| v as f64));
        let b_norm = b.norm();
        if b_norm == 0.0 {
            return Ok(vec![0.0; n]);
        }

        let mut x = DVector::zeros(n);
        let mut r = b.clone();
        let mut p = r.clone();
        let mut ap = DVector::zeros(n);
        let mut rs_old = r.dot(&r);

        for _ in 0..self.max_iterations {
            system.multiply(&p, &mut ap);
            let denom = p.dot(&ap);
            if denom.abs() < f64::MIN_POSITIVE {
                break;
            }
            let alpha = rs_old / denom;
            x.axpy(alpha, &p, 1.0);
            r.axpy(-alpha, &ap, 1.0);

            let rs_new = r.dot(&r);
            if rs_new.sqrt() <= self.tolerance * b_norm {
                return Ok(x.iter().map(|&v| v as f32).collect());
            }
            // p = r + (rs_new / rs_old) * p
            p.axpy(1.0, &r, rs_new / rs_old);
            rs_old = rs_new;
        }

        let residual = r.norm() / b_norm;
        if residual <= 1e-6 {
            // nah genug dran: akzeptieren
            return Ok(x.iter().map(|&v| v as f32).collect());
        }
        Err(SolveFailure::NotConverged {
            iterations: self.max_iterations,
            residual,
        })
    }
}

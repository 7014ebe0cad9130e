// src/observe.rs
//
// Ersetzt die Stopwatch-Aufrufe des ursprünglichen Bone-Heat-Codes durch
// injizierbare Beobachtungs-Hooks; der Kern loggt nicht selbst pro Stufe.

use std::time::Duration;

/// Stufen der Gewichtsberechnung, über die Dauer berichtet wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigStage {
    /// Aufbau der Vertex-Adjazenz aus den Dreiecken.
    Adjacency,
    /// Distanz- und Sichtbarkeitsrechnung Vertex × Knochen.
    BoneVisibility,
    /// Aufbau von Laplace-Matrix und Wärmetermen.
    Laplacian,
    /// Sparse-Solves, einer pro Knochen.
    Solve,
}

/// Beobachter für Diagnostik der Rig-Solver. Alle Methoden haben leere
/// Default-Implementierungen.
pub trait RigObserver {
    /// Eine Stufe ist abgeschlossen.
    fn on_stage(&mut self, _stage: RigStage, _elapsed: Duration) {}

    /// Anzahl Vertices, die numerisch nicht angebunden werden konnten und
    /// das Fallback-Gewicht erhalten haben.
    fn on_unattached_vertices(&mut self, _count: usize) {}
}

/// Beobachter, der nichts tut.
pub struct NoOpRigObserver;

impl RigObserver for NoOpRigObserver {}

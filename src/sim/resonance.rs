//! Resonance detection
//!
//! Resonance is a global flag raised whenever any two entities stand closer
//! than the threshold (strictly). Every spawned echo takes part, finished or
//! not. Entity counts are tiny (player plus a handful of echoes), so the scan
//! is a plain O(n²) pair loop.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};

/// Two entities currently resonating, with their centers for debug lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResonancePair {
    pub a: EntityId,
    pub b: EntityId,
    pub a_center: Vec2,
    pub b_center: Vec2,
}

impl ResonancePair {
    pub fn distance(&self) -> f32 {
        self.a_center.distance(self.b_center)
    }
}

/// Outcome of one resonance scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResonanceReport {
    pub active: bool,
    /// Resonating pairs in scan order (a before b in entity order)
    pub pairs: Vec<ResonancePair>,
}

/// Scan every entity pair and report those closer than `threshold`
pub fn detect_resonance<'a, I>(entities: I, threshold: f32) -> ResonanceReport
where
    I: IntoIterator<Item = &'a Entity>,
{
    let centers: Vec<(EntityId, Vec2)> = entities.into_iter().map(|e| (e.id, e.center())).collect();

    let mut pairs = Vec::new();
    for (i, &(a, a_center)) in centers.iter().enumerate() {
        for &(b, b_center) in &centers[i + 1..] {
            if a_center.distance(b_center) < threshold {
                pairs.push(ResonancePair {
                    a,
                    b,
                    a_center,
                    b_center,
                });
            }
        }
    }

    ResonanceReport {
        active: !pairs.is_empty(),
        pairs,
    }
}

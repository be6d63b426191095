//! Physics and gameplay tuning
//!
//! Every constant the simulation reads at runtime lives here so that balance
//! can be adjusted from data. Missing JSON fields fall back to `consts`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Movement ===
    /// Horizontal speed while a direction is held (pixels/tick)
    pub move_speed: f32,
    /// Added to vertical velocity each tick
    pub gravity: f32,
    /// Vertical velocity on take-off (negative = up)
    pub jump_velocity: f32,
    /// Hitbox shared by the player and every echo
    pub entity_size: Vec2,

    // === Echoes ===
    /// Simultaneous echo cap
    pub max_echoes: usize,
    /// Strict center-distance threshold for resonance
    pub resonance_distance: f32,

    // === Mechanisms ===
    /// Feet-to-gate-top slack for rider detection
    pub rider_tolerance: f32,
    /// Speed for gates that don't specify their own
    pub gate_speed: f32,

    // === World ===
    /// Player top edge past this y is a fall death
    pub kill_plane_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            entity_size: Vec2::new(ENTITY_WIDTH, ENTITY_HEIGHT),

            max_echoes: MAX_ECHOES,
            resonance_distance: RESONANCE_DISTANCE,

            rider_tolerance: RIDER_TOLERANCE,
            gate_speed: GATE_SPEED,

            kill_plane_y: SCREEN_HEIGHT,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning (speed={}, gravity={}, max_echoes={})",
            tuning.move_speed,
            tuning.gravity,
            tuning.max_echoes
        );
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

//! Echo Resonance - simulation core of a record-and-replay platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, recording/playback, resonance, mechanisms)
//! - `level`: Declarative level descriptions and the built-in level set
//! - `session`: Process-wide session state (tuning, unlocks, current level)
//! - `tuning`: Data-driven physics and gameplay balance

pub mod level;
pub mod session;
pub mod sim;
pub mod tuning;

pub use level::{LevelDescription, LoadError};
pub use session::{GameSession, SessionError};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation rate: one tick per rendered frame
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Playfield dimensions (pixels, y grows downward)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;
    /// Thickness of the ground strip along the bottom of every level
    pub const FLOOR_HEIGHT: f32 = 60.0;
    /// Top edge of the ground strip
    pub const FLOOR_TOP: f32 = SCREEN_HEIGHT - FLOOR_HEIGHT;

    /// Player/echo hitbox
    pub const ENTITY_WIDTH: f32 = 32.0;
    pub const ENTITY_HEIGHT: f32 = 48.0;

    /// Horizontal speed (pixels/tick, constant magnitude)
    pub const MOVE_SPEED: f32 = 5.0;
    /// Gravity added to vertical velocity every tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.8;
    /// Vertical velocity applied on take-off (negative = up)
    pub const JUMP_VELOCITY: f32 = -16.0;

    /// Center distance below which two entities resonate (strict)
    pub const RESONANCE_DISTANCE: f32 = 80.0;
    /// Maximum simultaneous echoes
    pub const MAX_ECHOES: usize = 3;

    /// Vertical slack when deciding whether an entity stands on a gate
    pub const RIDER_TOLERANCE: f32 = 4.0;
    /// Default gate speed (pixels/tick)
    pub const GATE_SPEED: f32 = 2.0;

    /// Lever hitbox
    pub const LEVER_SIZE: f32 = 40.0;
    /// Crystal hitbox (square, centered on its anchor)
    pub const CRYSTAL_SIZE: f32 = 20.0;
    /// Portal hitbox
    pub const PORTAL_WIDTH: f32 = 60.0;
    pub const PORTAL_HEIGHT: f32 = 100.0;
}

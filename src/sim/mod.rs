//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame, pixel-per-tick units)
//! - Stable iteration order (player first, then echoes in spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod mechanism;
pub mod rect;
pub mod resonance;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, step_body};
pub use entity::{Entity, EntityId, Facing, Frame, Playback, Recording, Role};
pub use mechanism::{
    Barrier, Combinator, Effect, Gate, Lever, Mechanism, MechanismEvent, MechanismGraph,
    MechanismId, Wire,
};
pub use rect::Rect;
pub use resonance::{ResonancePair, ResonanceReport, detect_resonance};
pub use state::{
    Crystal, DeathCause, EntityView, LevelState, LevelStatus, PLAYER_ID, Platform, PlatformKind,
    PlatformView, Portal, Snapshot, SolidKind, SpawnError,
};
pub use tick::{TickEvent, TickInput, TickReport, tick};

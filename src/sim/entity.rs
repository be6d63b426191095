//! Player and echo entities
//!
//! Both roles share one kinematic body. A Live entity records a frame every
//! tick; an Echo replays a snapshot of such a recording and never runs the
//! collision resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// Stable identifier for an entity within a level (player is always 0)
pub type EntityId = u32;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Kinematic pose captured once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub pos: Vec2,
    pub facing: Facing,
    pub vx: f32,
    pub on_ground: bool,
}

/// Ordered per-tick frames of a Live entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    frames: Vec<Frame>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl FromIterator<Frame> for Recording {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

/// Read cursor over an echo's private copy of a recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    recording: Recording,
    /// Next frame to apply; never decreases, never exceeds `recording.len()`
    cursor: usize,
    finished: bool,
}

impl Playback {
    pub fn new(recording: Recording) -> Self {
        let finished = recording.is_empty();
        Self {
            recording,
            cursor: 0,
            finished,
        }
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn playback_index(&self) -> usize {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Take the next frame, marking the playback finished when it was the last
    fn next_frame(&mut self) -> Option<Frame> {
        if self.finished {
            return None;
        }
        let frame = *self.recording.get(self.cursor)?;
        self.cursor += 1;
        if self.cursor >= self.recording.len() {
            self.finished = true;
        }
        Some(frame)
    }
}

/// Role-specific data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Role {
    /// Input-driven; appends to its recording every tick
    Live(Recording),
    /// Data-driven replay agent
    Echo(Playback),
}

/// A player or echo body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
    pub role: Role,
}

impl Entity {
    pub fn live(id: EntityId, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            size,
            facing: Facing::Right,
            on_ground: false,
            role: Role::Live(Recording::new()),
        }
    }

    /// Echo posed at the first recorded frame, or at `fallback` when the
    /// recording is empty (such an echo is finished from the start)
    pub fn echo(id: EntityId, recording: Recording, size: Vec2, fallback: Vec2) -> Self {
        let mut entity = Self {
            id,
            pos: fallback,
            vel: Vec2::ZERO,
            size,
            facing: Facing::Right,
            on_ground: false,
            role: Role::Echo(Playback::new(Recording::new())),
        };
        if let Some(first) = recording.get(0).copied() {
            entity.apply_frame(first);
        }
        entity.role = Role::Echo(Playback::new(recording));
        entity
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn is_echo(&self) -> bool {
        matches!(self.role, Role::Echo(_))
    }

    pub fn recording(&self) -> Option<&Recording> {
        match &self.role {
            Role::Live(recording) => Some(recording),
            Role::Echo(_) => None,
        }
    }

    pub fn playback(&self) -> Option<&Playback> {
        match &self.role {
            Role::Echo(playback) => Some(playback),
            Role::Live(_) => None,
        }
    }

    /// Current pose as a frame
    pub fn frame(&self) -> Frame {
        Frame {
            pos: self.pos,
            facing: self.facing,
            vx: self.vel.x,
            on_ground: self.on_ground,
        }
    }

    /// Append the current pose (Live only)
    pub fn record_frame(&mut self) {
        let frame = self.frame();
        if let Role::Live(recording) = &mut self.role {
            recording.push(frame);
        }
    }

    /// Apply the next recorded pose verbatim (Echo only). Returns true when
    /// this call consumed the last frame.
    pub fn advance_playback(&mut self) -> bool {
        let Role::Echo(playback) = &mut self.role else {
            return false;
        };
        let Some(frame) = playback.next_frame() else {
            return false;
        };
        let just_finished = playback.finished;
        self.apply_frame(frame);
        just_finished
    }

    fn apply_frame(&mut self, frame: Frame) {
        self.pos = frame.pos;
        self.facing = frame.facing;
        self.vel.x = frame.vx;
        self.on_ground = frame.on_ground;
    }

    /// Translate vertically with a moving gate. A replaying echo loses the
    /// nudge when its next frame is applied; a finished one keeps it.
    pub fn carry(&mut self, dy: f32) {
        self.pos.y += dy;
    }

    /// Move to `pos` at rest, handing back the recording so far (Live only)
    pub fn respawn(&mut self, pos: Vec2) -> Recording {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.on_ground = false;
        match &mut self.role {
            Role::Live(recording) => std::mem::take(recording),
            Role::Echo(_) => Recording::new(),
        }
    }
}

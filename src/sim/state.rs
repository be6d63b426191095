//! Level state and core simulation types
//!
//! A `LevelState` holds everything that changes while a level is played.
//! Resetting or leaving a level replaces the whole value between ticks.

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use super::entity::{Entity, EntityId, Facing, Recording};
use super::mechanism::{Mechanism, MechanismGraph};
use super::rect::Rect;
use super::resonance::ResonanceReport;
use crate::tuning::Tuning;

/// Id of the Live player; echoes are numbered after it
pub const PLAYER_ID: EntityId = 0;

/// Non-mechanism platform kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    /// Always solid
    Static,
    /// Solid only while resonance is active
    Resonance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    pub kind: PlatformKind,
    pub solid: bool,
}

impl Platform {
    pub fn new(rect: Rect, kind: PlatformKind) -> Self {
        Self {
            rect,
            kind,
            solid: kind == PlatformKind::Static,
        }
    }
}

/// Origin of a collision rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolidKind {
    Static,
    Resonance,
    Gate,
    Barrier,
}

/// Collectible fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    pub rect: Rect,
}

/// Level exit; enterable once every crystal is collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portal {
    pub rect: Rect,
    pub active: bool,
}

/// Why the player died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Dropped below the kill plane
    Fell,
    /// Touched a hazard
    Hazard,
}

/// Where the level stands; anything but `Playing` freezes the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelStatus {
    Playing,
    Complete,
    Failed(DeathCause),
}

/// Echo spawn rejected; no state was changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SpawnError {
    #[error("echo limit reached ({max} active)")]
    AtCapacity { max: usize },
    #[error("not enough fragments (have {have}, need {need})")]
    InsufficientFragments { have: u32, need: u32 },
}

/// Complete per-level state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    /// 1-based level number
    pub level_id: u32,
    pub name: String,
    pub tuning: Tuning,
    /// Where the player starts
    pub spawn: Vec2,
    /// Where the player reappears after leaving an echo behind
    pub respawn: Vec2,
    /// Player first, then echoes in spawn order. Never empty; loading a
    /// state that breaks this layout fails.
    #[serde(deserialize_with = "player_then_echoes")]
    pub entities: Vec<Entity>,
    pub platforms: Vec<Platform>,
    pub hazards: Vec<Rect>,
    /// Crystals still on the map
    pub crystals: Vec<Crystal>,
    /// Total crystals picked up
    pub collected: u32,
    /// Spendable fragment balance
    pub fragments: u32,
    /// Fragments spent per echo (0 = free)
    pub echo_cost: u32,
    pub portal: Option<Portal>,
    pub mechanisms: MechanismGraph,
    /// Last resonance scan
    pub resonance: ResonanceReport,
    pub status: LevelStatus,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: EntityId,
}

impl LevelState {
    /// Empty level with the player standing at `spawn`
    pub fn new(level_id: u32, name: impl Into<String>, tuning: Tuning, spawn: Vec2, respawn: Vec2) -> Self {
        let player = Entity::live(PLAYER_ID, spawn, tuning.entity_size);
        Self {
            level_id,
            name: name.into(),
            tuning,
            spawn,
            respawn,
            entities: vec![player],
            platforms: Vec::new(),
            hazards: Vec::new(),
            crystals: Vec::new(),
            collected: 0,
            fragments: 0,
            echo_cost: 0,
            portal: None,
            mechanisms: MechanismGraph::default(),
            resonance: ResonanceReport::default(),
            status: LevelStatus::Playing,
            time_ticks: 0,
            next_id: PLAYER_ID + 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> &Entity {
        &self.entities[0]
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.entities[0]
    }

    pub fn echoes(&self) -> &[Entity] {
        &self.entities[1..]
    }

    pub fn crystals_remaining(&self) -> usize {
        self.crystals.len()
    }

    /// Every rectangle that blocks movement this tick, tagged by origin
    pub fn collision_candidates(&self) -> Vec<(Rect, SolidKind)> {
        let platforms = self.platforms.iter().filter(|p| p.solid).map(|p| {
            let kind = match p.kind {
                PlatformKind::Static => SolidKind::Static,
                PlatformKind::Resonance => SolidKind::Resonance,
            };
            (p.rect, kind)
        });
        let mechanisms = self.mechanisms.solids().filter_map(|m| match m {
            Mechanism::Gate(gate) => Some((gate.rect, SolidKind::Gate)),
            Mechanism::Barrier(barrier) => Some((barrier.rect, SolidKind::Barrier)),
            Mechanism::Lever(_) => None,
        });
        platforms.chain(mechanisms).collect()
    }

    pub fn solids(&self) -> Vec<Rect> {
        self.collision_candidates().into_iter().map(|(rect, _)| rect).collect()
    }

    fn check_capacity(&self) -> Result<(), SpawnError> {
        let max = self.tuning.max_echoes;
        if self.echoes().len() >= max {
            return Err(SpawnError::AtCapacity { max });
        }
        Ok(())
    }

    /// Turn the player's recording into a new echo and send the player back
    /// to the respawn point with a fresh recording
    pub fn spawn_echo(&mut self) -> Result<EntityId, SpawnError> {
        self.check_capacity()?;
        if self.echo_cost > 0 && self.fragments < self.echo_cost {
            return Err(SpawnError::InsufficientFragments {
                have: self.fragments,
                need: self.echo_cost,
            });
        }
        self.fragments -= self.echo_cost;

        let respawn = self.respawn;
        let recording = self.player_mut().respawn(respawn);
        let frames = recording.len();
        let id = self.push_echo(recording);
        log::info!("Echo {} spawned from {} frames ({} active)", id, frames, self.echoes().len());
        Ok(id)
    }

    /// Add an echo replaying an externally supplied recording. Only the
    /// capacity limit applies; the player is left untouched. No tick
    /// events are raised for it, even if the recording is empty.
    pub fn adopt_echo(&mut self, recording: Recording) -> Result<EntityId, SpawnError> {
        self.check_capacity()?;
        Ok(self.push_echo(recording))
    }

    fn push_echo(&mut self, recording: Recording) -> EntityId {
        let id = self.next_entity_id();
        let echo = Entity::echo(id, recording, self.tuning.entity_size, self.respawn);
        self.entities.push(echo);
        id
    }

    /// Remove every echo; returns how many were removed
    pub fn clear_echoes(&mut self) -> usize {
        let removed = self.entities.len() - 1;
        self.entities.truncate(1);
        removed
    }

    /// Store a resonance scan and switch resonance platforms to match.
    /// The new solidity applies from the next collision pass.
    pub fn apply_resonance(&mut self, report: ResonanceReport) {
        for platform in &mut self.platforms {
            if platform.kind == PlatformKind::Resonance {
                platform.solid = report.active;
            }
        }
        self.resonance = report;
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level_id: self.level_id,
            time_ticks: self.time_ticks,
            status: self.status,
            entities: self.entities.iter().map(EntityView::from).collect(),
            resonance: self.resonance.clone(),
            platforms: self
                .platforms
                .iter()
                .map(|p| PlatformView {
                    rect: p.rect,
                    kind: p.kind,
                    solid: p.solid,
                })
                .collect(),
            mechanisms: self.mechanisms.mechanisms().to_vec(),
            hazards: self.hazards.clone(),
            crystals: self.crystals.iter().map(|c| c.rect).collect(),
            collected: self.collected,
            fragments: self.fragments,
            portal: self.portal.clone(),
        }
    }
}

fn player_then_echoes<'de, D>(deserializer: D) -> Result<Vec<Entity>, D::Error>
where
    D: Deserializer<'de>,
{
    let entities = Vec::<Entity>::deserialize(deserializer)?;
    let Some((player, echoes)) = entities.split_first() else {
        return Err(de::Error::custom("level state has no player entity"));
    };
    if player.is_echo() {
        return Err(de::Error::custom("first entity must be the live player"));
    }
    if echoes.iter().any(|e| !e.is_echo()) {
        return Err(de::Error::custom("only the first entity may be live"));
    }
    Ok(entities)
}

/// Presentation data for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub rect: Rect,
    pub facing: Facing,
    pub on_ground: bool,
    pub moving: bool,
    pub is_echo: bool,
    /// Echo has exhausted its recording
    pub finished: bool,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            rect: entity.rect(),
            facing: entity.facing,
            on_ground: entity.on_ground,
            moving: entity.vel.x != 0.0,
            is_echo: entity.is_echo(),
            finished: entity.playback().is_some_and(|p| p.is_finished()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformView {
    pub rect: Rect,
    pub kind: PlatformKind,
    pub solid: bool,
}

/// Everything the renderer/HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level_id: u32,
    pub time_ticks: u64,
    pub status: LevelStatus,
    pub entities: Vec<EntityView>,
    pub resonance: ResonanceReport,
    pub platforms: Vec<PlatformView>,
    pub mechanisms: Vec<Mechanism>,
    pub hazards: Vec<Rect>,
    pub crystals: Vec<Rect>,
    pub collected: u32,
    pub fragments: u32,
    pub portal: Option<Portal>,
}

//! Declarative level descriptions
//!
//! A `LevelDescription` is pure data: geometry, collectibles and the
//! lever-to-effect wiring, with mechanisms referenced by name. `load` checks
//! the description and resolves every name to a `MechanismId`, so nothing at
//! runtime looks anything up by string.

pub mod builtin;

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{
    Barrier, Combinator, Crystal, Effect, Gate, LevelState, Lever, Mechanism, MechanismGraph,
    MechanismId, Platform, PlatformKind, Portal, Rect, Wire,
};
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverDesc {
    pub name: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateDesc {
    pub name: String,
    /// Rest position
    pub rect: Rect,
    /// Travel when open (negative = up)
    pub move_y: f32,
    /// Pixels per tick; `Tuning::gate_speed` when absent
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrierDesc {
    pub name: String,
    pub rect: Rect,
}

/// Lever combination, by lever name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombinatorDesc {
    Any(Vec<String>),
    All(Vec<String>),
}

/// Effect target, by mechanism name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectDesc {
    OpenGate(String),
    DisableBarrier(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDesc {
    pub when: CombinatorDesc,
    pub effect: EffectDesc,
}

/// Static topology of one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    /// 1-based level number
    pub id: u32,
    pub name: String,
    /// Player start (top-left corner)
    pub spawn: Vec2,
    /// Where the player reappears after spawning an echo; `spawn` when absent
    #[serde(default)]
    pub respawn: Option<Vec2>,
    #[serde(default)]
    pub platforms: Vec<Rect>,
    #[serde(default)]
    pub resonance_platforms: Vec<Rect>,
    #[serde(default)]
    pub hazards: Vec<Rect>,
    #[serde(default)]
    pub crystals: Vec<Rect>,
    #[serde(default)]
    pub portal: Option<Rect>,
    #[serde(default)]
    pub levers: Vec<LeverDesc>,
    #[serde(default)]
    pub gates: Vec<GateDesc>,
    #[serde(default)]
    pub barriers: Vec<BarrierDesc>,
    #[serde(default)]
    pub wiring: Vec<WireDesc>,
    /// Fragments spent per echo (0 = echoes are free)
    #[serde(default)]
    pub echo_cost: u32,
}

/// Why a level description could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mechanism name `{0}` is used more than once")]
    DuplicateName(String),
    #[error("wiring references unknown mechanism `{0}`")]
    UnknownMechanism(String),
    #[error("`{name}` is a {found}, expected a {expected}")]
    WrongKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("wire driving `{0}` lists no levers")]
    EmptyCombinator(String),
    #[error("`{0}` is driven by more than one wire")]
    ConflictingWires(String),
    #[error("gate `{0}` needs a positive speed")]
    InvalidGateSpeed(String),
}

/// Name table built while laying out mechanisms
struct NameTable<'a> {
    ids: HashMap<&'a str, (MechanismId, &'static str)>,
}

impl<'a> NameTable<'a> {
    fn insert(&mut self, name: &'a str, id: MechanismId, kind: &'static str) -> Result<(), LoadError> {
        if self.ids.insert(name, (id, kind)).is_some() {
            return Err(LoadError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    fn resolve(&self, name: &str, expected: &'static str) -> Result<MechanismId, LoadError> {
        let &(id, found) = self
            .ids
            .get(name)
            .ok_or_else(|| LoadError::UnknownMechanism(name.to_string()))?;
        if found != expected {
            return Err(LoadError::WrongKind {
                name: name.to_string(),
                expected,
                found,
            });
        }
        Ok(id)
    }
}

impl LevelDescription {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a fresh, playable `LevelState`
    pub fn load(&self, tuning: &Tuning) -> Result<LevelState, LoadError> {
        let mechanisms = self.resolve_mechanisms(tuning)?;

        let mut state = LevelState::new(
            self.id,
            self.name.clone(),
            tuning.clone(),
            self.spawn,
            self.respawn.unwrap_or(self.spawn),
        );
        state.platforms.extend(
            self.platforms
                .iter()
                .map(|&rect| Platform::new(rect, PlatformKind::Static)),
        );
        state.platforms.extend(
            self.resonance_platforms
                .iter()
                .map(|&rect| Platform::new(rect, PlatformKind::Resonance)),
        );
        state.hazards = self.hazards.clone();
        state.crystals = self.crystals.iter().map(|&rect| Crystal { rect }).collect();
        state.portal = self.portal.map(|rect| Portal {
            rect,
            active: self.crystals.is_empty(),
        });
        state.echo_cost = self.echo_cost;
        state.mechanisms = mechanisms;

        log::info!(
            "Loaded level {} '{}': {} platforms, {} mechanisms, {} wires, {} crystals",
            self.id,
            self.name,
            state.platforms.len(),
            state.mechanisms.mechanisms().len(),
            state.mechanisms.wires().len(),
            state.crystals.len()
        );
        Ok(state)
    }

    /// Lay out mechanisms (levers, then gates, then barriers) and resolve wiring
    fn resolve_mechanisms(&self, tuning: &Tuning) -> Result<MechanismGraph, LoadError> {
        let mut names = NameTable { ids: HashMap::new() };
        let mut mechanisms = Vec::with_capacity(self.levers.len() + self.gates.len() + self.barriers.len());

        for lever in &self.levers {
            names.insert(&lever.name, MechanismId(mechanisms.len()), "lever")?;
            mechanisms.push(Mechanism::Lever(Lever::new(lever.rect)));
        }
        for gate in &self.gates {
            let speed = gate.speed.unwrap_or(tuning.gate_speed);
            if speed.is_nan() || speed <= 0.0 {
                return Err(LoadError::InvalidGateSpeed(gate.name.clone()));
            }
            names.insert(&gate.name, MechanismId(mechanisms.len()), "gate")?;
            mechanisms.push(Mechanism::Gate(Gate::new(gate.rect, gate.move_y, speed)));
        }
        for barrier in &self.barriers {
            names.insert(&barrier.name, MechanismId(mechanisms.len()), "barrier")?;
            mechanisms.push(Mechanism::Barrier(Barrier::new(barrier.rect)));
        }

        let mut driven = HashSet::new();
        let mut wires = Vec::with_capacity(self.wiring.len());
        for wire in &self.wiring {
            let (effect, target) = match &wire.effect {
                EffectDesc::OpenGate(name) => (Effect::OpenGate(names.resolve(name, "gate")?), name),
                EffectDesc::DisableBarrier(name) => {
                    (Effect::DisableBarrier(names.resolve(name, "barrier")?), name)
                }
            };
            if !driven.insert(effect.target()) {
                return Err(LoadError::ConflictingWires(target.clone()));
            }

            let (lever_names, any) = match &wire.when {
                CombinatorDesc::Any(levers) => (levers, true),
                CombinatorDesc::All(levers) => (levers, false),
            };
            if lever_names.is_empty() {
                return Err(LoadError::EmptyCombinator(target.clone()));
            }
            let levers = lever_names
                .iter()
                .map(|name| names.resolve(name, "lever"))
                .collect::<Result<Vec<_>, _>>()?;
            let when = if any {
                Combinator::Any(levers)
            } else {
                Combinator::All(levers)
            };
            wires.push(Wire { when, effect });
        }

        Ok(MechanismGraph::new(mechanisms, wires))
    }
}

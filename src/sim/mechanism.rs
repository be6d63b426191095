//! Levers, gates and barriers
//!
//! Mechanisms live in one list as a tagged `Mechanism` and are dispatched
//! explicitly each tick, in a fixed order:
//! 1. levers read this tick's entity positions
//! 2. wires evaluate their combinators over lever states
//! 3. gates move toward their commanded endpoint and carry their riders
//! 4. barriers take their commanded solidity
//!
//! Wires reference mechanisms by `MechanismId` (an index into the list). The
//! level loader resolves names to ids and guarantees each id points at the
//! right kind of mechanism.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::rect::Rect;

/// Index of a mechanism in its level's mechanism list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MechanismId(pub usize);

/// Positional trigger: on exactly while some entity overlaps it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lever {
    pub rect: Rect,
    pub activated: bool,
}

impl Lever {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            activated: false,
        }
    }

    /// Recompute activation; returns true if the state flipped
    pub fn update<'a, I>(&mut self, entities: I) -> bool
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let activated = entities.into_iter().any(|e| e.rect().intersects(&self.rect));
        let changed = activated != self.activated;
        self.activated = activated;
        changed
    }
}

/// Moving platform travelling between a rest and a displaced height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub rect: Rect,
    pub initial_y: f32,
    pub target_y: f32,
    /// Pixels per tick
    pub speed: f32,
    /// Commanded state from the last wiring evaluation
    pub should_open: bool,
}

impl Gate {
    /// Gate resting at `rect`, opening `move_y` pixels away (negative = up)
    pub fn new(rect: Rect, move_y: f32, speed: f32) -> Self {
        Self {
            rect,
            initial_y: rect.top(),
            target_y: rect.top() + move_y,
            speed,
            should_open: false,
        }
    }

    /// Step toward the endpoint matching `should_open`, never overshooting.
    /// Returns the signed vertical displacement applied.
    pub fn update_position(&mut self, should_open: bool) -> f32 {
        self.should_open = should_open;
        let goal = if should_open { self.target_y } else { self.initial_y };
        let remaining = goal - self.rect.pos.y;
        if remaining == 0.0 {
            return 0.0;
        }

        let before = self.rect.pos.y;
        self.rect.pos.y = if remaining > 0.0 {
            (before + self.speed).min(goal)
        } else {
            (before - self.speed).max(goal)
        };
        self.rect.pos.y - before
    }

    pub fn is_fully_open(&self) -> bool {
        self.rect.pos.y == self.target_y
    }

    pub fn is_closed(&self) -> bool {
        self.rect.pos.y == self.initial_y
    }

    /// Whether `entity` is standing on this gate's top surface
    pub fn is_ridden_by(&self, entity: &Entity, tolerance: f32) -> bool {
        let rect = entity.rect();
        (rect.bottom() - self.rect.top()).abs() <= tolerance && rect.overlaps_x(&self.rect)
    }
}

/// Solid obstacle switched on and off by wiring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub rect: Rect,
    pub active: bool,
}

impl Barrier {
    pub fn new(rect: Rect) -> Self {
        Self { rect, active: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mechanism {
    Lever(Lever),
    Gate(Gate),
    Barrier(Barrier),
}

impl Mechanism {
    pub fn rect(&self) -> Rect {
        match self {
            Mechanism::Lever(lever) => lever.rect,
            Mechanism::Gate(gate) => gate.rect,
            Mechanism::Barrier(barrier) => barrier.rect,
        }
    }

    /// Whether this mechanism currently blocks movement
    pub fn is_solid(&self) -> bool {
        match self {
            Mechanism::Lever(_) => false,
            Mechanism::Gate(_) => true,
            Mechanism::Barrier(barrier) => barrier.active,
        }
    }
}

/// Boolean combination of lever states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Combinator {
    /// OR
    Any(Vec<MechanismId>),
    /// AND
    All(Vec<MechanismId>),
}

impl Combinator {
    pub fn levers(&self) -> &[MechanismId] {
        match self {
            Combinator::Any(ids) | Combinator::All(ids) => ids,
        }
    }

    pub fn evaluate(&self, mechanisms: &[Mechanism]) -> bool {
        let on = |id: &MechanismId| {
            matches!(mechanisms.get(id.0), Some(Mechanism::Lever(lever)) if lever.activated)
        };
        match self {
            Combinator::Any(ids) => ids.iter().any(on),
            Combinator::All(ids) => ids.iter().all(on),
        }
    }
}

/// What a wire drives when its combinator holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Gate opens while true, closes while false
    OpenGate(MechanismId),
    /// Barrier is removed while true, present while false
    DisableBarrier(MechanismId),
}

impl Effect {
    pub fn target(&self) -> MechanismId {
        match self {
            Effect::OpenGate(id) | Effect::DisableBarrier(id) => *id,
        }
    }
}

/// Resolved `(combinator, effect)` wiring entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    pub when: Combinator,
    pub effect: Effect,
}

/// State transitions worth telling the host about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MechanismEvent {
    LeverChanged { id: MechanismId, activated: bool },
    GateCommanded { id: MechanismId, open: bool },
    BarrierChanged { id: MechanismId, active: bool },
}

/// All mechanisms of a level plus their wiring
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MechanismGraph {
    mechanisms: Vec<Mechanism>,
    wires: Vec<Wire>,
}

impl MechanismGraph {
    /// Build from already-validated parts (see `level::LevelDescription::load`)
    pub fn new(mechanisms: Vec<Mechanism>, wires: Vec<Wire>) -> Self {
        Self { mechanisms, wires }
    }

    pub fn mechanisms(&self) -> &[Mechanism] {
        &self.mechanisms
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn get(&self, id: MechanismId) -> Option<&Mechanism> {
        self.mechanisms.get(id.0)
    }

    pub fn gate(&self, id: MechanismId) -> Option<&Gate> {
        match self.get(id) {
            Some(Mechanism::Gate(gate)) => Some(gate),
            _ => None,
        }
    }

    pub fn lever(&self, id: MechanismId) -> Option<&Lever> {
        match self.get(id) {
            Some(Mechanism::Lever(lever)) => Some(lever),
            _ => None,
        }
    }

    pub fn barrier(&self, id: MechanismId) -> Option<&Barrier> {
        match self.get(id) {
            Some(Mechanism::Barrier(barrier)) => Some(barrier),
            _ => None,
        }
    }

    /// Rectangles that currently block movement
    pub fn solids(&self) -> impl Iterator<Item = &Mechanism> {
        self.mechanisms.iter().filter(|m| m.is_solid())
    }

    /// Advance the whole graph by one tick
    pub fn step(&mut self, entities: &mut [Entity], rider_tolerance: f32) -> Vec<MechanismEvent> {
        let mut events = Vec::new();

        // 1. Levers
        for (i, mechanism) in self.mechanisms.iter_mut().enumerate() {
            if let Mechanism::Lever(lever) = mechanism {
                if lever.update(entities.iter()) {
                    events.push(MechanismEvent::LeverChanged {
                        id: MechanismId(i),
                        activated: lever.activated,
                    });
                }
            }
        }

        // 2. Wiring. Unwired gates stay closed, unwired barriers stay up.
        let mut commands = vec![false; self.mechanisms.len()];
        for wire in &self.wires {
            let holds = wire.when.evaluate(&self.mechanisms);
            if let Some(command) = commands.get_mut(wire.effect.target().0) {
                *command = holds;
            }
        }

        // 3. Gates, riders snapshotted before the move
        for (i, mechanism) in self.mechanisms.iter_mut().enumerate() {
            let Mechanism::Gate(gate) = mechanism else {
                continue;
            };
            let open = commands[i];
            if open != gate.should_open {
                events.push(MechanismEvent::GateCommanded {
                    id: MechanismId(i),
                    open,
                });
            }

            let riders: Vec<usize> = entities
                .iter()
                .enumerate()
                .filter(|(_, e)| gate.is_ridden_by(e, rider_tolerance))
                .map(|(idx, _)| idx)
                .collect();

            let dy = gate.update_position(open);
            if dy != 0.0 {
                for idx in riders {
                    let rider = &mut entities[idx];
                    rider.carry(dy);
                    if dy < 0.0 {
                        rider.on_ground = true;
                    }
                }
            }
        }

        // 4. Barriers
        for (i, mechanism) in self.mechanisms.iter_mut().enumerate() {
            if let Mechanism::Barrier(barrier) = mechanism {
                let active = !commands[i];
                if active != barrier.active {
                    barrier.active = active;
                    log::debug!("Barrier {} {}", i, if active { "up" } else { "down" });
                    events.push(MechanismEvent::BarrierChanged {
                        id: MechanismId(i),
                        active,
                    });
                }
            }
        }

        events
    }
}

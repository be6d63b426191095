//! Fixed timestep simulation tick
//!
//! One call advances a level by exactly one frame, in a fixed order:
//! 1. action intents (clear echoes, spawn echo)
//! 2. player physics against the current solids
//! 3. collectibles, hazards, fall and portal checks
//! 4. resonance scan (platform solidity applies from the next tick)
//! 5. mechanism graph (levers, wiring, gates + riders, barriers)
//! 6. player recording, so a recorded pose includes any gate ride
//! 7. echo playback

use serde::{Deserialize, Serialize};

use super::collision::step_body;
use super::entity::{EntityId, Facing};
use super::mechanism::MechanismEvent;
use super::resonance::detect_resonance;
use super::state::{DeathCause, LevelState, LevelStatus, SpawnError};

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Leave an echo behind and respawn
    pub spawn_echo: bool,
    /// Remove every echo
    pub clear_echoes: bool,
    /// False while the host suppresses input (e.g. a tutorial popup); the
    /// world keeps simulating but every intent above is ignored
    pub input_active: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            left: false,
            right: false,
            jump: false,
            spawn_echo: false,
            clear_echoes: false,
            input_active: true,
        }
    }
}

impl TickInput {
    pub fn right() -> Self {
        Self {
            right: true,
            ..Default::default()
        }
    }

    pub fn left() -> Self {
        Self {
            left: true,
            ..Default::default()
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickEvent {
    EchoSpawned { id: EntityId },
    EchoRejected(SpawnError),
    EchoesCleared { count: usize },
    EchoFinished { id: EntityId },
    CrystalCollected { remaining: usize },
    PortalOpened,
    ResonanceChanged { active: bool },
    Mechanism(MechanismEvent),
    PlayerDied(DeathCause),
    LevelComplete,
}

/// Events raised by one tick, in the order they happened
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub events: Vec<TickEvent>,
}

impl TickReport {
    pub fn level_complete(&self) -> bool {
        self.events.contains(&TickEvent::LevelComplete)
    }

    pub fn death(&self) -> Option<DeathCause> {
        self.events.iter().find_map(|e| match e {
            TickEvent::PlayerDied(cause) => Some(*cause),
            _ => None,
        })
    }
}

/// Advance the level by one fixed timestep
pub fn tick(state: &mut LevelState, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    // Finished levels stay frozen until the host replaces them
    if state.status != LevelStatus::Playing {
        return report;
    }
    state.time_ticks += 1;

    let input = if input.input_active {
        *input
    } else {
        TickInput {
            input_active: false,
            ..Default::default()
        }
    };

    handle_actions(state, &input, &mut report);
    move_player(state, &input);
    check_player_contacts(state, &mut report);

    let scan = detect_resonance(&state.entities, state.tuning.resonance_distance);
    if scan.active != state.resonance.active {
        log::debug!("Resonance {}", if scan.active { "on" } else { "off" });
        report.events.push(TickEvent::ResonanceChanged { active: scan.active });
    }
    state.apply_resonance(scan);

    let tolerance = state.tuning.rider_tolerance;
    let mechanism_events = state.mechanisms.step(&mut state.entities, tolerance);
    report
        .events
        .extend(mechanism_events.into_iter().map(TickEvent::Mechanism));

    state.player_mut().record_frame();

    for echo in state.entities.iter_mut().skip(1) {
        if echo.advance_playback() {
            report.events.push(TickEvent::EchoFinished { id: echo.id });
        }
    }

    report
}

fn handle_actions(state: &mut LevelState, input: &TickInput, report: &mut TickReport) {
    if input.clear_echoes {
        let count = state.clear_echoes();
        log::info!("Cleared {} echoes", count);
        report.events.push(TickEvent::EchoesCleared { count });
    }

    if input.spawn_echo {
        match state.spawn_echo() {
            Ok(id) => {
                report.events.push(TickEvent::EchoSpawned { id });
                // An empty recording never plays, so it is finished on arrival
                let finished = state
                    .entities
                    .last()
                    .and_then(|e| e.playback())
                    .is_some_and(|p| p.is_finished());
                if finished {
                    report.events.push(TickEvent::EchoFinished { id });
                }
            }
            Err(err) => {
                log::warn!("Echo spawn rejected: {}", err);
                report.events.push(TickEvent::EchoRejected(err));
            }
        }
    }
}

fn move_player(state: &mut LevelState, input: &TickInput) {
    let solids = state.solids();
    let speed = state.tuning.move_speed;
    let jump_velocity = state.tuning.jump_velocity;
    let gravity = state.tuning.gravity;

    let player = state.player_mut();
    player.vel.x = 0.0;
    if input.left {
        player.vel.x = -speed;
        player.facing = Facing::Left;
    }
    if input.right {
        player.vel.x = speed;
        player.facing = Facing::Right;
    }
    if input.jump && player.on_ground {
        player.vel.y = jump_velocity;
        player.on_ground = false;
    }

    step_body(player, &solids, gravity);
}

fn check_player_contacts(state: &mut LevelState, report: &mut TickReport) {
    let player_rect = state.player().rect();

    let before = state.crystals.len();
    state.crystals.retain(|c| !c.rect.intersects(&player_rect));
    let picked = before - state.crystals.len();
    if picked > 0 {
        state.collected += picked as u32;
        state.fragments += picked as u32;
        let remaining = state.crystals.len();
        report.events.push(TickEvent::CrystalCollected { remaining });
        if remaining == 0 {
            if let Some(portal) = state.portal.as_mut().filter(|p| !p.active) {
                portal.active = true;
                log::info!("All crystals collected, portal open");
                report.events.push(TickEvent::PortalOpened);
            }
        }
    }

    let cause = if state.hazards.iter().any(|h| h.intersects(&player_rect)) {
        Some(DeathCause::Hazard)
    } else if player_rect.top() > state.tuning.kill_plane_y {
        Some(DeathCause::Fell)
    } else {
        None
    };
    if let Some(cause) = cause {
        log::info!("Player died ({:?}) at tick {}", cause, state.time_ticks);
        state.status = LevelStatus::Failed(cause);
        report.events.push(TickEvent::PlayerDied(cause));
        return;
    }

    let entered_portal = state
        .portal
        .as_ref()
        .is_some_and(|p| p.active && p.rect.intersects(&player_rect));
    if entered_portal {
        log::info!("Level {} complete at tick {}", state.level_id, state.time_ticks);
        state.status = LevelStatus::Complete;
        report.events.push(TickEvent::LevelComplete);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::{Frame, Recording};
    use crate::sim::mechanism::{Barrier, Combinator, Effect, Gate, Lever, Mechanism, MechanismGraph, MechanismId, Wire};
    use crate::sim::rect::Rect;
    use crate::sim::state::{Crystal, Platform, PlatformKind, Portal};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    const FLOOR: Rect = Rect::new(0.0, FLOOR_TOP, SCREEN_WIDTH, FLOOR_HEIGHT);

    /// Flat level with the player resting on the floor
    fn flat_level() -> LevelState {
        let standing = Vec2::new(100.0, FLOOR_TOP - ENTITY_HEIGHT);
        let mut state = LevelState::new(1, "flat", Tuning::default(), standing, standing);
        state.platforms.push(Platform::new(FLOOR, PlatformKind::Static));
        state
    }

    fn run(state: &mut LevelState, input: TickInput, ticks: usize) -> Vec<TickEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(tick(state, &input).events);
        }
        events
    }

    #[test]
    fn walking_and_facing() {
        let mut state = flat_level();
        run(&mut state, TickInput::right(), 10);
        assert_eq!(state.player().pos.x, 150.0);
        assert_eq!(state.player().facing, Facing::Right);
        assert!(state.player().on_ground);

        run(&mut state, TickInput::left(), 4);
        assert_eq!(state.player().pos.x, 130.0);
        assert_eq!(state.player().facing, Facing::Left);

        // Both held: right wins
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        run(&mut state, both, 1);
        assert_eq!(state.player().pos.x, 135.0);
    }

    #[test]
    fn jump_only_from_ground() {
        let mut state = flat_level();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        let y_after_takeoff = state.player().pos.y;
        assert!(y_after_takeoff < FLOOR_TOP - ENTITY_HEIGHT);
        assert!(!state.player().on_ground);

        // Holding jump mid-air does not re-launch
        let vy = state.player().vel.y;
        tick(&mut state, &jump);
        assert_eq!(state.player().vel.y, vy + GRAVITY);

        // Eventually lands again
        run(&mut state, TickInput::default(), 60);
        assert!(state.player().on_ground);
        assert_eq!(state.player().rect().bottom(), FLOOR_TOP);
    }

    #[test]
    fn recording_grows_one_frame_per_tick() {
        let mut state = flat_level();
        for n in 1..=50 {
            let input = if n % 3 == 0 { TickInput::right() } else { TickInput::default() };
            tick(&mut state, &input);
            assert_eq!(state.player().recording().unwrap().len(), n);
        }
    }

    #[test]
    fn suppressed_input_still_simulates() {
        let mut state = flat_level();
        state.player_mut().pos.y -= 100.0;
        let suppressed = TickInput {
            right: true,
            jump: true,
            spawn_echo: true,
            clear_echoes: true,
            input_active: false,
            ..Default::default()
        };
        let events = run(&mut state, suppressed, 30);
        assert!(events.is_empty());
        assert_eq!(state.player().pos.x, 100.0);
        assert!(state.player().on_ground);
        assert!(state.echoes().is_empty());
        assert_eq!(state.player().recording().unwrap().len(), 30);
    }

    #[test]
    fn echo_retraces_recording_then_freezes() {
        let mut state = flat_level();
        let script: Vec<TickInput> = (0..40)
            .map(|i| match i % 10 {
                0 => TickInput {
                    jump: true,
                    ..Default::default()
                },
                1..=5 => TickInput::right(),
                _ => TickInput::left(),
            })
            .collect();
        for input in &script {
            tick(&mut state, input);
        }
        let recorded: Vec<Frame> = state.player().recording().unwrap().frames().to_vec();
        assert_eq!(recorded.len(), script.len());

        let spawn = TickInput {
            spawn_echo: true,
            ..Default::default()
        };
        let report = tick(&mut state, &spawn);
        assert!(report.events.contains(&TickEvent::EchoSpawned { id: 1 }));
        assert_eq!(state.echoes()[0].frame(), recorded[0]);
        // The spawn tick already recorded one frame for the new run.
        assert_eq!(state.player().recording().unwrap().len(), 1);

        for expected in &recorded[1..] {
            tick(&mut state, &TickInput::default());
            assert_eq!(state.echoes()[0].frame(), *expected);
        }
        let playback = state.echoes()[0].playback().unwrap();
        assert!(playback.is_finished());
        assert_eq!(playback.playback_index(), recorded.len());

        let frozen = state.echoes()[0].clone();
        let events = run(&mut state, TickInput::default(), 20);
        assert!(!events.iter().any(|e| matches!(e, TickEvent::EchoFinished { .. })));
        assert_eq!(state.echoes()[0], frozen);
    }

    #[test]
    fn echo_finished_reported_once() {
        let mut state = flat_level();
        run(&mut state, TickInput::right(), 5);
        let spawn = TickInput {
            spawn_echo: true,
            ..Default::default()
        };
        let mut events = tick(&mut state, &spawn).events;
        events.extend(run(&mut state, TickInput::default(), 20));
        let finished = events
            .iter()
            .filter(|e| matches!(e, TickEvent::EchoFinished { id: 1 }))
            .count();
        assert_eq!(finished, 1);
    }

    #[test]
    fn spawn_rejections_are_events() {
        let mut state = flat_level();
        let spawn = TickInput {
            spawn_echo: true,
            ..Default::default()
        };
        for _ in 0..MAX_ECHOES {
            tick(&mut state, &spawn);
        }
        let report = tick(&mut state, &spawn);
        assert_eq!(
            report.events,
            vec![TickEvent::EchoRejected(SpawnError::AtCapacity { max: MAX_ECHOES })]
        );
        assert_eq!(state.echoes().len(), MAX_ECHOES);

        let clear_and_spawn = TickInput {
            spawn_echo: true,
            clear_echoes: true,
            ..Default::default()
        };
        let report = tick(&mut state, &clear_and_spawn);
        assert_eq!(report.events[0], TickEvent::EchoesCleared { count: MAX_ECHOES });
        assert!(matches!(report.events[1], TickEvent::EchoSpawned { .. }));
        assert_eq!(state.echoes().len(), 1);
    }

    #[test]
    fn resonance_platform_turns_solid_next_tick() {
        let mut state = flat_level();
        // Resonance platform right under the player's feet, floor far below
        state.platforms.clear();
        let bridge = Rect::new(50.0, FLOOR_TOP, 200.0, 20.0);
        state.platforms.push(Platform::new(bridge, PlatformKind::Resonance));
        state.platforms.push(Platform::new(Rect::new(0.0, 700.0, SCREEN_WIDTH, 20.0), PlatformKind::Static));

        // Lone player: no resonance, falls through the bridge
        tick(&mut state, &TickInput::default());
        assert!(!state.resonance.active);
        assert!(state.player().rect().bottom() > FLOOR_TOP);

        // Echo standing next to the respawn point keeps resonance on
        let mut state2 = flat_level();
        state2.platforms.clear();
        state2.platforms.push(Platform::new(bridge, PlatformKind::Resonance));
        let pose = Frame {
            pos: state2.player().pos + Vec2::new(20.0, 0.0),
            facing: Facing::Left,
            vx: 0.0,
            on_ground: true,
        };
        state2.adopt_echo(std::iter::repeat_n(pose, 5).collect()).unwrap();

        let report = tick(&mut state2, &TickInput::default());
        // Flag raised this tick, but the collision pass already ran
        assert!(report.events.contains(&TickEvent::ResonanceChanged { active: true }));
        assert!(state2.platforms[0].solid);
        let fell_by = state2.player().pos.y - (FLOOR_TOP - ENTITY_HEIGHT);
        assert!(fell_by > 0.0);

        // From now on the bridge catches the player
        run(&mut state2, TickInput::default(), 3);
        assert_eq!(state2.player().rect().bottom(), FLOOR_TOP);
        assert!(state2.resonance.pairs.len() == 1);
    }

    #[test]
    fn hazard_and_fall_deaths() {
        let mut state = flat_level();
        state.hazards.push(Rect::new(200.0, FLOOR_TOP - 20.0, 50.0, 20.0));
        let events = run(&mut state, TickInput::right(), 40);
        assert_eq!(state.status, LevelStatus::Failed(DeathCause::Hazard));
        assert_eq!(
            events.iter().filter(|e| matches!(e, TickEvent::PlayerDied(_))).count(),
            1
        );
        // Frozen after death
        let ticks = state.time_ticks;
        assert!(tick(&mut state, &TickInput::right()).events.is_empty());
        assert_eq!(state.time_ticks, ticks);

        let mut state = flat_level();
        state.platforms.clear();
        let events = run(&mut state, TickInput::default(), 120);
        assert!(events.contains(&TickEvent::PlayerDied(DeathCause::Fell)));
        assert_eq!(state.status, LevelStatus::Failed(DeathCause::Fell));
    }

    #[test]
    fn crystals_feed_fragments_and_open_portal() {
        let mut state = flat_level();
        for x in [200.0, 300.0] {
            state.crystals.push(Crystal {
                rect: Rect::from_center(Vec2::new(x, FLOOR_TOP - 20.0), Vec2::splat(CRYSTAL_SIZE)),
            });
        }
        state.portal = Some(Portal {
            rect: Rect::new(500.0, FLOOR_TOP - PORTAL_HEIGHT, PORTAL_WIDTH, PORTAL_HEIGHT),
            active: false,
        });
        state.echo_cost = 1;

        let events = run(&mut state, TickInput::right(), 50);
        assert_eq!(state.collected, 2);
        assert!(events.contains(&TickEvent::CrystalCollected { remaining: 0 }));
        assert!(events.contains(&TickEvent::PortalOpened));
        assert_eq!(state.status, LevelStatus::Playing);

        let spawn = TickInput {
            spawn_echo: true,
            ..Default::default()
        };
        tick(&mut state, &spawn);
        assert_eq!(state.fragments, 1);
        assert_eq!(state.collected, 2);
    }

    #[test]
    fn closed_portal_is_not_an_exit() {
        let mut state = flat_level();
        state.crystals.push(Crystal {
            rect: Rect::new(1000.0, 0.0, 20.0, 20.0),
        });
        state.portal = Some(Portal {
            rect: Rect::new(200.0, FLOOR_TOP - PORTAL_HEIGHT, PORTAL_WIDTH, PORTAL_HEIGHT),
            active: false,
        });
        let events = run(&mut state, TickInput::right(), 40);
        assert!(!events.contains(&TickEvent::LevelComplete));
        assert_eq!(state.status, LevelStatus::Playing);
    }

    #[test]
    fn echo_holds_lever_and_player_rides_gate() {
        let mut state = flat_level();
        let lever = Rect::from_bottom_left(600.0, FLOOR_TOP, Vec2::splat(LEVER_SIZE));
        // Lift whose top is level with the floor, rising 100 px
        let lift = Rect::new(60.0, FLOOR_TOP, 120.0, 20.0);
        state.platforms.clear();
        state.platforms.push(Platform::new(Rect::new(300.0, FLOOR_TOP, 980.0, 60.0), PlatformKind::Static));
        state.mechanisms = MechanismGraph::new(
            vec![
                Mechanism::Lever(Lever::new(lever)),
                Mechanism::Gate(Gate::new(lift, -100.0, GATE_SPEED)),
                Mechanism::Barrier(Barrier::new(Rect::new(1000.0, 0.0, 40.0, FLOOR_TOP))),
            ],
            vec![
                Wire {
                    when: Combinator::Any(vec![MechanismId(0)]),
                    effect: Effect::OpenGate(MechanismId(1)),
                },
                Wire {
                    when: Combinator::Any(vec![MechanismId(0)]),
                    effect: Effect::DisableBarrier(MechanismId(2)),
                },
            ],
        );

        // Settle the player on the lift
        run(&mut state, TickInput::default(), 2);
        assert_eq!(state.player().rect().bottom(), FLOOR_TOP);

        let pose = Frame {
            pos: lever.pos,
            facing: Facing::Right,
            vx: 0.0,
            on_ground: true,
        };
        state.adopt_echo(std::iter::once(pose).collect::<Recording>()).unwrap();

        let report = tick(&mut state, &TickInput::default());
        assert!(report.events.contains(&TickEvent::Mechanism(MechanismEvent::LeverChanged {
            id: MechanismId(0),
            activated: true
        })));
        assert_eq!(state.player().rect().bottom(), FLOOR_TOP - GATE_SPEED);
        assert!(!state.mechanisms.barrier(MechanismId(2)).unwrap().active);

        run(&mut state, TickInput::default(), 60);
        let gate = state.mechanisms.gate(MechanismId(1)).unwrap();
        assert!(gate.is_fully_open());
        assert_eq!(state.player().rect().bottom(), gate.rect.top());
        assert!(state.player().on_ground);
    }

    /// Floor to the right, a lift level with the floor on the left and an
    /// echo parked on the lift's lever
    fn lift_world() -> LevelState {
        let mut state = flat_level();
        let lever = Rect::from_bottom_left(600.0, FLOOR_TOP, Vec2::splat(LEVER_SIZE));
        state.platforms.clear();
        state.platforms.push(Platform::new(Rect::new(300.0, FLOOR_TOP, 980.0, 60.0), PlatformKind::Static));
        state.mechanisms = MechanismGraph::new(
            vec![
                Mechanism::Lever(Lever::new(lever)),
                Mechanism::Gate(Gate::new(Rect::new(60.0, FLOOR_TOP, 120.0, 20.0), -100.0, GATE_SPEED)),
            ],
            vec![Wire {
                when: Combinator::Any(vec![MechanismId(0)]),
                effect: Effect::OpenGate(MechanismId(1)),
            }],
        );
        let pose = Frame {
            pos: lever.pos,
            facing: Facing::Right,
            vx: 0.0,
            on_ground: true,
        };
        state.adopt_echo(std::iter::once(pose).collect::<Recording>()).unwrap();
        state
    }

    #[test]
    fn recorded_gate_ride_replays_exactly() {
        const TICKS: usize = 80;

        let mut first = lift_world();
        let mut gate_tops = Vec::with_capacity(TICKS);
        for _ in 0..TICKS {
            tick(&mut first, &TickInput::default());
            gate_tops.push(first.mechanisms.gate(MechanismId(1)).unwrap().rect.top());
        }
        let recording = first.player().recording().unwrap().clone();
        assert_eq!(recording.len(), TICKS);
        // Last recorded pose is where the ride actually ended
        assert_eq!(recording.frames()[TICKS - 1], first.player().frame());
        assert_eq!(first.player().rect().bottom(), gate_tops[TICKS - 1]);

        // Same world, player out of the way, ride replayed by an echo
        let mut second = lift_world();
        second.player_mut().pos = Vec2::new(800.0, FLOOR_TOP - ENTITY_HEIGHT);
        second.adopt_echo(recording.clone()).unwrap();
        for (i, expected) in recording.frames().iter().enumerate() {
            tick(&mut second, &TickInput::default());
            let rider = &second.echoes()[1];
            assert_eq!(rider.frame(), *expected, "frame {i}");
            assert_eq!(rider.rect().bottom(), gate_tops[i], "frame {i}");
        }
        assert!(second.echoes()[1].playback().unwrap().is_finished());

        // A finished echo left on the lift rides it back down
        second.entities.remove(1);
        run(&mut second, TickInput::default(), 10);
        let gate = second.mechanisms.gate(MechanismId(1)).unwrap();
        assert!(!gate.is_fully_open());
        assert_eq!(second.echoes()[0].rect().bottom(), gate.rect.top());
    }

    #[test]
    fn echo_spawned_from_nothing_is_reported_finished() {
        let mut state = flat_level();
        let spawn = TickInput {
            spawn_echo: true,
            ..Default::default()
        };
        let report = tick(&mut state, &spawn);
        // Followed by resonance switching on: the echo stands on the respawn point
        assert_eq!(
            report.events[..2],
            [TickEvent::EchoSpawned { id: 1 }, TickEvent::EchoFinished { id: 1 }]
        );
        let later = run(&mut state, TickInput::default(), 5);
        assert!(!later.iter().any(|e| matches!(e, TickEvent::EchoFinished { .. })));
    }

    #[test]
    fn determinism() {
        let mut state1 = flat_level();
        let mut state2 = flat_level();
        state1.hazards.push(Rect::new(2000.0, 0.0, 1.0, 1.0));
        state2.hazards.push(Rect::new(2000.0, 0.0, 1.0, 1.0));

        let inputs = [
            TickInput::right(),
            TickInput {
                jump: true,
                right: true,
                ..Default::default()
            },
            TickInput::left(),
            TickInput {
                spawn_echo: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for i in 0..500 {
            let input = inputs[(i * 7 + i / 13) % inputs.len()];
            let r1 = tick(&mut state1, &input);
            let r2 = tick(&mut state2, &input);
            assert_eq!(r1, r2);
        }
        assert_eq!(state1.snapshot(), state2.snapshot());
    }

    proptest! {
        #[test]
        fn recording_length_equals_ticks_since_reset(
            script in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 1..300)
        ) {
            let mut state = flat_level();
            let mut since_reset = 0usize;
            for (left, right, jump, spawn) in script {
                let input = TickInput { left, right, jump, spawn_echo: spawn, ..Default::default() };
                let report = tick(&mut state, &input);
                let spawned = report.events.iter().any(|e| matches!(e, TickEvent::EchoSpawned { .. }));
                since_reset = if spawned { 1 } else { since_reset + 1 };
                prop_assert_eq!(state.player().recording().unwrap().len(), since_reset);
                if state.status != LevelStatus::Playing {
                    break;
                }
            }
        }
    }
}

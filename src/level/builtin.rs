//! Built-in level set
//!
//! 1. Resonance tutorial: collect three crystals, a resonance bridge overhead
//! 2. Synchrony: two levers must be held at once to raise the lift
//! 3. Vertical sync: lift, spikes and two force fields

use glam::Vec2;

use super::{BarrierDesc, CombinatorDesc, EffectDesc, GateDesc, LevelDescription, LeverDesc, WireDesc};
use crate::consts::*;
use crate::sim::Rect;

/// Regular platform
const NORMAL: Vec2 = Vec2::new(200.0, 30.0);
/// Narrow platform
const SMALL: Vec2 = Vec2::new(110.0, 30.0);

fn floor() -> Rect {
    Rect::new(0.0, FLOOR_TOP, SCREEN_WIDTH, FLOOR_HEIGHT)
}

fn platform(x: f32, y: f32, size: Vec2) -> Rect {
    Rect::from_pos_size(Vec2::new(x, y), size)
}

fn crystal(center_x: f32, center_y: f32) -> Rect {
    Rect::from_center(Vec2::new(center_x, center_y), Vec2::splat(CRYSTAL_SIZE))
}

/// Portal standing on a surface at `ground_y`
fn portal(x: f32, ground_y: f32) -> Rect {
    Rect::from_bottom_left(x, ground_y, Vec2::new(PORTAL_WIDTH, PORTAL_HEIGHT))
}

/// Lever standing on a surface at `ground_y`
fn lever(name: &str, x: f32, ground_y: f32) -> LeverDesc {
    LeverDesc {
        name: name.to_string(),
        rect: Rect::from_bottom_left(x, ground_y, Vec2::splat(LEVER_SIZE)),
    }
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn level_1() -> LevelDescription {
    let p1 = platform(250.0, 550.0, NORMAL);
    let p2 = platform(600.0, 420.0, SMALL);
    let p3 = platform(820.0, 350.0, NORMAL);

    LevelDescription {
        id: 1,
        name: "Resonance".to_string(),
        spawn: Vec2::new(100.0, FLOOR_TOP - 50.0),
        respawn: Some(Vec2::new(100.0, SCREEN_HEIGHT - 150.0)),
        platforms: vec![floor(), p1, p2, p3],
        resonance_platforms: vec![platform(450.0, 250.0, Vec2::new(100.0, 20.0))],
        hazards: Vec::new(),
        // Hovering at chest height along the ground route
        crystals: vec![
            crystal(350.0, FLOOR_TOP - 30.0),
            crystal(650.0, FLOOR_TOP - 30.0),
            crystal(950.0, FLOOR_TOP - 30.0),
        ],
        portal: Some(portal(1150.0, FLOOR_TOP)),
        levers: Vec::new(),
        gates: Vec::new(),
        barriers: Vec::new(),
        wiring: Vec::new(),
        echo_cost: 0,
    }
}

pub fn level_2() -> LevelDescription {
    let ledge = platform(880.0, 280.0, Vec2::new(SCREEN_WIDTH - 880.0, 30.0));

    LevelDescription {
        id: 2,
        name: "Synchrony".to_string(),
        spawn: Vec2::new(100.0, FLOOR_TOP - 50.0),
        respawn: None,
        platforms: vec![floor(), ledge],
        resonance_platforms: Vec::new(),
        hazards: Vec::new(),
        crystals: Vec::new(),
        portal: Some(portal(1150.0, ledge.top())),
        levers: vec![lever("west", 300.0, FLOOR_TOP), lever("east", 520.0, FLOOR_TOP)],
        gates: vec![GateDesc {
            name: "lift".to_string(),
            rect: platform(720.0, 560.0, Vec2::new(140.0, 20.0)),
            move_y: -260.0,
            speed: Some(GATE_SPEED),
        }],
        barriers: Vec::new(),
        wiring: vec![WireDesc {
            when: CombinatorDesc::All(names(&["west", "east"])),
            effect: EffectDesc::OpenGate("lift".to_string()),
        }],
        echo_cost: 0,
    }
}

pub fn level_3() -> LevelDescription {
    let start = platform(50.0, 500.0, NORMAL);
    let bridge = platform(280.0, 450.0, SMALL);
    let top_left = platform(50.0, 200.0, SMALL);
    let top_right = platform(900.0, 250.0, NORMAL);
    let spike = Vec2::new(50.0, 30.0);

    LevelDescription {
        id: 3,
        name: "Vertical Sync".to_string(),
        spawn: Vec2::new(80.0, start.top() - 50.0),
        respawn: None,
        platforms: vec![floor(), start, bridge, top_left, top_right],
        resonance_platforms: Vec::new(),
        hazards: [350.0, 420.0, 490.0]
            .into_iter()
            .map(|x| Rect::from_bottom_left(x, FLOOR_TOP, spike))
            .collect(),
        crystals: vec![
            crystal(top_right.center().x, top_right.top() - 20.0),
            crystal(bridge.center().x, bridge.top() - 20.0),
        ],
        portal: Some(portal(1130.0, FLOOR_TOP)),
        levers: vec![lever("floor_right", 700.0, FLOOR_TOP), lever("top_left", 80.0, top_left.top())],
        gates: vec![GateDesc {
            name: "lift".to_string(),
            rect: platform(450.0, 450.0, Vec2::new(120.0, 20.0)),
            move_y: -250.0,
            speed: None,
        }],
        barriers: vec![
            // Cage around the upper-left lever
            BarrierDesc {
                name: "pink".to_string(),
                rect: Rect::new(40.0, 120.0, 120.0, 150.0),
            },
            // Cage around the portal
            BarrierDesc {
                name: "green".to_string(),
                rect: Rect::new(1080.0, FLOOR_TOP - 120.0, 120.0, 120.0),
            },
        ],
        wiring: vec![
            WireDesc {
                when: CombinatorDesc::Any(names(&["floor_right"])),
                effect: EffectDesc::OpenGate("lift".to_string()),
            },
            WireDesc {
                when: CombinatorDesc::Any(names(&["floor_right"])),
                effect: EffectDesc::DisableBarrier("pink".to_string()),
            },
            WireDesc {
                when: CombinatorDesc::Any(names(&["top_left"])),
                effect: EffectDesc::DisableBarrier("green".to_string()),
            },
        ],
        echo_cost: 1,
    }
}

/// Every built-in level, in play order
pub fn all() -> Vec<LevelDescription> {
    vec![level_1(), level_2(), level_3()]
}

//! Collectible rings and gate puzzles
//!
//! Rings scroll down the playfield along one of ~15 named movement paths.
//! Collecting one adjusts the player's ally count by its value; gate rings
//! multiply or halve it instead. Shooting a normal ring raises its value.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::dt_scale;

use super::bounds::Bounds;

/// What a ring does to the ally count when collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateKind {
    #[default]
    Normal,
    Multiply,
    Divide,
}

/// Result of collecting a ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collected {
    /// Add this (possibly negative) value to the ally count
    Value(i32),
    /// Double the ally count
    Multiply,
    /// Halve the ally count
    Divide,
}

/// Named movement paths, closed-form in accumulated path time except for
/// `Random` (integrates a perturbed direction) and `Chase` (tracks the player)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RingPath {
    Sine { amplitude: f32, frequency: f32 },
    Zigzag { width: f32, period: f32 },
    Spiral { radius: f32, frequency: f32 },
    Curve { strength: f32, direction: f32 },
    Weave { amplitude: f32, frequency: f32 },
    Diamond { size: f32, frequency: f32 },
    Figure8 { width: f32, height: f32, frequency: f32 },
    Bounce { amplitude: f32, period: f32 },
    Orbit { radius: f32, frequency: f32 },
    Pendulum { amplitude: f32, frequency: f32 },
    Heart { size: f32, frequency: f32 },
    Snake { amplitude: f32, frequency: f32 },
    Chase { speed: f32 },
    Random { speed: f32 },
    /// Holds a fixed offset; used by editor-authored formations
    Formation { offset_x: f32 },
}

impl Default for RingPath {
    fn default() -> Self {
        RingPath::Sine { amplitude: 60.0, frequency: 2.0 }
    }
}

/// Triangle wave in [-1, 1] starting at 0 and rising
fn triangle(t: f32, period: f32) -> f32 {
    let phase = (t / period + 0.25).fract();
    1.0 - 4.0 * (phase - 0.5).abs()
}

#[derive(Debug, Clone)]
pub struct Ring {
    pub id: u32,
    pub value: i32,
    pub gate: GateKind,
    pub path: RingPath,
    /// Accumulated path time in seconds
    pub path_time: f32,
    pub spawn_pos: Vec2,
    pub pos: Vec2,
    pub size: Vec2,
    /// Integrated lateral drift for the non-closed-form paths
    drift_x: f32,
    /// Stored direction for the `Random` path
    random_dir: f32,
    /// Accumulated downward scroll
    scrolled: f32,
    pub active: bool,
}

impl Ring {
    pub fn new(id: u32, pos: Vec2, value: i32, gate: GateKind, path: RingPath) -> Self {
        // Multiplier gates carry no additive value, ever
        let value = match gate {
            GateKind::Normal => value.clamp(RING_VALUE_MIN, RING_VALUE_MAX),
            GateKind::Multiply | GateKind::Divide => 0,
        };
        Self {
            id,
            value,
            gate,
            path,
            path_time: 0.0,
            spawn_pos: pos,
            pos,
            size: Vec2::new(44.0, 44.0),
            drift_x: 0.0,
            random_dir: 1.0,
            scrolled: 0.0,
            active: true,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.size)
    }

    /// Advance one frame along the movement path
    pub fn update<R: Rng>(&mut self, dt_ms: f32, player_x: f32, rng: &mut R) {
        if !self.active {
            return;
        }
        let s = dt_scale(dt_ms);
        self.path_time += dt_ms / 1000.0;
        self.scrolled += SCROLL_SPEED * s;

        let t = self.path_time;
        let mut dy = 0.0;
        let dx = match self.path {
            RingPath::Sine { amplitude, frequency } => amplitude * (t * frequency).sin(),
            RingPath::Zigzag { width, period } => width * triangle(t, period),
            RingPath::Spiral { radius, frequency } => {
                let r = radius * (1.0 + t * 0.1);
                dy = r * (t * frequency).sin() * 0.4;
                r * (t * frequency).cos()
            }
            RingPath::Curve { strength, direction } => direction * strength * t * t,
            RingPath::Weave { amplitude, frequency } => {
                amplitude * (t * frequency).sin() + amplitude * 0.5 * (t * frequency * 0.5).sin()
            }
            RingPath::Diamond { size, frequency } => {
                let a = t * frequency;
                let (sin, cos) = a.sin_cos();
                let norm = cos.abs() + sin.abs();
                dy = size * sin / norm.max(0.001) * 0.5;
                size * cos / norm.max(0.001)
            }
            RingPath::Figure8 { width, height, frequency } => {
                dy = height * (t * frequency * 2.0).sin() * 0.5;
                width * (t * frequency).sin()
            }
            RingPath::Bounce { amplitude, period } => amplitude * triangle(t, period),
            RingPath::Orbit { radius, frequency } => {
                dy = radius * (t * frequency).sin();
                radius * (t * frequency).cos()
            }
            RingPath::Pendulum { amplitude, frequency } => {
                // dwells at the extremes like a real swing
                amplitude * ((t * frequency).sin() * std::f32::consts::FRAC_PI_2).sin()
            }
            RingPath::Heart { size, frequency } => {
                let a = t * frequency;
                let x = a.sin().powi(3);
                dy = -(13.0 * a.cos()
                    - 5.0 * (2.0 * a).cos()
                    - 2.0 * (3.0 * a).cos()
                    - (4.0 * a).cos())
                    * size
                    / 16.0;
                size * x
            }
            RingPath::Snake { amplitude, frequency } => {
                amplitude * (t * frequency).sin() + amplitude * 0.4 * (t * frequency * 2.3).sin()
            }
            RingPath::Chase { speed } => {
                let delta = player_x - self.pos.x;
                self.drift_x += delta.signum() * speed.min(delta.abs()) * s;
                0.0
            }
            RingPath::Random { speed } => {
                // small chance per tick to pick a new direction
                if rng.random::<f32>() < 0.05 * s {
                    self.random_dir = rng.random_range(-1.0_f32..1.0);
                }
                self.drift_x += self.random_dir * speed * s;
                0.0
            }
            RingPath::Formation { offset_x } => offset_x,
        };

        self.pos.x = (self.spawn_pos.x + dx + self.drift_x)
            .clamp(RING_EDGE_MARGIN, PLAYFIELD_WIDTH - RING_EDGE_MARGIN);
        self.pos.y = self.spawn_pos.y + self.scrolled + dy;

        if self.pos.y > PLAYFIELD_HEIGHT + BOTTOM_MARGIN {
            self.active = false;
        }
    }

    /// Raise the ring's value by one, up to `cap`. Gate rings are immune and
    /// always return false.
    pub fn increase_value(&mut self, cap: i32) -> bool {
        if self.gate != GateKind::Normal {
            return false;
        }
        if self.value >= cap {
            return false;
        }
        self.value += 1;
        true
    }

    /// Collect the ring: deactivates it and reports the effect
    pub fn collect(&mut self) -> Collected {
        self.active = false;
        match self.gate {
            GateKind::Normal => Collected::Value(self.value),
            GateKind::Multiply => Collected::Multiply,
            GateKind::Divide => Collected::Divide,
        }
    }
}

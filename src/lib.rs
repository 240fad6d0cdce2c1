//! Skyrush - vertically-scrolling arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawner, collision, world tick)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Entities this far past the bottom edge are despawned
    pub const BOTTOM_MARGIN: f32 = 50.0;
    /// Horizontal clamp margin for ring path movement
    pub const RING_EDGE_MARGIN: f32 = 30.0;

    /// Reference tick the simulation is normalized to (milliseconds).
    /// All per-tick rates are expressed at this timestep.
    pub const TICK_MS: f32 = 16.0;

    /// Number of vertical lanes for buses and lane walls
    pub const LANE_COUNT: usize = 3;

    /// Y threshold where a bus stops approaching and telegraphs its charge
    pub const BUS_TELEGRAPH_Y: f32 = 150.0;
    /// How long a bus telegraphs before charging (ms)
    pub const BUS_TELEGRAPH_MS: f32 = 800.0;
    /// Downward speed while charging (per reference tick)
    pub const BUS_CHARGE_SPEED: f32 = 12.0;

    /// Default enemy entry animation length (ms)
    pub const ENTRY_DURATION_MS: f32 = 1000.0;
    /// Y position enemies settle at when no explicit target is given
    pub const ENTRY_TARGET_Y: f32 = 120.0;

    /// Pushable wall friction: velocity multiplier per reference tick
    pub const WALL_PUSH_DECAY: f32 = 0.995;
    /// Push velocity below this snaps to exactly zero
    pub const WALL_PUSH_EPSILON: f32 = 0.1;
    /// Upward velocity applied when a hit-counter wall triggers
    pub const WALL_TRIGGER_PUSH: f32 = 8.0;
    /// Impulse a pushable wall receives from one blocked bullet
    pub const WALL_BULLET_PUSH: f32 = 0.6;

    /// Ring value clamp range for normal rings
    pub const RING_VALUE_MIN: i32 = -99;
    pub const RING_VALUE_MAX: i32 = 99;

    /// Base downward scroll speed shared by rings and walls (per reference tick)
    pub const SCROLL_SPEED: f32 = 2.0;
}

/// Center x of a lane, lanes numbered left to right
#[inline]
pub fn lane_center_x(lane: usize) -> f32 {
    let lane_width = consts::PLAYFIELD_WIDTH / consts::LANE_COUNT as f32;
    lane_width * (lane as f32 + 0.5)
}

/// Normalize a frame delta to multiples of the reference tick
#[inline]
pub fn dt_scale(dt_ms: f32) -> f32 {
    dt_ms / consts::TICK_MS
}

/// Ease-out cubic used by enemy entry animations
#[inline]
pub fn ease_out_cubic(p: f32) -> f32 {
    let q = 1.0 - p.clamp(0.0, 1.0);
    1.0 - q * q * q
}

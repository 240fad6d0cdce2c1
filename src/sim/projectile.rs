//! Bullet-like projectiles
//!
//! Player shots, enemy shots, aimed shots, and slow-falling bombs share one
//! record; ownership and kind drive how the collision resolver treats them.

use glam::Vec2;

use crate::consts::*;
use crate::dt_scale;

use super::bounds::Bounds;

/// Velocities below this distance cannot be normalized toward a target
const AIM_EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Travels along its initial velocity
    Straight,
    /// Straight flight, but the velocity was aimed at the player when fired
    Aimed,
    /// Slow-falling explosive dropped by bombers
    Bomb,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Displacement per reference tick
    pub vel: Vec2,
    pub size: Vec2,
    pub from_player: bool,
    pub damage: f32,
    pub kind: ProjectileKind,
    /// Ring ids already credited by this projectile during its flight.
    /// A bullet passes through rings, so without this it would credit the
    /// same ring every frame it overlaps.
    pub hit_rings: Vec<u32>,
    pub active: bool,
}

impl Projectile {
    /// A straight shot; `vel` is per reference tick, negative y is up
    pub fn straight(id: u32, pos: Vec2, vel: Vec2, from_player: bool, damage: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            size: Vec2::new(6.0, 12.0),
            from_player,
            damage,
            kind: ProjectileKind::Straight,
            hit_rings: Vec::new(),
            active: true,
        }
    }

    /// An enemy shot aimed at the player's last known position.
    ///
    /// Zero-distance targets are guarded: a degenerate direction would put
    /// NaN into the velocity, so the shot falls straight down instead.
    pub fn aimed(id: u32, pos: Vec2, target: Vec2, speed: f32, damage: f32) -> Self {
        let delta = target - pos;
        let dir = if delta.length_squared() < AIM_EPSILON {
            Vec2::new(0.0, 1.0)
        } else {
            delta.normalize()
        };
        Self {
            id,
            pos,
            vel: dir * speed,
            size: Vec2::new(8.0, 8.0),
            from_player: false,
            damage,
            kind: ProjectileKind::Aimed,
            hit_rings: Vec::new(),
            active: true,
        }
    }

    /// A slow-falling bomb dropped by bomber enemies
    pub fn bomb(id: u32, pos: Vec2, damage: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, 1.2),
            size: Vec2::new(14.0, 14.0),
            from_player: false,
            damage,
            kind: ProjectileKind::Bomb,
            hit_rings: Vec::new(),
            active: true,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.size)
    }

    /// Advance one frame; deactivates once fully off the playfield
    pub fn update(&mut self, dt_ms: f32) {
        if !self.active {
            return;
        }
        let s = dt_scale(dt_ms);
        self.pos += self.vel * s;

        if self.pos.y < -BOTTOM_MARGIN
            || self.pos.y > PLAYFIELD_HEIGHT + BOTTOM_MARGIN
            || self.pos.x < -BOTTOM_MARGIN
            || self.pos.x > PLAYFIELD_WIDTH + BOTTOM_MARGIN
        {
            self.active = false;
        }
    }

    /// Whether this projectile already credited the given ring
    pub fn has_hit_ring(&self, ring_id: u32) -> bool {
        self.hit_rings.contains(&ring_id)
    }

    /// Record a ring credit so it is never repeated for this flight
    pub fn mark_ring_hit(&mut self, ring_id: u32) {
        if !self.has_hit_ring(ring_id) {
            self.hit_rings.push(ring_id);
        }
    }
}

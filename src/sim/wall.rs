//! Lane walls and their capability table
//!
//! Wall behavior is data-driven: each kind maps to an immutable record of
//! capability flags rather than a subclass. The interesting motion case is
//! pushable walls, which decay their upward velocity geometrically and stack
//! flush against blockers instead of overlapping them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{dt_scale, lane_center_x};

use super::bounds::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WallKind {
    /// Blocks everything, indestructible
    #[default]
    Solid,
    /// Blocks everything but can be shot down
    Breakable,
    /// Pushable freight; player bullets shove it upward
    Cargo,
    /// Boost track segment; blocks nothing
    BoostPad,
    /// Push gate that launches upward once shot enough times
    Crate,
    /// Mesh that stops enemy fire but lets everything else through
    Net,
    /// Hazard that only the player collides with; bullets pass through
    Spikes,
}

/// Immutable per-kind capability flags
#[derive(Debug, Clone, Copy)]
pub struct WallCaps {
    pub blocks_player_bullets: bool,
    pub blocks_enemy_bullets: bool,
    pub blocks_player: bool,
    pub blocks_enemies: bool,
    pub destructible: bool,
    pub pushable: bool,
    pub boosts: bool,
    pub hit_counter: bool,
}

const SOLID_CAPS: WallCaps = WallCaps {
    blocks_player_bullets: true,
    blocks_enemy_bullets: true,
    blocks_player: true,
    blocks_enemies: true,
    destructible: false,
    pushable: false,
    boosts: false,
    hit_counter: false,
};

const BREAKABLE_CAPS: WallCaps = WallCaps {
    blocks_player_bullets: true,
    blocks_enemy_bullets: true,
    blocks_player: true,
    blocks_enemies: true,
    destructible: true,
    pushable: false,
    boosts: false,
    hit_counter: false,
};

const CARGO_CAPS: WallCaps = WallCaps {
    blocks_player_bullets: true,
    blocks_enemy_bullets: false,
    blocks_player: true,
    blocks_enemies: false,
    destructible: false,
    pushable: true,
    boosts: false,
    hit_counter: false,
};

const BOOST_PAD_CAPS: WallCaps = WallCaps {
    blocks_player_bullets: false,
    blocks_enemy_bullets: false,
    blocks_player: false,
    blocks_enemies: false,
    destructible: false,
    pushable: false,
    boosts: true,
    hit_counter: false,
};

const CRATE_CAPS: WallCaps = WallCaps {
    blocks_player_bullets: true,
    blocks_enemy_bullets: true,
    blocks_player: true,
    blocks_enemies: false,
    destructible: false,
    pushable: true,
    boosts: false,
    hit_counter: true,
};

const NET_CAPS: WallCaps = WallCaps {
    blocks_player_bullets: false,
    blocks_enemy_bullets: true,
    blocks_player: false,
    blocks_enemies: false,
    destructible: false,
    pushable: false,
    boosts: false,
    hit_counter: false,
};

const SPIKES_CAPS: WallCaps = WallCaps {
    blocks_player_bullets: false,
    blocks_enemy_bullets: false,
    blocks_player: true,
    blocks_enemies: false,
    destructible: false,
    pushable: false,
    boosts: false,
    hit_counter: false,
};

impl WallKind {
    pub fn caps(self) -> &'static WallCaps {
        match self {
            WallKind::Solid => &SOLID_CAPS,
            WallKind::Breakable => &BREAKABLE_CAPS,
            WallKind::Cargo => &CARGO_CAPS,
            WallKind::BoostPad => &BOOST_PAD_CAPS,
            WallKind::Crate => &CRATE_CAPS,
            WallKind::Net => &NET_CAPS,
            WallKind::Spikes => &SPIKES_CAPS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wall {
    pub id: u32,
    pub kind: WallKind,
    pub lane: usize,
    pub pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Upward velocity from pushes, per reference tick
    pub push_velocity: f32,
    pub hit_count: u32,
    pub hits_required: u32,
    /// Hit-counter walls flip this once and start moving
    pub triggered: bool,
    pub active: bool,
}

impl Wall {
    /// Spawn a wall at the top of the given lane
    pub fn new(id: u32, kind: WallKind, lane: usize) -> Self {
        Self::at(id, kind, lane, Vec2::new(lane_center_x(lane), -30.0))
    }

    /// Spawn a wall at an explicit position (editor/scripted spawns)
    pub fn at(id: u32, kind: WallKind, lane: usize, pos: Vec2) -> Self {
        let lane_width = PLAYFIELD_WIDTH / LANE_COUNT as f32;
        let (size, health, hits_required) = match kind {
            WallKind::Solid => (Vec2::new(lane_width, 40.0), f32::INFINITY, 0),
            WallKind::Breakable => (Vec2::new(lane_width, 40.0), 5.0, 0),
            WallKind::Cargo => (Vec2::new(lane_width * 0.8, 60.0), f32::INFINITY, 0),
            WallKind::BoostPad => (Vec2::new(lane_width * 0.6, 80.0), f32::INFINITY, 0),
            WallKind::Crate => (Vec2::new(lane_width * 0.7, 50.0), f32::INFINITY, 10),
            WallKind::Net => (Vec2::new(lane_width, 24.0), f32::INFINITY, 0),
            WallKind::Spikes => (Vec2::new(lane_width, 30.0), f32::INFINITY, 0),
        };
        Self {
            id,
            kind,
            lane,
            pos,
            size,
            health,
            max_health: health,
            push_velocity: 0.0,
            hit_count: 0,
            hits_required,
            triggered: false,
            active: true,
        }
    }

    pub fn with_hits_required(mut self, hits: u32) -> Self {
        self.hits_required = hits;
        self
    }

    pub fn caps(&self) -> &'static WallCaps {
        self.kind.caps()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.size)
    }

    /// Whether the wall is currently being shoved upward
    pub fn moving_up(&self) -> bool {
        self.push_velocity > 0.0
    }

    /// Advance one frame: trigger check, push integration and decay, scroll
    pub fn update(&mut self, dt_ms: f32) {
        if !self.active {
            return;
        }
        let s = dt_scale(dt_ms);

        // Hit-counter walls launch themselves once the threshold is met
        if self.caps().hit_counter && !self.triggered && self.hit_count >= self.hits_required {
            self.triggered = true;
            self.push_velocity += WALL_TRIGGER_PUSH;
        }

        if self.push_velocity > 0.0 {
            self.pos.y -= self.push_velocity * s;
            // geometric friction, floored to exactly zero near rest
            self.push_velocity *= WALL_PUSH_DECAY.powf(s);
            if self.push_velocity < WALL_PUSH_EPSILON {
                self.push_velocity = 0.0;
            }
            // active push slows the downward drift
            let push_ratio = (self.push_velocity / WALL_TRIGGER_PUSH).min(1.0);
            self.pos.y += SCROLL_SPEED * (1.0 - push_ratio) * s;
        } else {
            self.pos.y += SCROLL_SPEED * s;
        }

        // Pushed off the top, or scrolled off the bottom
        if self.bounds().bottom() < -BOTTOM_MARGIN
            || self.pos.y > PLAYFIELD_HEIGHT + BOTTOM_MARGIN
        {
            self.active = false;
        }
    }

    /// Damage the wall. Only destructible kinds are affected; returns whether
    /// the wall was destroyed by this hit.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.caps().destructible {
            return false;
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Shove the wall upward. Only pushable kinds respond; force is additive.
    pub fn push(&mut self, force: f32) {
        if self.caps().pushable {
            self.push_velocity += force;
        }
    }

    /// Count a bullet hit toward the trigger threshold. Only hit-counter
    /// walls before their trigger respond; returns whether the threshold was
    /// just reached.
    pub fn register_bullet_hit(&mut self) -> bool {
        if !self.caps().hit_counter || self.triggered {
            return false;
        }
        self.hit_count += 1;
        self.hit_count == self.hits_required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakable_five_hits() {
        let mut wall = Wall::new(1, WallKind::Breakable, 0);
        assert_eq!(wall.max_health, 5.0);
        let mut prev = wall.health;
        for _ in 0..4 {
            assert!(!wall.take_damage(1.0));
            assert!(wall.health < prev);
            prev = wall.health;
        }
        assert!(wall.take_damage(1.0));
        assert!(!wall.active);
    }

    #[test]
    fn test_indestructible_ignores_damage() {
        let mut wall = Wall::new(1, WallKind::Solid, 0);
        assert!(!wall.take_damage(1000.0));
        assert!(wall.active);
    }

    #[test]
    fn test_push_decay_law() {
        let mut wall = Wall::new(1, WallKind::Cargo, 1);
        wall.push(5.0);
        // one reference tick of decay at a time; re-center each tick so the
        // wall never leaves the field and deactivates mid-measurement
        for n in 1..=100 {
            wall.pos.y = 400.0;
            wall.update(TICK_MS);
            assert!(wall.active);
            let expected = 5.0 * WALL_PUSH_DECAY.powi(n);
            if expected < WALL_PUSH_EPSILON {
                assert_eq!(wall.push_velocity, 0.0);
            } else {
                assert!((wall.push_velocity - expected).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_push_only_affects_pushable() {
        let mut wall = Wall::new(1, WallKind::Solid, 0);
        wall.push(5.0);
        assert_eq!(wall.push_velocity, 0.0);
    }

    #[test]
    fn test_hit_counter_trigger() {
        let mut wall = Wall::new(1, WallKind::Crate, 2).with_hits_required(3);
        assert!(!wall.register_bullet_hit());
        assert!(!wall.register_bullet_hit());
        assert!(wall.register_bullet_hit()); // threshold just reached
        wall.update(TICK_MS);
        assert!(wall.triggered);
        assert!(wall.push_velocity > 0.0);
        // further hits after trigger are ignored
        assert!(!wall.register_bullet_hit());
        assert_eq!(wall.hit_count, 3);
    }

    #[test]
    fn test_pushed_wall_moves_up() {
        let mut wall = Wall::at(1, WallKind::Cargo, 1, Vec2::new(240.0, 400.0));
        wall.push(6.0);
        let y0 = wall.pos.y;
        wall.update(TICK_MS);
        assert!(wall.pos.y < y0);
    }

    #[test]
    fn test_unpushed_wall_scrolls_down() {
        let mut wall = Wall::at(1, WallKind::Solid, 1, Vec2::new(240.0, 400.0));
        let y0 = wall.pos.y;
        wall.update(TICK_MS);
        assert!(wall.pos.y > y0);
    }

    #[test]
    fn test_scrolls_off_bottom_deactivates() {
        let mut wall = Wall::at(1, WallKind::Solid, 1, Vec2::new(240.0, PLAYFIELD_HEIGHT + 40.0));
        for _ in 0..20 {
            wall.update(TICK_MS);
        }
        assert!(!wall.active);
    }
}

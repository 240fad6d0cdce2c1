//! Enemy entities and their behavior state machines
//!
//! Every enemy runs the same three-phase life: a scripted entry animation
//! from off-screen, a kind-specific steady state (movement + attack policy),
//! then deactivation by death or by leaving the playfield. Buses additionally
//! run a lane-locked approach/telegraph/charge machine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{dt_scale, ease_out_cubic, lane_center_x};

use super::bounds::Bounds;
use super::projectile::Projectile;
use super::world::IdAlloc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Basic,
    /// Fast, fragile, steers into the player; never fires
    Swarm,
    /// Slow oscillator with aimed shots
    Sniper,
    /// Wide-sweeping mothership that spawns swarm children
    Carrier,
    /// Basic attacker behind a damage-absorbing shield
    Shield,
    /// Lane-locked charger
    Bus,
    /// Drops slow-falling bombs
    Bomber,
    /// Very fast straight rusher; never fires
    Ram,
    /// Scripted-timeline heavy
    Boss,
}

/// What an enemy does on its attack tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPolicy {
    /// Straight-down shot on the fire-rate cooldown
    Straight,
    /// Shot aimed at the player's last known position
    Aimed,
    /// Slow-falling bomb on a long cooldown
    Bomb,
    /// Periodically spawns two flanking children
    SpawnChildren,
    /// Kamikaze/ram/charge kinds never fire
    Passive,
}

/// Entry animation shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntryPath {
    #[default]
    Straight,
    /// Sine lateral offset, signed by which screen half the enemy entered on
    Swoop,
    /// Decaying-radius rotating offset
    Spiral,
    /// Decaying sine
    Zigzag,
}

/// Bus sub-state; transitions are one-way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusPhase {
    Approach,
    Telegraph,
    Charging,
}

struct KindStats {
    health: f32,
    shield: f32,
    speed: f32,
    fire_rate_ms: f32,
    bullet_damage: f32,
    gold: u32,
    score: u32,
    size: Vec2,
    policy: AttackPolicy,
}

fn stats(kind: EnemyKind) -> KindStats {
    use AttackPolicy::*;
    match kind {
        EnemyKind::Basic => KindStats {
            health: 3.0, shield: 0.0, speed: 1.5, fire_rate_ms: 1500.0,
            bullet_damage: 1.0, gold: 5, score: 10,
            size: Vec2::new(36.0, 36.0), policy: Straight,
        },
        EnemyKind::Swarm => KindStats {
            health: 1.0, shield: 0.0, speed: 2.5, fire_rate_ms: 0.0,
            bullet_damage: 1.0, gold: 2, score: 5,
            size: Vec2::new(26.0, 26.0), policy: Passive,
        },
        EnemyKind::Sniper => KindStats {
            health: 2.0, shield: 0.0, speed: 1.2, fire_rate_ms: 2200.0,
            bullet_damage: 1.0, gold: 8, score: 15,
            size: Vec2::new(34.0, 34.0), policy: Aimed,
        },
        EnemyKind::Carrier => KindStats {
            health: 12.0, shield: 0.0, speed: 0.8, fire_rate_ms: 0.0,
            bullet_damage: 1.0, gold: 20, score: 40,
            size: Vec2::new(64.0, 44.0), policy: SpawnChildren,
        },
        EnemyKind::Shield => KindStats {
            health: 4.0, shield: 6.0, speed: 1.2, fire_rate_ms: 1800.0,
            bullet_damage: 1.0, gold: 12, score: 25,
            size: Vec2::new(40.0, 40.0), policy: Straight,
        },
        EnemyKind::Bus => KindStats {
            health: 10.0, shield: 0.0, speed: 2.0, fire_rate_ms: 0.0,
            bullet_damage: 2.0, gold: 15, score: 30,
            size: Vec2::new(72.0, 48.0), policy: Passive,
        },
        EnemyKind::Bomber => KindStats {
            health: 3.0, shield: 0.0, speed: 1.0, fire_rate_ms: 2500.0,
            bullet_damage: 2.0, gold: 10, score: 20,
            size: Vec2::new(40.0, 36.0), policy: Bomb,
        },
        EnemyKind::Ram => KindStats {
            health: 2.0, shield: 0.0, speed: 3.5, fire_rate_ms: 0.0,
            bullet_damage: 1.0, gold: 6, score: 12,
            size: Vec2::new(30.0, 30.0), policy: Passive,
        },
        EnemyKind::Boss => KindStats {
            health: 200.0, shield: 0.0, speed: 0.5, fire_rate_ms: 1200.0,
            bullet_damage: 2.0, gold: 100, score: 500,
            size: Vec2::new(110.0, 80.0), policy: Aimed,
        },
    }
}

/// Carrier spawns two children every this often (ms)
const CARRIER_SPAWN_MS: f32 = 4000.0;
/// Horizontal offset of carrier children from the carrier
const CARRIER_CHILD_OFFSET: f32 = 44.0;
/// Lateral steering speed of swarm enemies, per reference tick
const SWARM_STEER: f32 = 1.8;
/// Enemy bullet speeds, per reference tick
const SHOT_SPEED: f32 = 7.0;
const AIMED_SHOT_SPEED: f32 = 6.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Anchor x for oscillating movement
    pub base_x: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub shield_health: f32,
    pub fire_rate_ms: f32,
    pub bullet_damage: f32,
    pub gold: u32,
    pub score: u32,
    pub policy: AttackPolicy,
    pub elite: bool,

    // Entry animation
    pub entering: bool,
    pub entry_path: EntryPath,
    entry_elapsed: f32,
    entry_duration: f32,
    entry_start: Vec2,
    pub entry_target: Vec2,

    // Steady-state movement
    move_phase: f32,

    // Attack timers (elapsed-time accumulators, never wall clock)
    fire_elapsed: f32,
    spawn_elapsed: f32,

    // Bus lane machine
    pub lane: Option<usize>,
    pub bus_phase: BusPhase,
    telegraph_elapsed: f32,

    /// Render-only hit flash countdown (ms)
    pub flash_ms: f32,
    pub active: bool,
}

impl Enemy {
    /// Spawn at (x, y); the entry animation carries the enemy to
    /// (x, ENTRY_TARGET_Y) unless an explicit target is set
    pub fn new(id: u32, kind: EnemyKind, x: f32, y: f32) -> Self {
        let st = stats(kind);
        let start = Vec2::new(x, y);
        let mut enemy = Self {
            id,
            kind,
            pos: start,
            size: st.size,
            base_x: x,
            speed: st.speed,
            health: st.health,
            max_health: st.health,
            shield_health: st.shield,
            fire_rate_ms: st.fire_rate_ms,
            bullet_damage: st.bullet_damage,
            gold: st.gold,
            score: st.score,
            policy: st.policy,
            elite: false,
            entering: true,
            entry_path: EntryPath::Straight,
            entry_elapsed: 0.0,
            entry_duration: ENTRY_DURATION_MS,
            entry_start: start,
            entry_target: Vec2::new(x, ENTRY_TARGET_Y),
            move_phase: 0.0,
            fire_elapsed: 0.0,
            spawn_elapsed: 0.0,
            lane: None,
            bus_phase: BusPhase::Approach,
            telegraph_elapsed: 0.0,
            flash_ms: 0.0,
            active: true,
        };
        if kind == EnemyKind::Bus {
            // Buses drive straight in; no scripted entry
            enemy.entering = false;
        }
        enemy
    }

    /// Spawn a bus locked to a lane, just above the playfield
    pub fn bus(id: u32, lane: usize) -> Self {
        let x = lane_center_x(lane);
        let mut enemy = Self::new(id, EnemyKind::Bus, x, -60.0);
        enemy.lane = Some(lane);
        enemy
    }

    /// Override the entry animation (used by formations and wave definitions)
    pub fn with_entry(mut self, target: Vec2, path: EntryPath, duration_ms: f32) -> Self {
        self.entry_target = target;
        self.base_x = target.x;
        self.entry_path = path;
        self.entry_duration = duration_ms.max(1.0);
        self
    }

    /// Apply endless-mode scaling multipliers
    pub fn scaled(mut self, health: f32, speed: f32, damage: f32, reward: f32) -> Self {
        self.health = (self.health * health).ceil();
        self.max_health = self.health;
        self.shield_health = (self.shield_health * health).ceil();
        self.speed *= speed;
        self.bullet_damage *= damage;
        self.gold = (self.gold as f32 * reward).round() as u32;
        self.score = (self.score as f32 * reward).round() as u32;
        self
    }

    /// Promote to elite: tougher, harder hitting, better rewards
    pub fn promote_elite(mut self, health_mult: f32, damage_mult: f32, reward_mult: f32) -> Self {
        self.elite = true;
        self.health = (self.health * health_mult).ceil();
        self.max_health = self.health;
        self.bullet_damage *= damage_mult;
        self.gold = (self.gold as f32 * reward_mult).round() as u32;
        self.score = (self.score as f32 * reward_mult).round() as u32;
        self
    }

    /// Boss with explicit health (assault-mode escalation)
    pub fn boss_with_health(id: u32, x: f32, health: f32) -> Self {
        let mut enemy = Self::new(id, EnemyKind::Boss, x, -100.0);
        enemy.health = health;
        enemy.max_health = health;
        enemy
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.size)
    }

    /// Whether the enemy has crossed into view. Off-screen enemies are both
    /// invulnerable and forbidden from attacking.
    pub fn on_screen(&self) -> bool {
        self.pos.y - self.size.y / 2.0 > 0.0
    }

    /// Advance one frame. New projectiles go to `shots`; carrier children go
    /// to `children` and join the enemy list after this update pass.
    pub fn update(
        &mut self,
        dt_ms: f32,
        player_pos: Vec2,
        ids: &mut IdAlloc,
        shots: &mut Vec<Projectile>,
        children: &mut Vec<Enemy>,
    ) {
        if !self.active {
            return;
        }
        let s = dt_scale(dt_ms);

        if self.flash_ms > 0.0 {
            self.flash_ms = (self.flash_ms - dt_ms).max(0.0);
        }

        if self.entering {
            self.step_entry(dt_ms);
            return;
        }

        if self.kind == EnemyKind::Bus {
            self.step_bus(dt_ms, s);
        } else {
            self.step_movement(player_pos, s);
            self.step_attack(dt_ms, player_pos, ids, shots, children);
        }

        if self.pos.y - self.size.y / 2.0 > PLAYFIELD_HEIGHT + BOTTOM_MARGIN {
            self.active = false;
        }
    }

    fn step_entry(&mut self, dt_ms: f32) {
        self.entry_elapsed += dt_ms;
        if self.entry_elapsed >= self.entry_duration {
            // exact snap, no residual path offset
            self.pos = self.entry_target;
            self.entering = false;
            return;
        }
        let p = self.entry_elapsed / self.entry_duration;
        let eased = ease_out_cubic(p);
        let base = self.entry_start.lerp(self.entry_target, eased);

        use std::f32::consts::PI;
        let offset = match self.entry_path {
            EntryPath::Straight => Vec2::ZERO,
            EntryPath::Swoop => {
                let sign = if self.entry_start.x < PLAYFIELD_WIDTH / 2.0 { 1.0 } else { -1.0 };
                Vec2::new(sign * 80.0 * (p * PI).sin(), 0.0)
            }
            EntryPath::Spiral => {
                let r = 60.0 * (1.0 - p);
                let a = p * 4.0 * PI;
                Vec2::new(r * a.cos(), r * a.sin())
            }
            EntryPath::Zigzag => Vec2::new(60.0 * (1.0 - p) * (p * 6.0 * PI).sin(), 0.0),
        };
        self.pos = base + offset;
    }

    fn step_movement(&mut self, player_pos: Vec2, s: f32) {
        match self.kind {
            EnemyKind::Swarm => {
                let delta = player_pos.x - self.pos.x;
                self.pos.x += delta.clamp(-SWARM_STEER * s, SWARM_STEER * s);
            }
            EnemyKind::Carrier => {
                self.move_phase += 0.02 * s;
                let sweep = PLAYFIELD_WIDTH / 2.0 - self.size.x / 2.0;
                self.pos.x = PLAYFIELD_WIDTH / 2.0 + self.move_phase.sin() * sweep;
            }
            _ => {
                self.move_phase += 0.05 * s;
                self.pos.x = self.base_x + self.move_phase.sin() * 40.0;
            }
        }
        // keep the full sprite on-screen
        let half = self.size.x / 2.0;
        self.pos.x = self.pos.x.clamp(half, PLAYFIELD_WIDTH - half);

        self.pos.y += self.speed * s;
    }

    fn step_attack(
        &mut self,
        dt_ms: f32,
        player_pos: Vec2,
        ids: &mut IdAlloc,
        shots: &mut Vec<Projectile>,
        children: &mut Vec<Enemy>,
    ) {
        // attacks only from on-screen enemies above the player
        if !self.on_screen() || self.pos.y >= player_pos.y {
            return;
        }

        match self.policy {
            AttackPolicy::Passive => {}
            AttackPolicy::Bomb => {
                self.fire_elapsed += dt_ms;
                if self.fire_elapsed >= self.fire_rate_ms {
                    self.fire_elapsed = 0.0;
                    shots.push(Projectile::bomb(ids.next(), self.pos, self.bullet_damage));
                }
            }
            AttackPolicy::Aimed => {
                self.fire_elapsed += dt_ms;
                if self.fire_elapsed >= self.fire_rate_ms {
                    self.fire_elapsed = 0.0;
                    shots.push(Projectile::aimed(
                        ids.next(),
                        self.pos,
                        player_pos,
                        AIMED_SHOT_SPEED,
                        self.bullet_damage,
                    ));
                }
            }
            AttackPolicy::SpawnChildren => {
                self.spawn_elapsed += dt_ms;
                if self.spawn_elapsed >= CARRIER_SPAWN_MS {
                    self.spawn_elapsed = 0.0;
                    for side in [-1.0, 1.0] {
                        let x = self.pos.x + side * CARRIER_CHILD_OFFSET;
                        let mut child = Enemy::new(ids.next(), EnemyKind::Swarm, x, self.pos.y);
                        // children pop out in place rather than replaying an entry
                        child.entering = false;
                        children.push(child);
                    }
                }
            }
            AttackPolicy::Straight => {
                self.fire_elapsed += dt_ms;
                if self.fire_elapsed >= self.fire_rate_ms {
                    self.fire_elapsed = 0.0;
                    shots.push(Projectile::straight(
                        ids.next(),
                        self.pos,
                        Vec2::new(0.0, SHOT_SPEED),
                        false,
                        self.bullet_damage,
                    ));
                }
            }
        }
    }

    fn step_bus(&mut self, dt_ms: f32, s: f32) {
        match self.bus_phase {
            BusPhase::Approach => {
                self.pos.y += self.speed * s;
                if self.pos.y >= BUS_TELEGRAPH_Y {
                    self.bus_phase = BusPhase::Telegraph;
                    self.telegraph_elapsed = 0.0;
                    // flashing while telegraphing
                    self.flash_ms = BUS_TELEGRAPH_MS;
                }
            }
            BusPhase::Telegraph => {
                self.telegraph_elapsed += dt_ms;
                if self.telegraph_elapsed >= BUS_TELEGRAPH_MS {
                    self.bus_phase = BusPhase::Charging;
                }
            }
            BusPhase::Charging => {
                self.pos.y += BUS_CHARGE_SPEED * s;
            }
        }
    }

    /// Apply damage. Off-screen enemies are invulnerable. Shield enemies
    /// deplete their shield first; overflow spills 1:1 onto health. Returns
    /// whether this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.active || !self.on_screen() {
            return false;
        }

        let mut remaining = amount;
        if self.shield_health > 0.0 {
            if remaining < self.shield_health {
                self.shield_health -= remaining;
                self.flash_ms = 100.0;
                return false;
            }
            remaining -= self.shield_health;
            self.shield_health = 0.0;
        }

        self.health -= remaining;
        if self.health <= 0.0 {
            self.active = false;
            return true;
        }
        self.flash_ms = 100.0;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::IdAlloc;

    fn run_entry(enemy: &mut Enemy) {
        let mut ids = IdAlloc::default();
        let mut shots = Vec::new();
        let mut children = Vec::new();
        for _ in 0..200 {
            if !enemy.entering {
                break;
            }
            enemy.update(16.0, Vec2::new(240.0, 700.0), &mut ids, &mut shots, &mut children);
        }
    }

    #[test]
    fn test_entry_snaps_exactly_to_target() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, 100.0, -50.0);
        run_entry(&mut enemy);
        assert!(!enemy.entering);
        assert_eq!(enemy.pos, Vec2::new(enemy.base_x, ENTRY_TARGET_Y));
    }

    #[test]
    fn test_entry_snap_for_all_paths() {
        for path in [EntryPath::Straight, EntryPath::Swoop, EntryPath::Spiral, EntryPath::Zigzag] {
            let target = Vec2::new(300.0, 150.0);
            let mut enemy =
                Enemy::new(1, EnemyKind::Sniper, 50.0, -80.0).with_entry(target, path, 800.0);
            run_entry(&mut enemy);
            assert_eq!(enemy.pos, target, "path {path:?} did not snap");
        }
    }

    #[test]
    fn test_offscreen_invulnerable() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, 100.0, -50.0);
        assert!(!enemy.on_screen());
        let health = enemy.health;
        assert!(!enemy.take_damage(100.0));
        assert_eq!(enemy.health, health);
        assert!(enemy.active);
    }

    #[test]
    fn test_shield_absorbs_then_overflows() {
        let mut enemy = Enemy::new(1, EnemyKind::Shield, 100.0, 100.0);
        enemy.pos.y = 300.0; // on-screen
        let shield = enemy.shield_health;
        let health = enemy.health;

        // chip the shield without touching health
        assert!(!enemy.take_damage(shield - 1.0));
        assert_eq!(enemy.health, health);
        assert_eq!(enemy.shield_health, 1.0);

        // overflow spills exactly the remainder onto health
        assert!(!enemy.take_damage(3.0));
        assert_eq!(enemy.shield_health, 0.0);
        assert_eq!(enemy.health, health - 2.0);
    }

    #[test]
    fn test_kill_deactivates_permanently() {
        let mut enemy = Enemy::new(1, EnemyKind::Swarm, 100.0, 100.0);
        enemy.pos.y = 300.0;
        assert!(enemy.take_damage(10.0));
        assert!(!enemy.active);
        // dead enemies stay dead
        assert!(!enemy.take_damage(10.0));
        assert!(!enemy.active);
    }

    #[test]
    fn test_bus_phase_machine_never_reverts() {
        let mut bus = Enemy::bus(1, 1);
        let mut ids = IdAlloc::default();
        let mut shots = Vec::new();
        let mut children = Vec::new();
        let player = Vec2::new(240.0, 700.0);

        assert_eq!(bus.bus_phase, BusPhase::Approach);
        while bus.bus_phase == BusPhase::Approach {
            bus.update(16.0, player, &mut ids, &mut shots, &mut children);
        }
        assert_eq!(bus.bus_phase, BusPhase::Telegraph);
        let telegraph_y = bus.pos.y;
        assert!(telegraph_y >= BUS_TELEGRAPH_Y);

        // stationary while telegraphing
        let ticks = (BUS_TELEGRAPH_MS / 16.0).ceil() as usize + 1;
        for _ in 0..ticks {
            bus.update(16.0, player, &mut ids, &mut shots, &mut children);
        }
        assert_eq!(bus.bus_phase, BusPhase::Charging);

        // charges down fast and never leaves the charging phase
        let y0 = bus.pos.y;
        bus.update(16.0, player, &mut ids, &mut shots, &mut children);
        assert!(bus.pos.y > y0);
        assert_eq!(bus.bus_phase, BusPhase::Charging);
        assert!(shots.is_empty(), "buses never fire");
    }

    #[test]
    fn test_carrier_spawns_two_flanking_children() {
        let mut carrier = Enemy::new(1, EnemyKind::Carrier, 240.0, 100.0);
        carrier.entering = false;
        carrier.pos.y = 200.0;
        let mut ids = IdAlloc::default();
        let mut shots = Vec::new();
        let mut children = Vec::new();
        let player = Vec2::new(240.0, 700.0);

        let ticks = (CARRIER_SPAWN_MS / 16.0).ceil() as usize + 1;
        for _ in 0..ticks {
            carrier.update(16.0, player, &mut ids, &mut shots, &mut children);
        }
        assert_eq!(children.len(), 2);
        assert!(children[0].pos.x < carrier.pos.x);
        assert!(children[1].pos.x > carrier.pos.x);
    }

    #[test]
    fn test_no_attack_below_player() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, 240.0, 100.0);
        enemy.entering = false;
        enemy.pos.y = 600.0;
        let mut ids = IdAlloc::default();
        let mut shots = Vec::new();
        let mut children = Vec::new();
        // player above the enemy: no shots
        for _ in 0..200 {
            enemy.update(16.0, Vec2::new(240.0, 500.0), &mut ids, &mut shots, &mut children);
        }
        assert!(shots.is_empty());
    }

    #[test]
    fn test_fires_on_cooldown_when_above_player() {
        let mut enemy = Enemy::new(1, EnemyKind::Basic, 240.0, 100.0);
        enemy.entering = false;
        enemy.pos.y = 200.0;
        enemy.speed = 0.0; // hold position for the test
        let mut ids = IdAlloc::default();
        let mut shots = Vec::new();
        let mut children = Vec::new();
        for _ in 0..((enemy.fire_rate_ms / 16.0) as usize + 2) {
            enemy.update(16.0, Vec2::new(240.0, 700.0), &mut ids, &mut shots, &mut children);
        }
        assert_eq!(shots.len(), 1);
        assert!(!shots[0].from_player);
    }

    #[test]
    fn test_past_bottom_deactivates() {
        let mut enemy = Enemy::new(1, EnemyKind::Ram, 240.0, 100.0);
        enemy.entering = false;
        enemy.pos.y = PLAYFIELD_HEIGHT + 20.0;
        let mut ids = IdAlloc::default();
        let mut shots = Vec::new();
        let mut children = Vec::new();
        for _ in 0..60 {
            enemy.update(16.0, Vec2::new(240.0, 700.0), &mut ids, &mut shots, &mut children);
        }
        assert!(!enemy.active);
    }
}

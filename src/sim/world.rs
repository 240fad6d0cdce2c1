//! World container and the per-frame tick
//!
//! The world owns every simulated entity plus the spawner and id allocator.
//! The embedding layer owns the player and any allies; it passes their
//! hitboxes in each frame and reads back a list of frame events describing
//! everything that happened. `tick` runs the same fixed order every frame:
//! spawner, behavior, collision, prune.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

use super::bounds::Bounds;
use super::collision;
use super::enemy::{Enemy, EnemyKind};
use super::projectile::Projectile;
use super::ring::Ring;
use super::spawner::{GameMode, SpawnInputs, Spawner};
use super::wall::{Wall, WallKind};

/// Monotonic entity id source shared by every spawning subsystem
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct IdAlloc {
    counter: u32,
}

impl IdAlloc {
    pub fn next(&mut self) -> u32 {
        let id = self.counter;
        self.counter += 1;
        id
    }
}

/// Everything observable that happened during one tick. The embedding layer
/// applies these to its own state (score, gold, health bars, audio cues).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FrameEvent {
    EnemyKilled { kind: EnemyKind, gold: u32, score: u32, elite: bool },
    RingValueRaised { id: u32, value: i32 },
    RingCollected { value: i32 },
    GateMultiply,
    GateDivide,
    PlayerHit { damage: f32 },
    AllyHit { index: usize, damage: f32 },
    PlayerRammed { damage: f32 },
    AllyRammed { index: usize },
    WallTriggered { id: u32 },
    WallDestroyed { kind: WallKind },
    PlayerBoosted { id: u32 },
    PlayerBlocked { kind: WallKind },
    AllyCrushed { index: usize },
}

/// Per-frame state handed in by the embedding layer
#[derive(Debug, Clone)]
pub struct TickInput {
    pub player: Bounds,
    pub allies: Vec<Bounds>,
    pub difficulty: f32,
    /// External multiplier on the wave cadence
    pub rate_mult: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            player: Bounds::centered(
                Vec2::new(crate::consts::PLAYFIELD_WIDTH / 2.0, 700.0),
                Vec2::new(40.0, 40.0),
            ),
            allies: Vec::new(),
            difficulty: 0.0,
            rate_mult: 1.0,
        }
    }
}

#[derive(Debug)]
pub struct World {
    pub spawner: Spawner,
    pub enemies: Vec<Enemy>,
    pub walls: Vec<Wall>,
    pub rings: Vec<Ring>,
    pub projectiles: Vec<Projectile>,
    pub ids: IdAlloc,
    pub elapsed_ms: f32,
    /// Drives ring drift paths; separate stream so entity randomness does
    /// not interleave with spawner randomness
    rng: Pcg32,
    // scratch buffers reused across ticks
    shot_buf: Vec<Projectile>,
    child_buf: Vec<Enemy>,
}

impl World {
    pub fn new(seed: u64, mode: GameMode, tuning: Tuning) -> Self {
        Self {
            spawner: Spawner::new(seed, mode, tuning),
            enemies: Vec::new(),
            walls: Vec::new(),
            rings: Vec::new(),
            projectiles: Vec::new(),
            ids: IdAlloc::default(),
            elapsed_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            shot_buf: Vec::new(),
            child_buf: Vec::new(),
        }
    }

    /// Inject a player bullet. The embedding layer owns fire rate and
    /// weapon state; the world only simulates the projectile.
    pub fn fire_player_bullet(&mut self, pos: Vec2, vel: Vec2, damage: f32) {
        self.projectiles
            .push(Projectile::straight(self.ids.next(), pos, vel, true, damage));
    }

    /// Advance one frame. Order is fixed: spawner decisions, entity
    /// behavior, collision resolution, prune.
    pub fn tick(&mut self, input: &TickInput, dt_ms: f32) -> Vec<FrameEvent> {
        self.elapsed_ms += dt_ms;
        let mut events = Vec::new();

        // 1. spawner
        let spawn_inputs = SpawnInputs {
            difficulty: input.difficulty,
            ally_count: input.allies.len() as u32,
            rate_mult: input.rate_mult,
        };
        self.spawner.update(
            dt_ms,
            self.elapsed_ms,
            &spawn_inputs,
            &mut self.ids,
            &mut self.enemies,
            &mut self.rings,
            &mut self.walls,
        );

        // 2. behavior
        let player_pos = input.player.center();
        self.shot_buf.clear();
        self.child_buf.clear();
        for enemy in &mut self.enemies {
            enemy.update(dt_ms, player_pos, &mut self.ids, &mut self.shot_buf, &mut self.child_buf);
        }
        self.projectiles.append(&mut self.shot_buf);
        self.enemies.append(&mut self.child_buf);

        for projectile in &mut self.projectiles {
            projectile.update(dt_ms);
        }
        for ring in &mut self.rings {
            ring.update(dt_ms, player_pos.x, &mut self.rng);
        }
        for wall in &mut self.walls {
            wall.update(dt_ms);
        }

        // 3. collision, fixed pass order
        collision::bullets_vs_walls(&mut self.projectiles, &mut self.walls, &mut events);
        collision::bullets_vs_enemies(&mut self.projectiles, &mut self.enemies, &mut events);
        collision::bullets_vs_rings(
            &mut self.projectiles,
            &mut self.rings,
            self.spawner.tuning().ring_increase_cap,
            &mut events,
        );
        collision::enemy_bullets_vs_players(
            &mut self.projectiles,
            &input.player,
            &input.allies,
            &mut events,
        );
        collision::collectors_vs_rings(&input.player, &input.allies, &mut self.rings, &mut events);
        collision::enemies_vs_players(&self.enemies, &input.player, &input.allies, &mut events);
        collision::player_vs_walls(&input.player, &self.walls, &mut events);
        collision::allies_vs_walls(&input.allies, &self.walls, &mut events);
        collision::walls_vs_walls(&mut self.walls);

        // 4. prune
        self.enemies.retain(|e| e.active);
        self.projectiles.retain(|p| p.active);
        self.rings.retain(|r| r.active);
        self.walls.retain(|w| w.active);

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest(world: &World) -> Vec<u32> {
        let mut out = Vec::new();
        out.push(world.enemies.len() as u32);
        out.push(world.projectiles.len() as u32);
        out.push(world.rings.len() as u32);
        out.push(world.walls.len() as u32);
        for e in &world.enemies {
            out.push(e.pos.x.to_bits());
            out.push(e.pos.y.to_bits());
        }
        for r in &world.rings {
            out.push(r.pos.x.to_bits());
            out.push(r.value as u32);
        }
        for w in &world.walls {
            out.push(w.pos.y.to_bits());
        }
        out
    }

    #[test]
    fn test_determinism() {
        let run = |seed: u64| {
            let mut world = World::new(seed, GameMode::Lanes, Tuning::default());
            let input = TickInput {
                allies: vec![Bounds::centered(Vec2::new(100.0, 720.0), Vec2::new(30.0, 30.0))],
                difficulty: 1.0,
                ..TickInput::default()
            };
            let mut event_count = 0;
            for frame in 0..2000 {
                if frame % 30 == 0 {
                    world.fire_player_bullet(
                        input.player.center(),
                        Vec2::new(0.0, -8.0),
                        1.0,
                    );
                }
                event_count += world.tick(&input, 16.0).len();
            }
            (digest(&world), event_count)
        };
        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn test_different_seeds_diverge() {
        let run = |seed: u64| {
            let mut world = World::new(seed, GameMode::Endless, Tuning::default());
            let input = TickInput::default();
            for _ in 0..3000 {
                world.tick(&input, 16.0);
            }
            digest(&world)
        };
        assert_ne!(run(1), run(2));
    }

    #[test]
    fn test_tick_spawns_waves_over_time() {
        let mut world = World::new(7, GameMode::Endless, Tuning::default());
        let input = TickInput::default();
        for _ in 0..400 {
            world.tick(&input, 16.0);
        }
        assert!(world.spawner.wave >= 2);
        assert!(!world.enemies.is_empty());
    }

    #[test]
    fn test_player_bullet_kills_enemy() {
        let mut world = World::new(1, GameMode::Endless, Tuning::default());
        // park a fragile enemy on screen, fire straight into it
        let mut enemy = Enemy::new(world.ids.next(), EnemyKind::Swarm, 240.0, 400.0);
        enemy.entering = false;
        world.enemies.push(enemy);
        world.fire_player_bullet(Vec2::new(240.0, 420.0), Vec2::new(0.0, -4.0), 5.0);

        let input = TickInput {
            player: Bounds::centered(Vec2::new(400.0, 780.0), Vec2::new(40.0, 40.0)),
            rate_mult: 0.0001,
            ..TickInput::default()
        };
        let mut killed = false;
        for _ in 0..20 {
            for event in world.tick(&input, 16.0) {
                if matches!(event, FrameEvent::EnemyKilled { kind: EnemyKind::Swarm, .. }) {
                    killed = true;
                }
            }
        }
        assert!(killed);
    }

    #[test]
    fn test_inactive_entities_are_pruned() {
        let mut world = World::new(1, GameMode::Endless, Tuning::default());
        world.fire_player_bullet(Vec2::new(240.0, 10.0), Vec2::new(0.0, -10.0), 1.0);
        let input = TickInput { rate_mult: 0.0001, ..TickInput::default() };
        for _ in 0..30 {
            world.tick(&input, 16.0);
        }
        assert!(world.projectiles.is_empty());
    }

    #[test]
    fn test_dt_normalization_half_steps() {
        // two 8ms ticks should move a scrolling wall like one 16ms tick
        let mut a = Wall::new(0, WallKind::Solid, 1);
        let mut b = Wall::new(1, WallKind::Solid, 1);
        a.update(16.0);
        b.update(8.0);
        b.update(8.0);
        assert!((a.pos.y - b.pos.y).abs() < 1e-4);
    }
}

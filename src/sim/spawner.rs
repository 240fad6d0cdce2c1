//! Procedural director
//!
//! Decides, from elapsed time and difficulty/power inputs, when and what to
//! create: enemy wave formations, ring gate puzzles, lane walls, and the
//! scripted timelines of the alternate modes. The spawner never reads
//! collision outcomes; it is a function of time, its own cooldown timers,
//! and the session inputs, with all randomness drawn from one seeded
//! generator so a fixed seed reproduces exact spawn sequences.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

use super::enemy::{Enemy, EnemyKind, EntryPath};
use super::ring::{GateKind, Ring, RingPath};
use super::wall::{Wall, WallKind};
use super::world::IdAlloc;

/// Which spawn program drives the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Generic cadence: formations, ring patterns
    #[default]
    Endless,
    /// Endless plus lane walls and buses
    Lanes,
    /// Boost pads and cargo ships on independent shrinking intervals
    Convoy,
    /// Millisecond-keyed script, then recurring escalating bosses
    Assault,
}

/// Per-frame session inputs the director reads
#[derive(Debug, Clone, Copy)]
pub struct SpawnInputs {
    pub difficulty: f32,
    pub ally_count: u32,
    /// External mode multiplier on the wave cadence
    pub rate_mult: f32,
}

impl Default for SpawnInputs {
    fn default() -> Self {
        Self { difficulty: 0.0, ally_count: 0, rate_mult: 1.0 }
    }
}

// === Formations ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationLayout {
    V,
    Line,
    Diamond,
    Stagger,
    Pincer,
    /// Random scatter fallback
    Scatter,
}

const LAYOUT_CYCLE: [FormationLayout; 6] = [
    FormationLayout::V,
    FormationLayout::Line,
    FormationLayout::Diamond,
    FormationLayout::Stagger,
    FormationLayout::Pincer,
    FormationLayout::Scatter,
];

/// Closed-form target positions for a layout. Every returned x is finite and
/// inside [0, PLAYFIELD_WIDTH]; counts 3..=6 are the supported range.
pub fn formation_positions<R: Rng>(
    layout: FormationLayout,
    count: usize,
    rng: &mut R,
) -> Vec<Vec2> {
    let w = PLAYFIELD_WIDTH;
    let mut out = Vec::with_capacity(count);
    match layout {
        FormationLayout::V => {
            for i in 0..count {
                // apex first, wings alternating out and down
                let offset = (i as f32 + 1.0) / 2.0;
                let side = if i % 2 == 1 { 1.0 } else { -1.0 };
                let (dx, dy) = if i == 0 {
                    (0.0, 0.0)
                } else {
                    (side * offset.floor().max(1.0) * 55.0, offset.floor().max(1.0) * 40.0)
                };
                out.push(Vec2::new((w / 2.0 + dx).clamp(0.0, w), 100.0 + dy));
            }
        }
        FormationLayout::Line => {
            for i in 0..count {
                let x = w * (i as f32 + 1.0) / (count as f32 + 1.0);
                out.push(Vec2::new(x, 120.0));
            }
        }
        FormationLayout::Diamond => {
            for i in 0..count {
                let a = std::f32::consts::TAU * i as f32 / count as f32;
                let x = (w / 2.0 + a.cos() * 120.0).clamp(0.0, w);
                out.push(Vec2::new(x, 160.0 + a.sin() * 60.0));
            }
        }
        FormationLayout::Stagger => {
            for i in 0..count {
                let x = w * (i as f32 + 1.0) / (count as f32 + 1.0);
                let y = if i % 2 == 0 { 100.0 } else { 160.0 };
                out.push(Vec2::new(x, y));
            }
        }
        FormationLayout::Pincer => {
            for i in 0..count {
                let rank = (i / 2) as f32;
                let x = if i % 2 == 0 { 60.0 + rank * 30.0 } else { w - 60.0 - rank * 30.0 };
                out.push(Vec2::new(x, 110.0 + rank * 35.0));
            }
        }
        FormationLayout::Scatter => {
            for _ in 0..count {
                let x = rng.random_range(40.0..w - 40.0);
                let y = rng.random_range(90.0..200.0);
                out.push(Vec2::new(x, y));
            }
        }
    }
    out
}

/// Entry-path assignment matching each layout's character
pub fn formation_entry_paths(layout: FormationLayout, count: usize) -> Vec<EntryPath> {
    (0..count)
        .map(|i| match layout {
            FormationLayout::V => {
                if i == 0 { EntryPath::Straight } else { EntryPath::Swoop }
            }
            FormationLayout::Line => EntryPath::Straight,
            FormationLayout::Diamond => EntryPath::Spiral,
            FormationLayout::Stagger => {
                if i % 2 == 0 { EntryPath::Zigzag } else { EntryPath::Straight }
            }
            FormationLayout::Pincer => EntryPath::Swoop,
            FormationLayout::Scatter => match i % 4 {
                0 => EntryPath::Straight,
                1 => EntryPath::Swoop,
                2 => EntryPath::Spiral,
                _ => EntryPath::Zigzag,
            },
        })
        .collect()
}

// === Enemy type selection ===

/// Weighted roll gated by effective wave. Thresholds are evaluated in
/// descending difficulty order; the first match wins, fallback Basic.
pub fn pick_enemy_kind<R: Rng>(effective_wave: f32, rng: &mut R) -> EnemyKind {
    let roll: f32 = rng.random();
    if effective_wave >= 12.0 && roll < 0.08 {
        EnemyKind::Carrier
    } else if effective_wave >= 10.0 && roll < 0.14 {
        EnemyKind::Shield
    } else if effective_wave >= 8.0 && roll < 0.20 {
        EnemyKind::Bomber
    } else if effective_wave >= 6.0 && roll < 0.26 {
        EnemyKind::Sniper
    } else if effective_wave >= 4.0 && roll < 0.32 {
        EnemyKind::Ram
    } else if effective_wave >= 2.0 && roll < 0.40 {
        EnemyKind::Swarm
    } else {
        EnemyKind::Basic
    }
}

// === Ring patterns ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingPattern {
    TwoChoice,
    ThreeChoice,
    ShootToWin,
    Gauntlet,
    FakeChoice,
    Escalation,
    RiskReward,
    NarrowPath,
    MultiplierChoice,
    RiskyMultiplier,
}

const PATTERN_CYCLE: [RingPattern; 10] = [
    RingPattern::TwoChoice,
    RingPattern::ThreeChoice,
    RingPattern::ShootToWin,
    RingPattern::Gauntlet,
    RingPattern::FakeChoice,
    RingPattern::Escalation,
    RingPattern::RiskReward,
    RingPattern::NarrowPath,
    RingPattern::MultiplierChoice,
    RingPattern::RiskyMultiplier,
];

/// One ring to create: x as a fraction of playfield width, a y offset above
/// the spawn line, and either a value or a gate
#[derive(Debug, Clone, Copy)]
pub struct RingSpec {
    pub x_frac: f32,
    pub y_off: f32,
    pub value: i32,
    pub gate: GateKind,
    pub path: RingPath,
}

impl RingSpec {
    fn value(x_frac: f32, y_off: f32, value: i32, path: RingPath) -> Self {
        Self { x_frac, y_off, value, gate: GateKind::Normal, path }
    }

    fn gate(x_frac: f32, y_off: f32, gate: GateKind, path: RingPath) -> Self {
        Self { x_frac, y_off, value: 0, gate, path }
    }
}

/// Closed-form ring specs for a pattern. Values turn adversarial as
/// difficulty and ally count rise; the best option always exists but the
/// margin shrinks.
pub fn ring_pattern_specs(pattern: RingPattern, difficulty: f32, ally_count: u32) -> Vec<RingSpec> {
    // catch-up/penalty pressure: stronger players see worse offers
    let penalty = (difficulty * 3.0 + ally_count as f32 * 0.15) as i32;
    let good = (5 - difficulty as i32).max(2);
    let drift = RingPath::Sine { amplitude: 30.0, frequency: 1.5 };
    let still = RingPath::Formation { offset_x: 0.0 };

    match pattern {
        RingPattern::TwoChoice => vec![
            RingSpec::value(0.25, 0.0, good, drift),
            RingSpec::value(0.75, 0.0, -5 - penalty, drift),
        ],
        RingPattern::ThreeChoice => vec![
            RingSpec::value(0.2, 0.0, good, still),
            RingSpec::value(0.5, 0.0, -1 - penalty / 2, drift),
            RingSpec::value(0.8, 0.0, -6 - penalty, drift),
        ],
        RingPattern::ShootToWin => vec![
            // the small ring is safe; the deep one starts negative and is
            // meant to be shot upward before it arrives
            RingSpec::value(0.35, 0.0, 1, still),
            RingSpec::value(0.65, -80.0, -4 - penalty, still),
        ],
        RingPattern::Gauntlet => vec![
            RingSpec::value(0.3, 0.0, 1, RingPath::Zigzag { width: 50.0, period: 2.0 }),
            RingSpec::value(0.7, -70.0, -4 - penalty, RingPath::Zigzag { width: 50.0, period: 2.0 }),
            RingSpec::value(0.3, -140.0, -4 - penalty, RingPath::Zigzag { width: 50.0, period: 2.5 }),
            RingSpec::value(0.7, -210.0, good + 1, RingPath::Zigzag { width: 50.0, period: 2.5 }),
        ],
        RingPattern::FakeChoice => vec![
            // the offers look alike; only one side is worth anything
            RingSpec::value(0.25, 0.0, 1, drift),
            RingSpec::value(0.75, 0.0, -8 - penalty, drift),
        ],
        RingPattern::Escalation => vec![
            RingSpec::value(0.5, 0.0, 1, still),
            RingSpec::value(0.5, -90.0, -3 - penalty, drift),
            RingSpec::value(0.5, -180.0, good + 3, RingPath::Weave { amplitude: 60.0, frequency: 2.0 }),
        ],
        RingPattern::RiskReward => vec![
            // the big prize runs away from you
            RingSpec::value(0.5, 0.0, good + 5, RingPath::Chase { speed: 3.0 }),
            RingSpec::value(0.2, -60.0, 1, still),
        ],
        RingPattern::NarrowPath => vec![
            RingSpec::value(0.15, 0.0, -7 - penalty, still),
            RingSpec::value(0.5, 0.0, 2, RingPath::Pendulum { amplitude: 25.0, frequency: 1.2 }),
            RingSpec::value(0.85, 0.0, -7 - penalty, still),
        ],
        RingPattern::MultiplierChoice => vec![
            RingSpec::gate(0.3, 0.0, GateKind::Multiply, still),
            RingSpec::value(0.7, 0.0, -4 - penalty, drift),
        ],
        RingPattern::RiskyMultiplier => vec![
            RingSpec::gate(0.35, 0.0, GateKind::Multiply, RingPath::Random { speed: 2.5 }),
            RingSpec::gate(0.65, 0.0, GateKind::Divide, RingPath::Orbit { radius: 40.0, frequency: 2.0 }),
        ],
    }
}

// === Assault-mode script ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssaultSpawn {
    /// Shootable supply crate (breakable wall)
    SupplyCrate,
    /// Hit-counter push wall
    PushWall,
    /// Scripted boss; multiplier on the base boss health
    Boss(u32),
}

/// Millisecond-keyed one-off spawns, in timeline order
const ASSAULT_SCRIPT: [(f32, AssaultSpawn); 5] = [
    (8_000.0, AssaultSpawn::SupplyCrate),
    (20_000.0, AssaultSpawn::PushWall),
    (35_000.0, AssaultSpawn::SupplyCrate),
    (45_000.0, AssaultSpawn::Boss(1)),
    (90_000.0, AssaultSpawn::Boss(2)),
];

// === The director ===

#[derive(Debug)]
pub struct Spawner {
    pub mode: GameMode,
    pub wave: u32,
    tuning: Tuning,
    rng: Pcg32,

    wave_timer_ms: f32,
    ring_timer_ms: f32,
    wall_timer_ms: f32,

    formation_cursor: usize,
    pattern_cursor: usize,
    /// Lanes used by the previous lane-wall event (variety bias)
    prev_lanes: Vec<usize>,

    // Convoy mode timers
    boost_timer_ms: f32,
    cargo_timer_ms: f32,

    // Assault mode script state
    script_cursor: usize,
    recurring_boss_count: u32,
    next_recurring_boss_ms: f32,
}

impl Spawner {
    pub fn new(seed: u64, mode: GameMode, tuning: Tuning) -> Self {
        Self {
            mode,
            wave: 0,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            wave_timer_ms: 0.0,
            ring_timer_ms: 0.0,
            wall_timer_ms: 0.0,
            formation_cursor: 0,
            pattern_cursor: 0,
            prev_lanes: Vec::new(),
            boost_timer_ms: 0.0,
            cargo_timer_ms: 0.0,
            script_cursor: 0,
            recurring_boss_count: 0,
            next_recurring_boss_ms: 0.0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Interval until the next wave at the current wave count and difficulty
    pub fn wave_interval_ms(&self, inputs: &SpawnInputs) -> f32 {
        let mult = (1.0 + self.wave as f32 * self.tuning.spawn_multiplier_growth)
            * inputs.rate_mult.max(0.01);
        (self.tuning.wave_base_interval_ms / mult
            - inputs.difficulty * self.tuning.wave_interval_difficulty_cut_ms)
            .max(self.tuning.wave_interval_floor_ms)
    }

    /// One frame of spawning decisions. New entities are pushed straight
    /// into the collections.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt_ms: f32,
        elapsed_ms: f32,
        inputs: &SpawnInputs,
        ids: &mut IdAlloc,
        enemies: &mut Vec<Enemy>,
        rings: &mut Vec<Ring>,
        walls: &mut Vec<Wall>,
    ) {
        match self.mode {
            GameMode::Endless => {
                self.step_waves(dt_ms, inputs, ids, enemies);
                self.step_rings(dt_ms, inputs, ids, rings);
            }
            GameMode::Lanes => {
                self.step_waves(dt_ms, inputs, ids, enemies);
                self.step_rings(dt_ms, inputs, ids, rings);
                self.step_lane_walls(dt_ms, inputs, ids, enemies, walls);
            }
            GameMode::Convoy => {
                self.step_convoy(dt_ms, ids, walls);
                self.step_rings(dt_ms, inputs, ids, rings);
            }
            GameMode::Assault => {
                self.step_assault(elapsed_ms, ids, enemies, walls);
            }
        }
    }

    fn step_waves(
        &mut self,
        dt_ms: f32,
        inputs: &SpawnInputs,
        ids: &mut IdAlloc,
        enemies: &mut Vec<Enemy>,
    ) {
        self.wave_timer_ms += dt_ms;
        if self.wave_timer_ms < self.wave_interval_ms(inputs) {
            return;
        }
        self.wave_timer_ms = 0.0;
        self.wave += 1;

        let layout = LAYOUT_CYCLE[self.formation_cursor % LAYOUT_CYCLE.len()];
        self.formation_cursor += 1;
        let count = self.rng.random_range(3..=6);
        let positions = formation_positions(layout, count, &mut self.rng);
        let paths = formation_entry_paths(layout, count);

        let effective = self.tuning.effective_wave(self.wave, inputs.ally_count);
        let elite_chance = self.tuning.elite_chance(self.wave, inputs.ally_count);
        let health = self.tuning.health_mult(self.wave);
        let speed = self.tuning.speed_mult(self.wave);
        let damage = self.tuning.damage_mult(self.wave);
        let reward = self.tuning.reward_mult(self.wave);

        log::debug!("wave {} layout {:?} count {}", self.wave, layout, count);

        for (target, path) in positions.into_iter().zip(paths) {
            let kind = pick_enemy_kind(effective, &mut self.rng);
            let mut enemy = Enemy::new(ids.next(), kind, target.x, -60.0)
                .with_entry(target, path, ENTRY_DURATION_MS)
                .scaled(health, speed, damage, reward);
            if self.rng.random::<f32>() < elite_chance {
                enemy = enemy.promote_elite(
                    self.tuning.elite_health_mult,
                    self.tuning.elite_damage_mult,
                    self.tuning.elite_reward_mult,
                );
            }
            enemies.push(enemy);
        }
    }

    fn step_rings(
        &mut self,
        dt_ms: f32,
        inputs: &SpawnInputs,
        ids: &mut IdAlloc,
        rings: &mut Vec<Ring>,
    ) {
        self.ring_timer_ms += dt_ms;
        if self.ring_timer_ms < self.tuning.ring_interval_ms {
            return;
        }
        self.ring_timer_ms = 0.0;

        let pattern = PATTERN_CYCLE[self.pattern_cursor % PATTERN_CYCLE.len()];
        self.pattern_cursor += 1;
        log::debug!("ring pattern {:?}", pattern);

        for spec in ring_pattern_specs(pattern, inputs.difficulty, inputs.ally_count) {
            let pos = Vec2::new(spec.x_frac * PLAYFIELD_WIDTH, -40.0 + spec.y_off);
            rings.push(Ring::new(ids.next(), pos, spec.value, spec.gate, spec.path));
        }
    }

    /// Pick a wall kind from a cumulative probability table that shifts
    /// toward the dangerous kinds as difficulty rises
    fn roll_wall_kind(&mut self, difficulty: f32) -> WallKind {
        let shift = (difficulty * self.tuning.wall_danger_shift).min(0.25);
        let roll: f32 = self.rng.random();
        // benign kinds shrink by `shift`, dangerous kinds grow by it
        let table = [
            (WallKind::Breakable, 0.35 - shift),
            (WallKind::Net, 0.15 - shift / 2.0),
            (WallKind::Cargo, 0.15),
            (WallKind::Solid, 0.20 + shift / 2.0),
            (WallKind::Spikes, 0.15 + shift),
        ];
        let mut cumulative = 0.0;
        for (kind, p) in table {
            cumulative += p;
            if roll < cumulative {
                return kind;
            }
        }
        WallKind::Solid
    }

    fn step_lane_walls(
        &mut self,
        dt_ms: f32,
        inputs: &SpawnInputs,
        ids: &mut IdAlloc,
        enemies: &mut Vec<Enemy>,
        walls: &mut Vec<Wall>,
    ) {
        self.wall_timer_ms += dt_ms;
        if self.wall_timer_ms < self.tuning.wall_interval_ms {
            return;
        }
        self.wall_timer_ms = 0.0;

        // occasionally a bus instead of walls
        if self.wave >= 3 && self.rng.random::<f32>() < 0.25 {
            let lane = self.rng.random_range(0..LANE_COUNT);
            enemies.push(Enemy::bus(ids.next(), lane));
            return;
        }

        let lane_count = if self.rng.random::<f32>() < 0.35 { 2 } else { 1 };
        let mut chosen: Vec<usize> = Vec::with_capacity(lane_count);
        for _ in 0..lane_count {
            // bias away from the previous event's lanes for variety
            let weights: Vec<f32> = (0..LANE_COUNT)
                .map(|lane| {
                    if chosen.contains(&lane) {
                        0.0
                    } else if self.prev_lanes.contains(&lane) {
                        0.25
                    } else {
                        1.0
                    }
                })
                .collect();
            let total: f32 = weights.iter().sum();
            if total <= 0.0 {
                break;
            }
            let mut roll = self.rng.random::<f32>() * total;
            for (lane, w) in weights.iter().enumerate() {
                roll -= w;
                if roll <= 0.0 {
                    chosen.push(lane);
                    break;
                }
            }
        }

        for &lane in &chosen {
            let kind = self.roll_wall_kind(inputs.difficulty);
            walls.push(Wall::new(ids.next(), kind, lane));
        }
        self.prev_lanes = chosen;
    }

    fn step_convoy(&mut self, dt_ms: f32, ids: &mut IdAlloc, walls: &mut Vec<Wall>) {
        self.boost_timer_ms += dt_ms;
        if self.boost_timer_ms >= self.tuning.convoy_boost_interval_ms {
            self.boost_timer_ms = 0.0;
            let lane = self.rng.random_range(0..LANE_COUNT);
            walls.push(Wall::new(ids.next(), WallKind::BoostPad, lane));
        }

        // cargo arrives faster every wave, down to a floor
        let cargo_interval = (self.tuning.convoy_cargo_interval_ms
            - self.wave as f32 * self.tuning.convoy_cargo_shrink_ms)
            .max(self.tuning.convoy_cargo_floor_ms);
        self.cargo_timer_ms += dt_ms;
        if self.cargo_timer_ms >= cargo_interval {
            self.cargo_timer_ms = 0.0;
            self.wave += 1;
            let lane = self.rng.random_range(0..LANE_COUNT);
            walls.push(Wall::new(ids.next(), WallKind::Cargo, lane));
            log::debug!("convoy cargo {} in lane {}", self.wave, lane);
        }
    }

    fn step_assault(
        &mut self,
        elapsed_ms: f32,
        ids: &mut IdAlloc,
        enemies: &mut Vec<Enemy>,
        walls: &mut Vec<Wall>,
    ) {
        while self.script_cursor < ASSAULT_SCRIPT.len() {
            let (at_ms, spawn) = ASSAULT_SCRIPT[self.script_cursor];
            if elapsed_ms < at_ms {
                break;
            }
            self.script_cursor += 1;
            match spawn {
                AssaultSpawn::SupplyCrate => {
                    let lane = self.rng.random_range(0..LANE_COUNT);
                    walls.push(Wall::new(ids.next(), WallKind::Breakable, lane));
                }
                AssaultSpawn::PushWall => {
                    let lane = self.rng.random_range(0..LANE_COUNT);
                    walls.push(Wall::new(ids.next(), WallKind::Crate, lane).with_hits_required(10));
                }
                AssaultSpawn::Boss(mult) => {
                    let health = self.tuning.assault_boss_base_health * mult as f32;
                    log::info!("scripted boss at {:.0}ms, health {}", elapsed_ms, health);
                    enemies.push(Enemy::boss_with_health(
                        ids.next(),
                        PLAYFIELD_WIDTH / 2.0,
                        health,
                    ));
                }
            }
            if self.script_cursor == ASSAULT_SCRIPT.len() {
                self.next_recurring_boss_ms = at_ms + self.tuning.assault_boss_interval_ms;
            }
        }

        // after the script: recurring bosses, health doubling each spawn
        if self.script_cursor == ASSAULT_SCRIPT.len() && elapsed_ms >= self.next_recurring_boss_ms {
            self.next_recurring_boss_ms += self.tuning.assault_boss_interval_ms;
            // continues the doubling started by the scripted bosses
            let health = self.tuning.assault_boss_base_health
                * 2.0_f32.powi(self.recurring_boss_count as i32 + 2);
            self.recurring_boss_count += 1;
            log::info!("recurring boss {}, health {}", self.recurring_boss_count, health);
            enemies.push(Enemy::boss_with_health(ids.next(), PLAYFIELD_WIDTH / 2.0, health));
        }
    }
}

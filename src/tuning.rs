//! Game balance knobs
//!
//! Everything the spawner and scaling math read from is collected here so
//! balance passes are data edits, not code edits. Serialized as JSON so
//! external tools can ship alternative tunings.

use serde::{Deserialize, Serialize};

/// Difficulty and pacing tuning for the procedural director
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Wave cadence ===
    /// Base interval between enemy waves (ms)
    pub wave_base_interval_ms: f32,
    /// Hard floor on the wave interval (ms)
    pub wave_interval_floor_ms: f32,
    /// Interval reduction per difficulty point (ms)
    pub wave_interval_difficulty_cut_ms: f32,
    /// Spawn multiplier growth per completed wave (endless scaling)
    pub spawn_multiplier_growth: f32,

    // === Endless scaling (per-wave increments, capped) ===
    pub enemy_health_per_wave: f32,
    pub enemy_health_cap: f32,
    pub enemy_speed_per_wave: f32,
    pub enemy_speed_cap: f32,
    pub enemy_damage_per_wave: f32,
    pub enemy_damage_cap: f32,
    /// Gold/score growth per wave, deliberately uncapped
    pub reward_per_wave: f32,

    // === Enemy type selection ===
    /// Allies per bonus wave: effective wave = wave + allies / this
    pub ally_wave_bonus_divisor: f32,

    // === Elite promotion ===
    pub elite_base_chance: f32,
    pub elite_chance_per_wave: f32,
    pub elite_chance_per_ally: f32,
    pub elite_chance_cap: f32,
    pub elite_health_mult: f32,
    pub elite_damage_mult: f32,
    pub elite_reward_mult: f32,

    // === Rings ===
    /// Interval between ring patterns (ms)
    pub ring_interval_ms: f32,
    /// Bullet hits stop raising a ring's value at this cap
    pub ring_increase_cap: i32,

    // === Lane walls ===
    /// Interval between lane-wall spawn events (ms)
    pub wall_interval_ms: f32,
    /// Probability shift toward dangerous wall kinds per difficulty point
    pub wall_danger_shift: f32,

    // === Convoy mode ===
    pub convoy_boost_interval_ms: f32,
    pub convoy_cargo_interval_ms: f32,
    /// Cargo interval shrink per wave (ms), down to the floor
    pub convoy_cargo_shrink_ms: f32,
    pub convoy_cargo_floor_ms: f32,

    // === Assault mode ===
    /// Interval between recurring bosses after the scripted timeline (ms)
    pub assault_boss_interval_ms: f32,
    /// First recurring boss health; doubles every subsequent spawn
    pub assault_boss_base_health: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            wave_base_interval_ms: 2500.0,
            wave_interval_floor_ms: 600.0,
            wave_interval_difficulty_cut_ms: 150.0,
            spawn_multiplier_growth: 0.04,

            enemy_health_per_wave: 0.06,
            enemy_health_cap: 3.0,
            enemy_speed_per_wave: 0.02,
            enemy_speed_cap: 1.8,
            enemy_damage_per_wave: 0.04,
            enemy_damage_cap: 2.5,
            reward_per_wave: 0.08,

            ally_wave_bonus_divisor: 8.0,

            elite_base_chance: 0.02,
            elite_chance_per_wave: 0.005,
            elite_chance_per_ally: 0.001,
            elite_chance_cap: 0.35,
            elite_health_mult: 2.5,
            elite_damage_mult: 1.5,
            elite_reward_mult: 3.0,

            ring_interval_ms: 6000.0,
            ring_increase_cap: 50,

            wall_interval_ms: 4000.0,
            wall_danger_shift: 0.05,

            convoy_boost_interval_ms: 5000.0,
            convoy_cargo_interval_ms: 8000.0,
            convoy_cargo_shrink_ms: 500.0,
            convoy_cargo_floor_ms: 3000.0,

            assault_boss_interval_ms: 30_000.0,
            assault_boss_base_health: 500.0,
        }
    }
}

impl Tuning {
    /// Endless health multiplier for the given wave (capped)
    pub fn health_mult(&self, wave: u32) -> f32 {
        (1.0 + wave as f32 * self.enemy_health_per_wave).min(self.enemy_health_cap)
    }

    /// Endless speed multiplier for the given wave (capped)
    pub fn speed_mult(&self, wave: u32) -> f32 {
        (1.0 + wave as f32 * self.enemy_speed_per_wave).min(self.enemy_speed_cap)
    }

    /// Endless damage multiplier for the given wave (capped)
    pub fn damage_mult(&self, wave: u32) -> f32 {
        (1.0 + wave as f32 * self.enemy_damage_per_wave).min(self.enemy_damage_cap)
    }

    /// Reward multiplier for the given wave (uncapped)
    pub fn reward_mult(&self, wave: u32) -> f32 {
        1.0 + wave as f32 * self.reward_per_wave
    }

    /// Effective wave used for type gating: stronger players meet harder
    /// enemies sooner
    pub fn effective_wave(&self, wave: u32, ally_count: u32) -> f32 {
        wave as f32 + ally_count as f32 / self.ally_wave_bonus_divisor
    }

    /// Elite promotion probability for the given wave and ally count
    pub fn elite_chance(&self, wave: u32, ally_count: u32) -> f32 {
        (self.elite_base_chance
            + wave as f32 * self.elite_chance_per_wave
            + ally_count as f32 * self.elite_chance_per_ally)
            .min(self.elite_chance_cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_caps() {
        let t = Tuning::default();
        assert_eq!(t.health_mult(0), 1.0);
        assert!(t.health_mult(10_000) <= t.enemy_health_cap);
        assert!(t.speed_mult(10_000) <= t.enemy_speed_cap);
        assert!(t.damage_mult(10_000) <= t.enemy_damage_cap);
        // rewards keep growing
        assert!(t.reward_mult(10_000) > t.reward_mult(1_000));
    }

    #[test]
    fn test_roundtrip_with_missing_fields() {
        // Older tuning files without newer knobs still load
        let t: Tuning = serde_json::from_str(r#"{"wave_base_interval_ms": 2000.0}"#).unwrap();
        assert_eq!(t.wave_base_interval_ms, 2000.0);
        assert_eq!(t.ring_increase_cap, Tuning::default().ring_increase_cap);
    }
}

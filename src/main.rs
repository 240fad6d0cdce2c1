//! Headless demo driver
//!
//! Runs the simulation at a fixed 60Hz timestep with a scripted player and
//! prints a session summary. Set SKYRUSH_SEED, SKYRUSH_MODE (endless, lanes,
//! convoy, assault) and SKYRUSH_FRAMES to alter the run; RUST_LOG=debug shows
//! every spawn decision.

use glam::Vec2;

use skyrush::consts::*;
use skyrush::sim::{Bounds, FrameEvent, GameMode, TickInput, World};
use skyrush::Tuning;

fn env_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}

fn main() {
    env_logger::init();

    let seed: u64 = env_or("SKYRUSH_SEED", 0xC0FFEE);
    let frames: u32 = env_or("SKYRUSH_FRAMES", 3600);
    let mode = match std::env::var("SKYRUSH_MODE").as_deref() {
        Ok("lanes") => GameMode::Lanes,
        Ok("convoy") => GameMode::Convoy,
        Ok("assault") => GameMode::Assault,
        _ => GameMode::Endless,
    };
    log::info!("seed {seed}, mode {mode:?}, {frames} frames");

    let mut world = World::new(seed, mode, Tuning::default());
    let mut input = TickInput::default();

    let mut score: u64 = 0;
    let mut gold: u64 = 0;
    let mut ring_total: i64 = 0;
    let mut kills: u32 = 0;
    let mut hits_taken: u32 = 0;

    for frame in 0..frames {
        // scripted player: sweeps the playfield, fires every 6 frames
        let t = frame as f32 * TICK_MS / 1000.0;
        let x = PLAYFIELD_WIDTH / 2.0 + (t * 0.7).sin() * (PLAYFIELD_WIDTH / 2.0 - 60.0);
        input.player = Bounds::centered(Vec2::new(x, 700.0), Vec2::new(40.0, 40.0));
        input.difficulty = t / 30.0;
        if frame % 6 == 0 {
            world.fire_player_bullet(Vec2::new(x, 680.0), Vec2::new(0.0, -8.0), 1.0);
        }

        for event in world.tick(&input, TICK_MS) {
            match event {
                FrameEvent::EnemyKilled { gold: g, score: s, .. } => {
                    kills += 1;
                    gold += g as u64;
                    score += s as u64;
                }
                FrameEvent::RingCollected { value } => ring_total += value as i64,
                FrameEvent::GateMultiply => ring_total *= 2,
                FrameEvent::GateDivide => ring_total /= 2,
                FrameEvent::PlayerHit { .. } | FrameEvent::PlayerRammed { .. } => hits_taken += 1,
                _ => {}
            }
        }
    }

    println!("--- session summary ---");
    println!("frames:      {frames}");
    println!("waves:       {}", world.spawner.wave);
    println!("kills:       {kills}");
    println!("score:       {score}");
    println!("gold:        {gold}");
    println!("ring total:  {ring_total}");
    println!("hits taken:  {hits_taken}");
    println!(
        "live:        {} enemies, {} rings, {} walls, {} projectiles",
        world.enemies.len(),
        world.rings.len(),
        world.walls.len(),
        world.projectiles.len()
    );
}

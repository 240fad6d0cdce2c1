//! Deterministic frame-stepped simulation
//!
//! One `World::tick` call per rendered frame advances everything in fixed
//! order: spawner decisions, per-entity behavior, collision resolution,
//! pruning of inactive entities.

pub mod bounds;
pub mod collision;
pub mod enemy;
pub mod projectile;
pub mod ring;
pub mod spawner;
pub mod wall;
pub mod wavedef;
pub mod world;

pub use bounds::Bounds;
pub use enemy::{Enemy, EnemyKind};
pub use projectile::{Projectile, ProjectileKind};
pub use ring::{Collected, GateKind, Ring, RingPath};
pub use spawner::{GameMode, Spawner};
pub use wall::{Wall, WallKind};
pub use world::{FrameEvent, TickInput, World};

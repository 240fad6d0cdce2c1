//! Pairwise collision resolution
//!
//! Stateless passes over the entity collections, one entry point per
//! interacting pair-class. The rules are deliberately asymmetric: who blocks
//! whom, who is destroyed, and who passes through depends on the pair, not
//! on geometry alone. Outcomes that matter to the session controller are
//! reported as frame events rather than callbacks.

use crate::consts::WALL_BULLET_PUSH;

use super::bounds::Bounds;
use super::enemy::Enemy;
use super::projectile::Projectile;
use super::ring::{Collected, Ring};
use super::wall::Wall;
use super::world::FrameEvent;

/// Player bullets vs enemies: the first enemy hit consumes the bullet.
/// At most one enemy is hit per bullet per frame.
pub fn bullets_vs_enemies(
    bullets: &mut [Projectile],
    enemies: &mut [Enemy],
    events: &mut Vec<FrameEvent>,
) {
    for bullet in bullets.iter_mut().filter(|b| b.active && b.from_player) {
        let bb = bullet.bounds();
        for enemy in enemies.iter_mut().filter(|e| e.active) {
            if bb.intersects(&enemy.bounds()) {
                bullet.active = false;
                if enemy.take_damage(bullet.damage) {
                    events.push(FrameEvent::EnemyKilled {
                        kind: enemy.kind,
                        gold: enemy.gold,
                        score: enemy.score,
                        elite: enemy.elite,
                    });
                }
                break;
            }
        }
    }
}

/// Player bullets vs rings: bullets pass through and may tag several distinct
/// rings in one pass, but never the same ring twice per flight.
pub fn bullets_vs_rings(
    bullets: &mut [Projectile],
    rings: &mut [Ring],
    increase_cap: i32,
    events: &mut Vec<FrameEvent>,
) {
    for bullet in bullets.iter_mut().filter(|b| b.active && b.from_player) {
        let bb = bullet.bounds();
        for ring in rings.iter_mut().filter(|r| r.active) {
            if bullet.has_hit_ring(ring.id) || !bb.intersects(&ring.bounds()) {
                continue;
            }
            bullet.mark_ring_hit(ring.id);
            if ring.increase_value(increase_cap) {
                events.push(FrameEvent::RingValueRaised { id: ring.id, value: ring.value });
            }
        }
    }
}

/// Player and allies vs rings: overlap collects the ring; the collector is
/// unaffected. A collected ring deactivates, so it credits exactly once.
pub fn collectors_vs_rings(
    player: &Bounds,
    allies: &[Bounds],
    rings: &mut [Ring],
    events: &mut Vec<FrameEvent>,
) {
    for ring in rings.iter_mut().filter(|r| r.active) {
        let rb = ring.bounds();
        let touched = player.intersects(&rb) || allies.iter().any(|a| a.intersects(&rb));
        if touched {
            match ring.collect() {
                Collected::Value(v) => events.push(FrameEvent::RingCollected { value: v }),
                Collected::Multiply => events.push(FrameEvent::GateMultiply),
                Collected::Divide => events.push(FrameEvent::GateDivide),
            }
        }
    }
}

/// Enemy bullets vs the player and allies: first hit consumes the bullet.
/// The player is always checked before allies; at most one ally per bullet.
pub fn enemy_bullets_vs_players(
    bullets: &mut [Projectile],
    player: &Bounds,
    allies: &[Bounds],
    events: &mut Vec<FrameEvent>,
) {
    for bullet in bullets.iter_mut().filter(|b| b.active && !b.from_player) {
        let bb = bullet.bounds();
        if bb.intersects(player) {
            bullet.active = false;
            events.push(FrameEvent::PlayerHit { damage: bullet.damage });
            continue;
        }
        for (index, ally) in allies.iter().enumerate() {
            if bb.intersects(ally) {
                bullet.active = false;
                events.push(FrameEvent::AllyHit { index, damage: bullet.damage });
                break;
            }
        }
    }
}

/// Enemies ramming the player/allies: reported without deactivating the
/// enemy, and without early exit; one enemy may hit several allies at once.
pub fn enemies_vs_players(
    enemies: &[Enemy],
    player: &Bounds,
    allies: &[Bounds],
    events: &mut Vec<FrameEvent>,
) {
    for enemy in enemies.iter().filter(|e| e.active && e.on_screen()) {
        let eb = enemy.bounds();
        if eb.intersects(player) {
            events.push(FrameEvent::PlayerRammed { damage: enemy.bullet_damage });
        }
        for (index, ally) in allies.iter().enumerate() {
            if eb.intersects(ally) {
                events.push(FrameEvent::AllyRammed { index });
            }
        }
    }
}

/// Bullets vs walls, asymmetric by ownership and capability flags. Blocked
/// bullets are consumed; the wall's response depends on its kind: hit-counter
/// walls count the hit, destructible walls take damage, pushable walls take a
/// fixed impulse.
pub fn bullets_vs_walls(
    bullets: &mut [Projectile],
    walls: &mut [Wall],
    events: &mut Vec<FrameEvent>,
) {
    for bullet in bullets.iter_mut().filter(|b| b.active) {
        let bb = bullet.bounds();
        for wall in walls.iter_mut().filter(|w| w.active) {
            let caps = wall.caps();
            let blocked = if bullet.from_player {
                caps.blocks_player_bullets
            } else {
                caps.blocks_enemy_bullets
            };
            if !blocked || !bb.intersects(&wall.bounds()) {
                continue;
            }
            bullet.active = false;
            if caps.hit_counter {
                if bullet.from_player && wall.register_bullet_hit() {
                    events.push(FrameEvent::WallTriggered { id: wall.id });
                }
            } else if caps.destructible {
                if wall.take_damage(bullet.damage) {
                    events.push(FrameEvent::WallDestroyed { kind: wall.kind });
                }
            } else if caps.pushable && bullet.from_player {
                wall.push(WALL_BULLET_PUSH);
            }
            break;
        }
    }
}

/// Player vs walls, a three-way outcome per overlap: boost walls report
/// a non-blocking boost, blocking walls report a hit (the caller decides the
/// penalty), all other overlaps are ignored.
pub fn player_vs_walls(player: &Bounds, walls: &[Wall], events: &mut Vec<FrameEvent>) {
    for wall in walls.iter().filter(|w| w.active) {
        if !player.intersects(&wall.bounds()) {
            continue;
        }
        let caps = wall.caps();
        if caps.boosts {
            events.push(FrameEvent::PlayerBoosted { id: wall.id });
        } else if caps.blocks_player {
            events.push(FrameEvent::PlayerBlocked { kind: wall.kind });
        }
    }
}

/// Allies vs walls: only player-blocking walls crush allies; the first
/// matching wall wins per ally.
pub fn allies_vs_walls(allies: &[Bounds], walls: &[Wall], events: &mut Vec<FrameEvent>) {
    for (index, ally) in allies.iter().enumerate() {
        for wall in walls.iter().filter(|w| w.active) {
            if wall.caps().blocks_player && ally.intersects(&wall.bounds()) {
                events.push(FrameEvent::AllyCrushed { index });
                break;
            }
        }
    }
}

/// Wall stacking: a pushed wall moving upward into a non-pushable wall stops
/// flush against it instead of overlapping, and loses its push velocity.
pub fn walls_vs_walls(walls: &mut [Wall]) {
    let blockers: Vec<(u32, Bounds)> = walls
        .iter()
        .filter(|w| w.active && !w.caps().pushable)
        .map(|w| (w.id, w.bounds()))
        .collect();

    for wall in walls.iter_mut() {
        if !wall.active || !wall.caps().pushable || !wall.moving_up() {
            continue;
        }
        let wb = wall.bounds();
        for (blocker_id, blocker) in &blockers {
            if *blocker_id != wall.id && wb.intersects(blocker) {
                // clamp flush below the blocker, exactly at contact
                wall.pos.y = blocker.bottom() + wall.size.y / 2.0;
                wall.push_velocity = 0.0;
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::ring::{GateKind, RingPath};
    use crate::sim::wall::WallKind;
    use glam::Vec2;

    fn ring_at(id: u32, x: f32, y: f32, value: i32) -> Ring {
        Ring::new(id, Vec2::new(x, y), value, GateKind::Normal, RingPath::Formation { offset_x: 0.0 })
    }

    #[test]
    fn test_bullet_tags_two_rings_once_each() {
        let mut bullets = vec![Projectile::straight(
            1,
            Vec2::new(100.0, 100.0),
            Vec2::new(0.0, -8.0),
            true,
            1.0,
        )];
        // both rings overlap the bullet at once
        let mut rings = vec![ring_at(10, 95.0, 100.0, 0), ring_at(11, 105.0, 100.0, 0)];
        let mut events = Vec::new();

        bullets_vs_rings(&mut bullets, &mut rings, 50, &mut events);
        assert_eq!(rings[0].value, 1);
        assert_eq!(rings[1].value, 1);
        assert!(bullets[0].active, "bullets pass through rings");

        // second pass while still overlapping: no double credit
        bullets_vs_rings(&mut bullets, &mut rings, 50, &mut events);
        assert_eq!(rings[0].value, 1);
        assert_eq!(rings[1].value, 1);
    }

    #[test]
    fn test_bullet_consumed_by_first_enemy_only() {
        let mut bullets = vec![Projectile::straight(
            1,
            Vec2::new(100.0, 300.0),
            Vec2::new(0.0, -8.0),
            true,
            1.0,
        )];
        let mut enemies = vec![
            {
                let mut e = Enemy::new(2, EnemyKind::Swarm, 100.0, 300.0);
                e.entering = false;
                e.pos = Vec2::new(100.0, 300.0);
                e
            },
            {
                let mut e = Enemy::new(3, EnemyKind::Swarm, 100.0, 300.0);
                e.entering = false;
                e.pos = Vec2::new(100.0, 305.0);
                e
            },
        ];
        let mut events = Vec::new();
        bullets_vs_enemies(&mut bullets, &mut enemies, &mut events);

        assert!(!bullets[0].active);
        let killed = enemies.iter().filter(|e| !e.active).count();
        assert_eq!(killed, 1, "one enemy hit per bullet per frame");
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_enemy_bullet_prefers_player_over_allies() {
        let player = Bounds::new(95.0, 295.0, 30.0, 30.0);
        let allies = vec![Bounds::new(95.0, 295.0, 30.0, 30.0)];
        let mut bullets = vec![Projectile::straight(
            1,
            Vec2::new(100.0, 300.0),
            Vec2::new(0.0, 7.0),
            false,
            1.0,
        )];
        let mut events = Vec::new();
        enemy_bullets_vs_players(&mut bullets, &player, &allies, &mut events);
        assert!(!bullets[0].active);
        assert!(matches!(events.as_slice(), [FrameEvent::PlayerHit { .. }]));
    }

    #[test]
    fn test_ramming_reports_all_allies_no_deactivation() {
        let mut enemy = Enemy::new(1, EnemyKind::Ram, 100.0, 300.0);
        enemy.entering = false;
        enemy.pos = Vec2::new(100.0, 300.0);
        let enemies = vec![enemy];
        let player = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let allies = vec![
            Bounds::new(90.0, 290.0, 20.0, 20.0),
            Bounds::new(100.0, 300.0, 20.0, 20.0),
        ];
        let mut events = Vec::new();
        enemies_vs_players(&enemies, &player, &allies, &mut events);
        assert_eq!(events.len(), 2);
        assert!(enemies[0].active);
    }

    #[test]
    fn test_wall_blocks_by_ownership() {
        // Net stops enemy bullets but not player bullets
        let mut walls = vec![Wall::at(1, WallKind::Net, 1, Vec2::new(240.0, 300.0))];
        let mut bullets = vec![
            Projectile::straight(2, Vec2::new(240.0, 300.0), Vec2::new(0.0, -8.0), true, 1.0),
            Projectile::straight(3, Vec2::new(240.0, 300.0), Vec2::new(0.0, 7.0), false, 1.0),
        ];
        let mut events = Vec::new();
        bullets_vs_walls(&mut bullets, &mut walls, &mut events);
        assert!(bullets[0].active, "player bullet passes the net");
        assert!(!bullets[1].active, "enemy bullet is stopped");
    }

    #[test]
    fn test_bullet_pushes_cargo_wall() {
        let mut walls = vec![Wall::at(1, WallKind::Cargo, 1, Vec2::new(240.0, 300.0))];
        let mut bullets = vec![Projectile::straight(
            2,
            Vec2::new(240.0, 300.0),
            Vec2::new(0.0, -8.0),
            true,
            1.0,
        )];
        let mut events = Vec::new();
        bullets_vs_walls(&mut bullets, &mut walls, &mut events);
        assert!(!bullets[0].active);
        assert_eq!(walls[0].push_velocity, WALL_BULLET_PUSH);
    }

    #[test]
    fn test_player_wall_three_way() {
        let walls = vec![
            Wall::at(1, WallKind::BoostPad, 0, Vec2::new(100.0, 300.0)),
            Wall::at(2, WallKind::Solid, 1, Vec2::new(240.0, 500.0)),
            Wall::at(3, WallKind::Net, 2, Vec2::new(400.0, 700.0)),
        ];
        let mut events = Vec::new();

        player_vs_walls(&Bounds::new(90.0, 290.0, 20.0, 20.0), &walls, &mut events);
        assert!(matches!(events.as_slice(), [FrameEvent::PlayerBoosted { .. }]));

        events.clear();
        player_vs_walls(&Bounds::new(230.0, 490.0, 20.0, 20.0), &walls, &mut events);
        assert!(matches!(events.as_slice(), [FrameEvent::PlayerBlocked { .. }]));

        events.clear();
        player_vs_walls(&Bounds::new(390.0, 690.0, 20.0, 20.0), &walls, &mut events);
        assert!(events.is_empty(), "nets ignore the player");
    }

    #[test]
    fn test_ally_crushed_only_by_blocking_walls() {
        let walls = vec![
            Wall::at(1, WallKind::Net, 0, Vec2::new(100.0, 300.0)),
            Wall::at(2, WallKind::Solid, 0, Vec2::new(100.0, 300.0)),
        ];
        let allies = vec![Bounds::new(90.0, 290.0, 20.0, 20.0)];
        let mut events = Vec::new();
        allies_vs_walls(&allies, &walls, &mut events);
        assert_eq!(events.len(), 1, "first blocking wall wins per ally");
        assert!(matches!(events[0], FrameEvent::AllyCrushed { index: 0 }));
    }

    #[test]
    fn test_pushed_wall_stacks_under_blocker() {
        let blocker = Wall::at(1, WallKind::Solid, 1, Vec2::new(240.0, 300.0));
        let blocker_bottom = blocker.bounds().bottom();
        let mut pushed = Wall::at(2, WallKind::Cargo, 1, Vec2::new(240.0, 330.0));
        pushed.push(6.0);
        let mut walls = vec![blocker, pushed];

        walls_vs_walls(&mut walls);
        assert_eq!(walls[1].push_velocity, 0.0);
        let expected_y = blocker_bottom + walls[1].size.y / 2.0;
        assert!((walls[1].pos.y - expected_y).abs() < 1e-5);
    }

    #[test]
    fn test_collect_via_ally() {
        let player = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let allies = vec![Bounds::new(90.0, 290.0, 30.0, 30.0)];
        let mut rings = vec![ring_at(1, 100.0, 300.0, 4)];
        let mut events = Vec::new();
        collectors_vs_rings(&player, &allies, &mut rings, &mut events);
        assert!(matches!(events.as_slice(), [FrameEvent::RingCollected { value: 4 }]));
        assert!(!rings[0].active);
    }
}

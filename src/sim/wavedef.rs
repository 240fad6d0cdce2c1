//! Serializable wave definitions
//!
//! Hand-authored or editor-exported waves load from JSON and instantiate
//! through the same constructors the procedural spawner uses. X coordinates
//! are normalized fractions of the playfield width so definitions survive
//! resolution changes. Unknown type or path tags fall back to the plainest
//! variant instead of failing the load; missing path parameters take the
//! same defaults the spawner uses.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

use super::enemy::{Enemy, EnemyKind, EntryPath};
use super::ring::{GateKind, Ring, RingPath};
use super::wall::{Wall, WallKind};
use super::world::IdAlloc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveDef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enemies: Vec<EnemyDef>,
    #[serde(default)]
    pub rings: Vec<RingDef>,
    #[serde(default)]
    pub walls: Vec<WallDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDef {
    #[serde(default)]
    pub kind: String,
    /// Normalized 0..1 across the playfield
    pub x: f32,
    /// Absolute entry target y
    #[serde(default = "default_target_y")]
    pub y: f32,
    #[serde(default)]
    pub entry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingDef {
    pub x: f32,
    #[serde(default)]
    pub value: i32,
    #[serde(default)]
    pub gate: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub params: PathParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallDef {
    #[serde(default)]
    pub kind: String,
    pub lane: usize,
    #[serde(default)]
    pub hits_required: u32,
}

/// Optional per-path parameters; whichever a path does not use is ignored
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PathParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub width: f32,
    pub height: f32,
    pub period: f32,
    pub radius: f32,
    pub size: f32,
    pub speed: f32,
    pub strength: f32,
    pub direction: f32,
    pub offset_x: f32,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            amplitude: 60.0,
            frequency: 2.0,
            width: 60.0,
            height: 40.0,
            period: 2.0,
            radius: 50.0,
            size: 50.0,
            speed: 2.0,
            strength: 1.0,
            direction: 1.0,
            offset_x: 0.0,
        }
    }
}

fn default_target_y() -> f32 {
    ENTRY_TARGET_Y
}

fn parse_enemy_kind(tag: &str) -> EnemyKind {
    match tag {
        "swarm" => EnemyKind::Swarm,
        "sniper" => EnemyKind::Sniper,
        "carrier" => EnemyKind::Carrier,
        "shield" => EnemyKind::Shield,
        "bus" => EnemyKind::Bus,
        "bomber" => EnemyKind::Bomber,
        "ram" => EnemyKind::Ram,
        "boss" => EnemyKind::Boss,
        _ => EnemyKind::Basic,
    }
}

fn parse_entry_path(tag: &str) -> EntryPath {
    match tag {
        "swoop" => EntryPath::Swoop,
        "spiral" => EntryPath::Spiral,
        "zigzag" => EntryPath::Zigzag,
        _ => EntryPath::Straight,
    }
}

fn parse_gate(tag: &str) -> GateKind {
    match tag {
        "multiply" => GateKind::Multiply,
        "divide" => GateKind::Divide,
        _ => GateKind::Normal,
    }
}

fn parse_ring_path(tag: &str, p: &PathParams) -> RingPath {
    match tag {
        "zigzag" => RingPath::Zigzag { width: p.width, period: p.period },
        "spiral" => RingPath::Spiral { radius: p.radius, frequency: p.frequency },
        "curve" => RingPath::Curve { strength: p.strength, direction: p.direction },
        "weave" => RingPath::Weave { amplitude: p.amplitude, frequency: p.frequency },
        "diamond" => RingPath::Diamond { size: p.size, frequency: p.frequency },
        "figure8" => RingPath::Figure8 { width: p.width, height: p.height, frequency: p.frequency },
        "bounce" => RingPath::Bounce { amplitude: p.amplitude, period: p.period },
        "orbit" => RingPath::Orbit { radius: p.radius, frequency: p.frequency },
        "pendulum" => RingPath::Pendulum { amplitude: p.amplitude, frequency: p.frequency },
        "heart" => RingPath::Heart { size: p.size, frequency: p.frequency },
        "snake" => RingPath::Snake { amplitude: p.amplitude, frequency: p.frequency },
        "chase" => RingPath::Chase { speed: p.speed },
        "random" => RingPath::Random { speed: p.speed },
        "formation" => RingPath::Formation { offset_x: p.offset_x },
        _ => RingPath::Sine { amplitude: p.amplitude, frequency: p.frequency },
    }
}

fn parse_wall_kind(tag: &str) -> WallKind {
    match tag {
        "breakable" => WallKind::Breakable,
        "cargo" => WallKind::Cargo,
        "boost" | "boost_pad" => WallKind::BoostPad,
        "crate" => WallKind::Crate,
        "net" => WallKind::Net,
        "spikes" => WallKind::Spikes,
        _ => WallKind::Solid,
    }
}

impl WaveDef {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build live entities from the definition, pushing them into the
    /// provided collections
    pub fn instantiate(
        &self,
        ids: &mut IdAlloc,
        enemies: &mut Vec<Enemy>,
        rings: &mut Vec<Ring>,
        walls: &mut Vec<Wall>,
    ) {
        for def in &self.enemies {
            let x = (def.x * PLAYFIELD_WIDTH).clamp(0.0, PLAYFIELD_WIDTH);
            let kind = parse_enemy_kind(&def.kind);
            enemies.push(Enemy::new(ids.next(), kind, x, -60.0).with_entry(
                Vec2::new(x, def.y),
                parse_entry_path(&def.entry),
                ENTRY_DURATION_MS,
            ));
        }
        for def in &self.rings {
            let x = (def.x * PLAYFIELD_WIDTH)
                .clamp(RING_EDGE_MARGIN, PLAYFIELD_WIDTH - RING_EDGE_MARGIN);
            rings.push(Ring::new(
                ids.next(),
                Vec2::new(x, -40.0),
                def.value,
                parse_gate(&def.gate),
                parse_ring_path(&def.path, &def.params),
            ));
        }
        for def in &self.walls {
            let lane = def.lane.min(LANE_COUNT - 1);
            let mut wall = Wall::new(ids.next(), parse_wall_kind(&def.kind), lane);
            if def.hits_required > 0 {
                wall = wall.with_hits_required(def.hits_required);
            }
            walls.push(wall);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_definition_round_trip() {
        let json = r#"{
            "name": "opener",
            "enemies": [
                { "kind": "sniper", "x": 0.5, "y": 140.0, "entry": "swoop" },
                { "kind": "swarm", "x": 0.2 }
            ],
            "rings": [
                { "x": 0.25, "value": 4, "path": "zigzag", "params": { "width": 80.0 } },
                { "x": 0.75, "gate": "multiply" }
            ],
            "walls": [
                { "kind": "crate", "lane": 1, "hits_required": 6 }
            ]
        }"#;
        let def = WaveDef::from_json(json).unwrap();
        assert_eq!(def.name, "opener");

        let mut ids = IdAlloc::default();
        let mut enemies = Vec::new();
        let mut rings = Vec::new();
        let mut walls = Vec::new();
        def.instantiate(&mut ids, &mut enemies, &mut rings, &mut walls);

        assert_eq!(enemies.len(), 2);
        assert_eq!(enemies[0].kind, EnemyKind::Sniper);
        assert_eq!(enemies[0].pos.x, 0.5 * PLAYFIELD_WIDTH);
        // omitted y takes the standard entry target
        assert_eq!(enemies[1].entry_target.y, ENTRY_TARGET_Y);

        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].value, 4);
        assert!(matches!(rings[0].path, RingPath::Zigzag { width, .. } if width == 80.0));
        assert_eq!(rings[1].gate, GateKind::Multiply);
        assert_eq!(rings[1].value, 0);

        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].kind, WallKind::Crate);
        assert_eq!(walls[0].hits_required, 6);
    }

    #[test]
    fn test_unknown_tags_fall_back() {
        let json = r#"{
            "enemies": [ { "kind": "dragon", "x": 0.5, "entry": "teleport" } ],
            "rings": [ { "x": 0.5, "value": 3, "path": "comet" } ],
            "walls": [ { "kind": "forcefield", "lane": 0 } ]
        }"#;
        let def = WaveDef::from_json(json).unwrap();
        let mut ids = IdAlloc::default();
        let (mut enemies, mut rings, mut walls) = (Vec::new(), Vec::new(), Vec::new());
        def.instantiate(&mut ids, &mut enemies, &mut rings, &mut walls);
        assert_eq!(enemies[0].kind, EnemyKind::Basic);
        assert!(matches!(rings[0].path, RingPath::Sine { .. }));
        assert_eq!(walls[0].kind, WallKind::Solid);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let json = r#"{
            "rings": [ { "x": 2.0, "value": 500 } ],
            "walls": [ { "kind": "solid", "lane": 9 } ]
        }"#;
        let def = WaveDef::from_json(json).unwrap();
        let mut ids = IdAlloc::default();
        let (mut enemies, mut rings, mut walls) = (Vec::new(), Vec::new(), Vec::new());
        def.instantiate(&mut ids, &mut enemies, &mut rings, &mut walls);
        assert_eq!(rings[0].pos.x, PLAYFIELD_WIDTH - RING_EDGE_MARGIN);
        assert_eq!(rings[0].value, RING_VALUE_MAX);
        assert!(walls[0].lane < LANE_COUNT);
    }

    #[test]
    fn test_empty_definition_is_valid() {
        let def = WaveDef::from_json("{}").unwrap();
        assert!(def.enemies.is_empty() && def.rings.is_empty() && def.walls.is_empty());
    }
}

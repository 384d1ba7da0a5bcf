use serde::{Deserialize, Serialize};

use lightduel_core::player::{Direction, Side};

use crate::Position;
use crate::config::DuelConfig;
use crate::movement::snap_to_grid;

/// Distance of the default spawns from the left and right borders.
const SPAWN_MARGIN: f32 = 5.0;

/// A spawn position with starting direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub position: Position,
    pub direction: Direction,
}

/// Arena definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub walls: bool,
    pub spawn_points: [SpawnPoint; 2],
}

impl Arena {
    pub fn spawn(&self, side: Side) -> SpawnPoint {
        self.spawn_points[side.index()]
    }

    /// True when an axis-aligned box of edge `extent` centred on `pos`
    /// touches or crosses the border.
    pub fn touches_wall(&self, pos: Position, extent: f32) -> bool {
        if !self.walls {
            return false;
        }
        let half = extent / 2.0;
        pos.x - half <= 0.0
            || pos.x + half >= self.width
            || pos.y - half <= 0.0
            || pos.y + half >= self.height
    }
}

/// Build the duel arena: side one on the left facing right, side two on the
/// right facing left, both on the horizontal midline unless overridden.
pub fn create_arena(config: &DuelConfig) -> Arena {
    let mid_y = config.arena_height / 2.0;
    let defaults = [
        SpawnPoint {
            position: Position {
                x: SPAWN_MARGIN.min(config.arena_width / 2.0),
                y: mid_y,
            },
            direction: Direction::Right,
        },
        SpawnPoint {
            position: Position {
                x: (config.arena_width - SPAWN_MARGIN).max(config.arena_width / 2.0),
                y: mid_y,
            },
            direction: Direction::Left,
        },
    ];

    let spawn_points = Side::BOTH.map(|side| {
        let fallback = defaults[side.index()];
        let sc = config.side(side);
        let position = sc
            .spawn
            .map(|(x, y)| Position { x, y })
            .unwrap_or(fallback.position);
        SpawnPoint {
            position: snap_to_grid(position, config.grid_step),
            direction: sc.direction.unwrap_or(fallback.direction),
        }
    });

    Arena {
        width: config.arena_width,
        height: config.arena_height,
        walls: config.arena_walls,
        spawn_points,
    }
}

use serde::{Deserialize, Serialize};

use lightduel_core::player::Direction;

use crate::Position;

/// How a player advances through the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementModel {
    /// Teleports one lattice step per tick; positions stay snapped.
    #[default]
    DiscreteGridStep,
    /// Glides every frame at constant velocity; ticks only steer and stamp.
    ContinuousVelocity,
}

impl MovementModel {
    /// Per-frame displacement between ticks.
    pub fn frame_advance(self, pos: Position, dir: Direction, speed: f32, dt: f32) -> Position {
        match self {
            MovementModel::DiscreteGridStep => pos,
            MovementModel::ContinuousVelocity => step(pos, dir, speed * dt),
        }
    }

    /// Displacement applied on a movement tick.
    pub fn tick_advance(
        self,
        pos: Position,
        dir: Direction,
        speed: f32,
        tick_interval: f32,
        grid_step: f32,
    ) -> Position {
        match self {
            MovementModel::DiscreteGridStep => {
                snap_to_grid(step(pos, dir, speed * tick_interval), grid_step)
            },
            MovementModel::ContinuousVelocity => pos,
        }
    }
}

/// Move `distance` units along `dir`.
pub fn step(pos: Position, dir: Direction, distance: f32) -> Position {
    let (dx, dy) = dir.delta();
    Position {
        x: pos.x + dx * distance,
        y: pos.y + dy * distance,
    }
}

/// Round each axis to the nearest multiple of `grid_step`.
pub fn snap_to_grid(pos: Position, grid_step: f32) -> Position {
    if grid_step <= 0.0 {
        return pos;
    }
    Position {
        x: (pos.x / grid_step).round() * grid_step,
        y: (pos.y / grid_step).round() * grid_step,
    }
}

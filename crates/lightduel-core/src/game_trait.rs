use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LightDuelError;
use crate::player::{Direction, PlayerTag, Side};

/// Core trait for a locally simulated arcade game.
///
/// The host drives it once per frame with the real frame delta and the
/// directional input sampled that frame; the game owns its own clock,
/// fixed-rate ticks and round lifecycle.
pub trait ArcadeGame {
    /// Game metadata for menus and logs.
    fn metadata(&self) -> GameMetadata;

    /// Called each frame with real elapsed seconds. Returns game events.
    fn update(&mut self, dt: f32, input: &FrameInput) -> Vec<GameEvent>;

    /// Serialize the renderable game state.
    fn serialize_state(&self) -> Result<Vec<u8>, LightDuelError>;

    /// Fixed movement tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        10.0
    }

    /// Freeze simulated time.
    fn pause(&mut self);

    /// Unfreeze simulated time.
    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Whether the whole multi-round game has ended.
    fn is_game_over(&self) -> bool;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub min_players: u8,
    pub max_players: u8,
    pub estimated_round_duration: Duration,
}

/// Directional input sampled for both sides in a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub directions: [Option<Direction>; 2],
}

impl FrameInput {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, side: Side, direction: Direction) -> Self {
        self.directions[side.index()] = Some(direction);
        self
    }

    pub fn for_side(&self, side: Side) -> Option<Direction> {
        self.directions[side.index()]
    }
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player crashed this frame.
    PlayerCollided { tag: PlayerTag },
    /// The level was reloaded and a new round started.
    RoundReset,
    /// A life counter ran out. `winner` is a player tag or `"tie"`.
    GameOver { winner: String },
}

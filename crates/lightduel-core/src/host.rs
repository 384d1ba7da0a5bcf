//! Contracts for the host collaborators a match talks to: persisted
//! counters and on-screen text. Rendering reads match snapshots and level
//! reloads are returned as commands, so neither needs a trait here.

use crate::error::LightDuelError;
use crate::player::Side;

/// Small persisted key/value store for integer counters.
///
/// Values survive level reloads. A missing key is a normal condition
/// (first run), not an error.
pub trait LivesStore {
    fn has_key(&self, key: &str) -> bool;

    fn get_int(&self, key: &str) -> Option<i32>;

    fn set_int(&mut self, key: &str, value: i32);

    fn delete_key(&mut self, key: &str);

    /// Flush pending writes to durable storage.
    fn save(&mut self) -> Result<(), LightDuelError>;
}

/// On-screen text outputs of a duel.
pub trait Hud {
    /// Replace the lives line of one side (`"P1 Lives: 3"`).
    fn set_lives_text(&mut self, side: Side, text: &str);

    /// Replace the winner line (`"Winner: Player2!"`).
    fn set_winner_text(&mut self, text: &str);

    fn set_winner_visible(&mut self, visible: bool);

    fn set_game_over_panel_visible(&mut self, visible: bool);
}

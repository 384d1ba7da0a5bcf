use serde::{Deserialize, Serialize};

use lightduel_core::host::Hud;
use lightduel_core::player::Side;

/// Retained HUD state: the latest text and visibility of every output.
/// Hosts render from it; headless runs log each change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextHud {
    pub lives: [String; 2],
    pub winner: String,
    pub winner_visible: bool,
    pub game_over_panel_visible: bool,
}

impl TextHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lives_text(&self, side: Side) -> &str {
        &self.lives[side.index()]
    }
}

impl Hud for TextHud {
    fn set_lives_text(&mut self, side: Side, text: &str) {
        let slot = &mut self.lives[side.index()];
        if slot != text {
            tracing::info!(hud = "lives", ?side, "{text}");
            *slot = text.to_string();
        }
    }

    fn set_winner_text(&mut self, text: &str) {
        tracing::info!(hud = "winner", "{text}");
        self.winner = text.to_string();
    }

    fn set_winner_visible(&mut self, visible: bool) {
        self.winner_visible = visible;
    }

    fn set_game_over_panel_visible(&mut self, visible: bool) {
        if visible && !self.game_over_panel_visible {
            tracing::info!(hud = "game_over", "Game over panel shown");
        }
        self.game_over_panel_visible = visible;
    }
}

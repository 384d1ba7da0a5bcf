use serde::{Deserialize, Serialize};

use lightduel_core::game_trait::FrameInput;
use lightduel_core::player::{Direction, Side};

/// Four-direction key set for one side. Key names are whatever the host's
/// keyboard layer reports (`"W"`, `"ArrowUp"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

impl KeyBindings {
    pub fn wasd() -> Self {
        Self {
            up: "W".to_string(),
            down: "S".to_string(),
            left: "A".to_string(),
            right: "D".to_string(),
        }
    }

    pub fn arrows() -> Self {
        Self {
            up: "ArrowUp".to_string(),
            down: "ArrowDown".to_string(),
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
        }
    }

    pub fn default_for(side: Side) -> Self {
        match side {
            Side::One => Self::wasd(),
            Side::Two => Self::arrows(),
        }
    }

    /// Map the keys held this frame to a direction. When several bound keys
    /// are held, the last in Up, Down, Left, Right order wins.
    pub fn resolve<S: AsRef<str>>(&self, pressed: &[S]) -> Option<Direction> {
        let held = |key: &str| pressed.iter().any(|p| p.as_ref() == key);
        let mut result = None;
        for (key, dir) in [
            (&self.up, Direction::Up),
            (&self.down, Direction::Down),
            (&self.left, Direction::Left),
            (&self.right, Direction::Right),
        ] {
            if held(key) {
                result = Some(dir);
            }
        }
        result
    }
}

/// Build a frame's input for both sides from the keys currently held.
pub fn frame_input_from_keys<S: AsRef<str>>(
    bindings: &[KeyBindings; 2],
    pressed: &[S],
) -> FrameInput {
    let mut input = FrameInput::none();
    for side in Side::BOTH {
        input.directions[side.index()] = bindings[side.index()].resolve(pressed);
    }
    input
}

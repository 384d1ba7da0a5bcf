pub mod error;
pub mod events;
pub mod game_trait;
pub mod host;
pub mod player;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{ArcadeGame, FrameInput, GameEvent};

    /// Run N frames with empty inputs, returning all accumulated events.
    pub fn run_game_frames(game: &mut dyn ArcadeGame, n: usize, dt: f32) -> Vec<GameEvent> {
        let empty = FrameInput::none();
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(dt, &empty));
        }
        all_events
    }

    fn state_bytes(game: &dyn ArcadeGame) -> Vec<u8> {
        game.serialize_state()
            .expect("game state serialization must succeed")
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed(game: &dyn ArcadeGame, before: &[u8]) {
        let after = state_bytes(game);
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every ArcadeGame implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules with a fresh instance.

    /// serialize_state() must return non-empty bytes.
    pub fn contract_state_is_serializable(game: &dyn ArcadeGame) {
        let state = state_bytes(game);
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes"
        );
    }

    /// update() with dt of one tick must change state.
    pub fn contract_update_advances_state(game: &mut dyn ArcadeGame) {
        let before = state_bytes(game);
        let dt = 1.0 / game.tick_rate();
        game.update(dt, &FrameInput::none());
        assert_game_state_changed(game, &before);
    }

    /// pause() must freeze state, resume() must unfreeze it.
    pub fn contract_pause_stops_updates(game: &mut dyn ArcadeGame) {
        let dt = 1.0 / game.tick_rate();
        game.pause();
        assert!(game.is_paused());
        let before = state_bytes(game);
        game.update(dt, &FrameInput::none());
        let during_pause = state_bytes(game);
        assert_eq!(before, during_pause, "State must not change while paused");

        game.resume();
        game.update(dt, &FrameInput::none());
        let after_resume = state_bytes(game);
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }

    /// Running update() long enough with no steering must end the game.
    pub fn contract_game_eventually_ends(game: &mut dyn ArcadeGame, max_frames: usize) {
        let dt = 1.0 / game.tick_rate();
        let empty = FrameInput::none();
        for _ in 0..max_frames {
            game.update(dt, &empty);
            if game.is_game_over() {
                return;
            }
        }
        assert!(
            game.is_game_over(),
            "Game must end within {max_frames} frames"
        );
    }
}

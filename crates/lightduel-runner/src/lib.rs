use std::time::Duration;

use rand::Rng;
use tokio::time::MissedTickBehavior;

use lightduel_core::game_trait::{ArcadeGame, FrameInput, GameEvent};
use lightduel_core::host::{Hud, LivesStore};
use lightduel_core::player::Side;
use lightduel_cycles::DuelMatch;
use lightduel_cycles::bot::generate_bot_input;

/// Outcome of one game driven to its end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub winner: String,
    pub frames: u64,
    pub rounds: u32,
}

/// Bot steering for both sides, computed from the same frame state.
pub fn bot_inputs<S: LivesStore, H: Hud>(duel: &DuelMatch<S, H>, rng: &mut impl Rng) -> FrameInput {
    let view = duel.bot_view();
    let mut input = FrameInput::none();
    for side in Side::BOTH {
        if let Some(dir) = generate_bot_input(&view, side, rng) {
            input = input.with(side, dir);
        }
    }
    input
}

/// Drive `duel` with bots on a fixed frame loop until the game ends.
/// Each frame advances the match by one movement tick. Returns `None` if
/// `max_frames` pass without a winner.
pub async fn run_duel<S: LivesStore, H: Hud>(
    duel: &mut DuelMatch<S, H>,
    rng: &mut impl Rng,
    frame_period: Duration,
    max_frames: u64,
) -> Option<GameSummary> {
    let dt = 1.0 / duel.tick_rate();
    let mut interval = tokio::time::interval(frame_period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut rounds = 1;
    for frame in 1..=max_frames {
        interval.tick().await;

        let input = bot_inputs(duel, rng);
        for event in duel.update(dt, &input) {
            match event {
                GameEvent::PlayerCollided { tag } => {
                    tracing::debug!(frame, %tag, "Collision reported");
                },
                GameEvent::RoundReset => {
                    rounds += 1;
                    tracing::info!(round = rounds, "New round");
                },
                GameEvent::GameOver { winner } => {
                    return Some(GameSummary {
                        winner,
                        frames: frame,
                        rounds,
                    });
                },
            }
        }
    }

    tracing::warn!(max_frames, "Frame limit reached before the game ended");
    None
}

#[cfg(test)]
mod tests {
    use lightduel_cycles::config::DuelConfig;
    use lightduel_cycles::hud::TextHud;
    use lightduel_cycles::lives::{FileLivesStore, MemoryLivesStore, lives_key};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const FAST: Duration = Duration::from_millis(1);

    #[tokio::test]
    async fn bots_play_a_game_to_the_end() {
        let config = DuelConfig {
            initial_lives: 2,
            ..DuelConfig::default()
        };
        let mut duel = DuelMatch::new(config, MemoryLivesStore::new(), TextHud::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let summary = run_duel(&mut duel, &mut rng, FAST, 5_000)
            .await
            .expect("bots must finish a game");

        assert!(duel.is_game_over());
        assert!(["Player1", "Player2", "tie"].contains(&summary.winner.as_str()));
        assert!(summary.rounds >= 2, "two lives take at least two rounds");
        let hud = duel.coordinator().hud();
        assert_eq!(hud.winner, format!("Winner: {}!", summary.winner));
    }

    #[tokio::test]
    async fn frame_limit_stops_the_loop() {
        let mut duel =
            DuelMatch::new(DuelConfig::default(), MemoryLivesStore::new(), TextHud::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(run_duel(&mut duel, &mut rng, FAST, 5).await, None);
        assert!(!duel.is_game_over());
    }

    #[tokio::test]
    async fn file_store_is_cleared_after_game_over() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lives.json");
        let config = DuelConfig {
            initial_lives: 1,
            ..DuelConfig::default()
        };
        let store = FileLivesStore::open(&path).unwrap();
        let mut duel = DuelMatch::new(config, store, TextHud::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        run_duel(&mut duel, &mut rng, FAST, 5_000).await.unwrap();

        let reopened = FileLivesStore::open(&path).unwrap();
        assert!(!reopened.has_key(lives_key(Side::One)));
        assert!(!reopened.has_key(lives_key(Side::Two)));
    }
}

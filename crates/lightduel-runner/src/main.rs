use std::process::ExitCode;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use lightduel_core::game_trait::ArcadeGame;
use lightduel_cycles::DuelMatch;
use lightduel_cycles::config::DuelConfig;
use lightduel_cycles::hud::TextHud;
use lightduel_cycles::lives::FileLivesStore;
use lightduel_runner::run_duel;

/// Upper bound on frames per game; a duel on the default arena ends long before.
const MAX_FRAMES_PER_GAME: u64 = 100_000;

fn arg_value(name: &str) -> Option<String> {
    let prefix = format!("--{name}=");
    std::env::args().find_map(|a| a.strip_prefix(&prefix).map(String::from))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let games = arg_value("games")
        .and_then(|g| g.parse::<u32>().ok())
        .unwrap_or(1);
    let lives_path = arg_value("lives-file")
        .or_else(|| std::env::var("LIGHTDUEL_LIVES_FILE").ok())
        .unwrap_or_else(|| "lightduel-lives.json".to_string());

    let config = DuelConfig::load();

    let store = match FileLivesStore::open(&lives_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(path = %lives_path, error = %e, "Cannot open lives store");
            return ExitCode::FAILURE;
        },
    };
    let mut duel = match DuelMatch::new(config, store, TextHud::new()) {
        Ok(duel) => duel,
        Err(e) => {
            tracing::error!(error = %e, "Invalid duel configuration");
            return ExitCode::FAILURE;
        },
    };

    let frame_period = Duration::from_secs_f32(duel.config().tick_interval_secs);
    tracing::info!(game = %duel.metadata().name, games, "LightDuel runner starting");
    let mut rng = rand::rng();

    for game in 1..=games {
        if game > 1 {
            duel.restart_game_full();
        }
        tokio::select! {
            summary = run_duel(&mut duel, &mut rng, frame_period, MAX_FRAMES_PER_GAME) => {
                match summary {
                    Some(s) => tracing::info!(
                        game,
                        winner = %s.winner,
                        rounds = s.rounds,
                        frames = s.frames,
                        "Game finished"
                    ),
                    None => tracing::warn!(game, "Game abandoned"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
        }
    }

    ExitCode::SUCCESS
}

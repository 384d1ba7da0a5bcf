use serde::{Deserialize, Serialize};

use lightduel_core::events::{CollisionBus, CollisionSubscription};
use lightduel_core::host::{Hud, LivesStore};
use lightduel_core::player::{PlayerTag, Side};
use lightduel_core::time::SimClock;

use crate::agent::PlayerAgent;
use crate::config::DuelConfig;
use crate::lives::lives_key;

/// Winner text when both players run out of lives together.
pub const TIE: &str = "tie";

/// Round lifecycle, owned by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Running,
    /// A crash ended the round; the level reloads after the delay.
    PausedForEnd,
    /// A life counter ran out. Terminal until a full restart.
    GameOver,
}

/// Requests the coordinator hands back to the match host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCommand {
    /// Rebuild the level and start a new round.
    ReloadLevel,
}

/// How a batch of collisions was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Lives were taken and a reload is scheduled.
    Continue,
    GameOver { winner: String },
}

/// Tracks lives across rounds and decides between a delayed reload and the
/// end of the game.
pub struct RoundCoordinator<S: LivesStore, H: Hud> {
    store: S,
    hud: H,
    subscription: CollisionSubscription,
    tags: [PlayerTag; 2],
    labels: [String; 2],
    initial_lives: i32,
    reload_delay: f32,
    lives: [i32; 2],
    state: RoundState,
    winner: Option<String>,
    reload_timer: Option<f32>,
}

impl<S: LivesStore, H: Hud> RoundCoordinator<S, H> {
    pub fn new(config: &DuelConfig, bus: &CollisionBus, store: S, hud: H) -> Self {
        Self {
            store,
            hud,
            subscription: bus.subscribe(),
            tags: Side::BOTH.map(|side| config.tag(side).to_string()),
            labels: Side::BOTH.map(|side| config.side(side).label.clone()),
            initial_lives: config.initial_lives,
            reload_delay: config.reload_delay_secs,
            lives: [config.initial_lives; 2],
            state: RoundState::Running,
            winner: None,
            reload_timer: None,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn lives(&self, side: Side) -> i32 {
        self.lives[side.index()]
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    /// Seconds left before the scheduled reload, if one is pending.
    pub fn reload_remaining(&self) -> Option<f32> {
        self.reload_timer
    }

    fn side_of(&self, tag: &str) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.tags[side.index()] == tag)
    }

    /// Start a round: seed the counters on a first run, load them, put both
    /// agents back on their spawns and unfreeze the clock.
    pub fn initialize_round(&mut self, clock: &mut SimClock, agents: &mut [PlayerAgent; 2]) {
        // The counters are written and deleted as a pair; a missing one means
        // a fresh game, so both start over.
        let first_run = Side::BOTH
            .into_iter()
            .any(|side| !self.store.has_key(lives_key(side)));
        if first_run {
            for side in Side::BOTH {
                self.store.set_int(lives_key(side), self.initial_lives);
            }
            self.save_store();
        }

        for side in Side::BOTH {
            self.lives[side.index()] = self
                .store
                .get_int(lives_key(side))
                .unwrap_or(self.initial_lives);
        }
        self.refresh_lives_hud();

        for agent in agents.iter_mut() {
            agent.reset_visuals();
        }

        self.hud.set_winner_visible(false);
        self.hud.set_game_over_panel_visible(false);
        self.state = RoundState::Running;
        self.winner = None;
        self.reload_timer = None;
        clock.resume();

        let stale = self.subscription.drain();
        if !stale.is_empty() {
            tracing::debug!(dropped = stale.len(), "Dropped stale collision events");
        }

        tracing::info!(
            p1_lives = self.lives[0],
            p2_lives = self.lives[1],
            "Round started"
        );
    }

    /// Handle one collision notification on its own.
    pub fn on_player_collided(&mut self, tag: &str, clock: &mut SimClock) -> Option<RoundOutcome> {
        match self.side_of(tag) {
            Some(side) => self.resolve(&[side], clock),
            None => {
                tracing::warn!(tag, "Collision from unknown player tag ignored");
                None
            },
        }
    }

    /// Drain every collision published since the last pump and resolve them
    /// together, so players crashing in the same frame lose a life each.
    pub fn pump(&mut self, clock: &mut SimClock) -> Option<RoundOutcome> {
        let mut sides = Vec::with_capacity(2);
        for event in self.subscription.drain() {
            match self.side_of(&event.tag) {
                Some(side) if !sides.contains(&side) => sides.push(side),
                Some(_) => {},
                None => {
                    tracing::warn!(tag = %event.tag, "Collision from unknown player tag ignored");
                },
            }
        }
        if sides.is_empty() {
            return None;
        }
        self.resolve(&sides, clock)
    }

    fn resolve(&mut self, sides: &[Side], clock: &mut SimClock) -> Option<RoundOutcome> {
        if self.state != RoundState::Running {
            tracing::debug!(state = ?self.state, "Collision after round end ignored");
            return None;
        }

        clock.pause();
        for &side in sides {
            let lives = &mut self.lives[side.index()];
            *lives = (*lives - 1).max(0);
        }
        for side in Side::BOTH {
            self.store.set_int(lives_key(side), self.lives[side.index()]);
        }
        self.save_store();
        self.refresh_lives_hud();

        let [one, two] = self.lives;
        if one <= 0 || two <= 0 {
            let winner = match (one <= 0, two <= 0) {
                (true, true) => TIE.to_string(),
                (true, false) => self.tags[Side::Two.index()].clone(),
                _ => self.tags[Side::One.index()].clone(),
            };
            self.hud.set_winner_text(&format!("Winner: {winner}!"));
            self.hud.set_winner_visible(true);
            self.hud.set_game_over_panel_visible(true);
            self.reset_persisted_lives();
            self.state = RoundState::GameOver;
            self.reload_timer = None;
            self.winner = Some(winner.clone());
            tracing::info!(%winner, "Game over");
            return Some(RoundOutcome::GameOver { winner });
        }

        self.state = RoundState::PausedForEnd;
        self.reload_timer = Some(self.reload_delay);
        tracing::info!(
            p1_lives = one,
            p2_lives = two,
            delay = self.reload_delay,
            "Round ended, reload scheduled"
        );
        Some(RoundOutcome::Continue)
    }

    /// Advance the reload timer by real (unscaled) seconds.
    pub fn update(&mut self, real_dt: f32, out: &mut Vec<RoundCommand>) {
        let Some(remaining) = self.reload_timer.as_mut() else {
            return;
        };
        *remaining -= real_dt.max(0.0);
        if *remaining <= 0.0 {
            self.reload_timer = None;
            out.push(RoundCommand::ReloadLevel);
        }
    }

    /// Forget all progress and start over from the starting lives.
    pub fn restart_game_full(&mut self, clock: &mut SimClock, out: &mut Vec<RoundCommand>) {
        tracing::info!(state = ?self.state, "Full restart requested");
        self.reset_persisted_lives();
        self.reload_timer = None;
        clock.resume();
        out.push(RoundCommand::ReloadLevel);
    }

    /// Delete the persisted counters. The next round starts from the
    /// configured starting lives.
    pub fn reset_persisted_lives(&mut self) {
        for side in Side::BOTH {
            self.store.delete_key(lives_key(side));
        }
        self.save_store();
    }

    fn refresh_lives_hud(&mut self) {
        for side in Side::BOTH {
            let text = format!(
                "{} Lives: {}",
                self.labels[side.index()],
                self.lives[side.index()].max(0)
            );
            self.hud.set_lives_text(side, &text);
        }
    }

    fn save_store(&mut self) {
        if let Err(e) = self.store.save() {
            tracing::warn!(error = %e, "Failed to save lives");
        }
    }
}

pub mod agent;
pub mod arena;
pub mod bot;
pub mod collision;
pub mod config;
pub mod coordinator;
pub mod hud;
pub mod input;
pub mod lives;
pub mod movement;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use lightduel_core::error::LightDuelError;
use lightduel_core::events::CollisionBus;
use lightduel_core::game_trait::{ArcadeGame, FrameInput, GameEvent, GameMetadata};
use lightduel_core::host::{Hud, LivesStore};
use lightduel_core::player::Side;
use lightduel_core::time::SimClock;

use agent::{AgentSettings, AgentSnapshot, PlayerAgent};
use arena::{Arena, create_arena};
use bot::BotView;
use collision::{CollisionRules, detect_contacts};
use config::DuelConfig;
use coordinator::{RoundCommand, RoundCoordinator, RoundOutcome, RoundState};
use input::{KeyBindings, frame_input_from_keys};

/// A point in arena space. `y` grows upwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// A trail marker left behind a player. Solid for both players.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailSegment {
    pub owner: Side,
    pub position: Position,
    /// Distance the owner had travelled when the segment was stamped.
    pub travelled: f32,
}

/// Renderable state of a whole match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub arena_width: f32,
    pub arena_height: f32,
    pub players: Vec<AgentSnapshot>,
    pub lives: [i32; 2],
    pub round: RoundState,
    pub winner: Option<String>,
    pub paused: bool,
}

/// A local two-player duel: both agents, the arena, the shared clock and
/// the round coordinator, driven one frame at a time.
pub struct DuelMatch<S: LivesStore, H: Hud> {
    config: DuelConfig,
    arena: Arena,
    rules: CollisionRules,
    bindings: [KeyBindings; 2],
    clock: SimClock,
    bus: CollisionBus,
    agents: [PlayerAgent; 2],
    coordinator: RoundCoordinator<S, H>,
}

fn spawn_agents(config: &DuelConfig, arena: &Arena, bus: &CollisionBus) -> [PlayerAgent; 2] {
    Side::BOTH.map(|side| {
        PlayerAgent::new(
            AgentSettings::from_config(config, arena, side),
            bus.publisher(),
        )
    })
}

impl<S: LivesStore, H: Hud> DuelMatch<S, H> {
    /// Validate the config and start the first round.
    pub fn new(config: DuelConfig, store: S, hud: H) -> Result<Self, LightDuelError> {
        config.validate()?;
        let arena = create_arena(&config);
        let bus = CollisionBus::new();
        let agents = spawn_agents(&config, &arena, &bus);
        let coordinator = RoundCoordinator::new(&config, &bus, store, hud);

        let mut duel = Self {
            rules: config.collision_rules(),
            bindings: Side::BOTH.map(|side| config.keys(side)),
            config,
            arena,
            clock: SimClock::new(),
            bus,
            agents,
            coordinator,
        };
        duel.coordinator.initialize_round(&mut duel.clock, &mut duel.agents);
        tracing::info!(
            model = ?duel.config.movement_model,
            lives = duel.config.initial_lives,
            width = duel.arena.width,
            height = duel.arena.height,
            "Duel created"
        );
        Ok(duel)
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn agents(&self) -> &[PlayerAgent; 2] {
        &self.agents
    }

    pub fn coordinator(&self) -> &RoundCoordinator<S, H> {
        &self.coordinator
    }

    pub fn round_state(&self) -> RoundState {
        self.coordinator.state()
    }

    /// What a bot needs to steer in this match.
    pub fn bot_view(&self) -> BotView<'_> {
        BotView {
            agents: &self.agents,
            arena: &self.arena,
            rules: self.rules,
            grid_step: self.config.grid_step,
        }
    }

    /// Build a frame's input from the names of the keys held down.
    pub fn input_from_keys<K: AsRef<str>>(&self, pressed: &[K]) -> FrameInput {
        frame_input_from_keys(&self.bindings, pressed)
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            arena_width: self.arena.width,
            arena_height: self.arena.height,
            players: self.agents.iter().map(PlayerAgent::snapshot).collect(),
            lives: Side::BOTH.map(|side| self.coordinator.lives(side)),
            round: self.coordinator.state(),
            winner: self.coordinator.winner().map(str::to_string),
            paused: self.clock.is_paused(),
        }
    }

    /// Wipe persisted lives and start over from a fresh level.
    pub fn restart_game_full(&mut self) {
        let mut commands = Vec::new();
        self.coordinator.restart_game_full(&mut self.clock, &mut commands);
        self.run_commands(commands, &mut Vec::new());
    }

    fn run_commands(&mut self, commands: Vec<RoundCommand>, events: &mut Vec<GameEvent>) {
        for command in commands {
            match command {
                RoundCommand::ReloadLevel => {
                    self.reload_level();
                    events.push(GameEvent::RoundReset);
                },
            }
        }
    }

    fn reload_level(&mut self) {
        tracing::debug!("Reloading level");
        self.agents = spawn_agents(&self.config, &self.arena, &self.bus);
        self.coordinator.initialize_round(&mut self.clock, &mut self.agents);
    }

    /// Advance both agents by `sim_dt`, in sub-steps of at most one tick so
    /// every tick is checked for contacts. Stops at the first crash.
    fn step_agents(&mut self, sim_dt: f32, input: &FrameInput, events: &mut Vec<GameEvent>) {
        for agent in &mut self.agents {
            agent.poll_input(input.for_side(agent.side()));
        }

        let max_step = self.config.tick_interval_secs;
        let mut remaining = sim_dt;
        while remaining > 0.0 {
            let dt = remaining.min(max_step);
            remaining -= dt;

            for agent in &mut self.agents {
                agent.update(dt, &self.clock);
            }

            let contacts = detect_contacts(&self.agents, &self.arena, &self.rules);
            let mut crashed = false;
            for (agent, contact) in self.agents.iter_mut().zip(contacts) {
                if let Some(other) = contact
                    && agent.on_collision(other)
                {
                    crashed = true;
                    events.push(GameEvent::PlayerCollided {
                        tag: agent.tag().to_string(),
                    });
                }
            }
            if crashed {
                break;
            }
        }
    }
}

impl<S: LivesStore, H: Hud> ArcadeGame for DuelMatch<S, H> {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "LightDuel".to_string(),
            description: "Two light cycles, one arena. Don't touch a trail.".to_string(),
            min_players: 2,
            max_players: 2,
            estimated_round_duration: Duration::from_secs(30),
        }
    }

    fn tick_rate(&self) -> f32 {
        1.0 / self.config.tick_interval_secs
    }

    fn update(&mut self, dt: f32, input: &FrameInput) -> Vec<GameEvent> {
        let mut events = Vec::new();

        // Reload timers run on real time, even while the clock is frozen
        let mut commands = Vec::new();
        self.coordinator.update(dt, &mut commands);
        self.run_commands(commands, &mut events);

        let sim_dt = self.clock.advance(dt);
        if !self.clock.is_paused() {
            self.step_agents(sim_dt, input, &mut events);
        }

        if let Some(RoundOutcome::GameOver { winner }) = self.coordinator.pump(&mut self.clock) {
            events.push(GameEvent::GameOver { winner });
        }

        events
    }

    fn serialize_state(&self) -> Result<Vec<u8>, LightDuelError> {
        Ok(rmp_serde::to_vec(&self.snapshot())?)
    }

    fn pause(&mut self) {
        self.clock.pause();
    }

    fn resume(&mut self) {
        // A finished round stays frozen until the coordinator restarts it
        if self.coordinator.state() != RoundState::Running {
            tracing::debug!(state = ?self.coordinator.state(), "Resume ignored");
            return;
        }
        self.clock.resume();
    }

    fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    fn is_game_over(&self) -> bool {
        self.coordinator.state() == RoundState::GameOver
    }
}

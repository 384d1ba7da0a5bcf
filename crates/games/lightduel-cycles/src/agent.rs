use serde::{Deserialize, Serialize};

use lightduel_core::events::{ColliderTag, CollisionPublisher};
use lightduel_core::player::{Direction, PlayerTag, Side};
use lightduel_core::time::SimClock;

use crate::arena::{Arena, SpawnPoint};
use crate::config::DuelConfig;
use crate::movement::MovementModel;
use crate::{Position, TrailSegment};

/// Fixed settings a player agent is built with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    pub side: Side,
    pub tag: PlayerTag,
    pub spawn: SpawnPoint,
    pub model: MovementModel,
    pub speed: f32,
    pub tick_interval: f32,
    pub grid_step: f32,
}

impl AgentSettings {
    pub fn from_config(config: &DuelConfig, arena: &Arena, side: Side) -> Self {
        Self {
            side,
            tag: config.tag(side).to_string(),
            spawn: arena.spawn(side),
            model: config.movement_model,
            speed: config.speed,
            tick_interval: config.tick_interval_secs,
            grid_step: config.grid_step,
        }
    }
}

/// Fixed-interval scheduling state of an agent's movement ticks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickLoop {
    running: bool,
    accumulator: f32,
    starts: u32,
}

impl TickLoop {
    /// Start the loop. Returns false (and changes nothing) if already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.accumulator = 0.0;
        self.starts += 1;
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// How many times the loop has been (re)started.
    pub fn starts(&self) -> u32 {
        self.starts
    }
}

/// Renderable view of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub side: Side,
    pub tag: PlayerTag,
    pub position: Position,
    pub rotation: f32,
    pub direction: Direction,
    pub moving: bool,
    pub trail: Vec<Position>,
}

/// One player: position, facing, tick timing, trail emission and its
/// reaction to crashes.
#[derive(Debug)]
pub struct PlayerAgent {
    settings: AgentSettings,
    position: Position,
    committed: Direction,
    pending: Direction,
    rotation: f32,
    movement_enabled: bool,
    trail_enabled: bool,
    tick_loop: TickLoop,
    trail: Vec<TrailSegment>,
    ticks: u64,
    travelled: f32,
    crashed_into: Option<ColliderTag>,
    publisher: CollisionPublisher,
}

impl PlayerAgent {
    /// Create an agent at its spawn. Its tick loop stays stopped until the
    /// first `reset_visuals`.
    pub fn new(settings: AgentSettings, publisher: CollisionPublisher) -> Self {
        let spawn = settings.spawn;
        Self {
            settings,
            position: spawn.position,
            committed: spawn.direction,
            pending: spawn.direction,
            rotation: spawn.direction.rotation_degrees(),
            movement_enabled: true,
            trail_enabled: true,
            tick_loop: TickLoop::default(),
            trail: Vec::new(),
            ticks: 0,
            travelled: 0.0,
            crashed_into: None,
            publisher,
        }
    }

    pub fn side(&self) -> Side {
        self.settings.side
    }

    pub fn tag(&self) -> &str {
        &self.settings.tag
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.committed
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn is_moving(&self) -> bool {
        self.movement_enabled
    }

    pub fn tick_loop(&self) -> &TickLoop {
        &self.tick_loop
    }

    pub fn trail(&self) -> &[TrailSegment] {
        &self.trail
    }

    /// Movement ticks performed since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total distance moved since the last reset.
    pub fn travelled(&self) -> f32 {
        self.travelled
    }

    /// What this agent crashed into, if it has crashed this round.
    pub fn crashed_into(&self) -> Option<ColliderTag> {
        self.crashed_into
    }

    /// Record this frame's directional intent. A reversal of the committed
    /// direction is rejected outright; anything else replaces the pending
    /// direction until the next tick.
    pub fn poll_input(&mut self, intent: Option<Direction>) {
        let Some(dir) = intent else {
            return;
        };
        if dir.is_opposite(self.committed) {
            tracing::trace!(tag = %self.settings.tag, ?dir, "Rejected reversal input");
            return;
        }
        self.pending = dir;
    }

    /// Per-frame driver: glides continuous movers and runs due ticks. The
    /// glide is split at each tick boundary, so ticks act on the position
    /// the agent has at the tick instant.
    pub fn update(&mut self, dt: f32, clock: &SimClock) {
        if !self.movement_enabled || clock.is_paused() {
            return;
        }

        let mut remaining = dt.max(0.0);
        while self.tick_loop.running {
            let until_tick = self.settings.tick_interval - self.tick_loop.accumulator;
            if remaining < until_tick {
                break;
            }
            self.glide(until_tick);
            remaining -= until_tick;
            self.tick_loop.accumulator = 0.0;
            self.tick(clock);
        }
        if self.tick_loop.running {
            self.tick_loop.accumulator += remaining;
        }
        self.glide(remaining);
    }

    fn glide(&mut self, dt: f32) {
        let settings = &self.settings;
        let next = settings
            .model
            .frame_advance(self.position, self.committed, settings.speed, dt);
        self.move_to(next);
    }

    fn move_to(&mut self, next: Position) {
        self.travelled += (next.x - self.position.x).abs() + (next.y - self.position.y).abs();
        self.position = next;
    }

    /// One fixed-rate movement step. Returns whether the agent acted.
    pub fn tick(&mut self, clock: &SimClock) -> bool {
        if !self.movement_enabled {
            self.tick_loop.stop();
            return false;
        }
        if clock.is_paused() {
            return false;
        }

        self.committed = self.pending;
        self.ticks += 1;

        if self.trail_enabled {
            self.trail.push(TrailSegment {
                owner: self.settings.side,
                position: self.position,
                travelled: self.travelled,
            });
        }

        let next = self.settings.model.tick_advance(
            self.position,
            self.committed,
            self.settings.speed,
            self.settings.tick_interval,
            self.settings.grid_step,
        );
        self.move_to(next);
        self.rotation = self.committed.rotation_degrees();
        true
    }

    /// Whether touching `other` is a crash for this agent: the opponent's
    /// body or trail, its own trail, or a wall. Its own body never is.
    pub fn is_hazard(&self, other: ColliderTag) -> bool {
        match other {
            ColliderTag::Body(side) => side != self.settings.side,
            ColliderTag::Trail(_) | ColliderTag::Wall => true,
        }
    }

    /// React to a physical contact. Only the first hazardous contact of a
    /// round counts; it halts the agent and publishes one collision event.
    /// Returns whether this call triggered the crash.
    pub fn on_collision(&mut self, other: ColliderTag) -> bool {
        if !self.is_hazard(other) || !self.movement_enabled {
            return false;
        }

        self.movement_enabled = false;
        self.trail_enabled = false;
        self.tick_loop.stop();
        self.crashed_into = Some(other);

        tracing::info!(
            tag = %self.settings.tag,
            ?other,
            x = self.position.x,
            y = self.position.y,
            "Player crashed"
        );
        self.publisher.publish(&self.settings.tag);
        true
    }

    /// Put the agent back at its spawn with a clean trail and a running
    /// tick loop.
    pub fn reset_visuals(&mut self) {
        let spawn = self.settings.spawn;
        self.movement_enabled = true;
        self.trail_enabled = true;
        self.crashed_into = None;
        self.trail.clear();
        self.travelled = 0.0;
        self.position = spawn.position;
        self.committed = spawn.direction;
        self.pending = spawn.direction;
        self.rotation = spawn.direction.rotation_degrees();
        self.tick_loop.start();
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            side: self.settings.side,
            tag: self.settings.tag.clone(),
            position: self.position,
            rotation: self.rotation,
            direction: self.committed,
            moving: self.movement_enabled,
            trail: self.trail.iter().map(|s| s.position).collect(),
        }
    }
}

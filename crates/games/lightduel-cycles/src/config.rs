use serde::{Deserialize, Serialize};

use lightduel_core::error::LightDuelError;
use lightduel_core::player::{Direction, Side};

use crate::arena::create_arena;
use crate::collision::{CollisionRules, boxes_overlap};
use crate::input::KeyBindings;
use crate::movement::MovementModel;

/// Per-side identity, spawn and key bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideConfig {
    /// Collision identity tag, unique per side.
    pub tag: String,
    /// Short label used on the lives HUD ("P1").
    pub label: String,
    /// Spawn point override. `None` uses the arena default for the side.
    #[serde(default)]
    pub spawn: Option<(f32, f32)>,
    /// Facing override. `None` uses the arena default for the side.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Key binding override. `None` uses WASD for side one, arrows for two.
    #[serde(default)]
    pub keys: Option<KeyBindings>,
}

impl SideConfig {
    pub fn default_for(side: Side) -> Self {
        match side {
            Side::One => Self {
                tag: "Player1".to_string(),
                label: "P1".to_string(),
                spawn: None,
                direction: None,
                keys: None,
            },
            Side::Two => Self {
                tag: "Player2".to_string(),
                label: "P2".to_string(),
                spawn: None,
                direction: None,
                keys: None,
            },
        }
    }
}

/// Data-driven configuration for a duel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// How players advance between and on ticks.
    pub movement_model: MovementModel,
    /// Seconds of simulated time between movement ticks.
    pub tick_interval_secs: f32,
    /// Movement speed (units/s). One grid step per tick at the defaults.
    pub speed: f32,
    /// Lattice spacing positions are snapped to in the grid model.
    pub grid_step: f32,
    /// Edge length of a player's square collision box.
    pub body_extent: f32,
    /// Edge length of a trail segment's square collision box.
    pub trail_extent: f32,
    /// Arena width.
    pub arena_width: f32,
    /// Arena height.
    pub arena_height: f32,
    /// Whether touching the arena border is a crash.
    pub arena_walls: bool,
    /// Lives each player starts a full game with.
    pub initial_lives: i32,
    /// Real seconds between a non-final crash and the level reload.
    pub reload_delay_secs: f32,
    pub player_one: SideConfig,
    pub player_two: SideConfig,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            movement_model: MovementModel::DiscreteGridStep,
            tick_interval_secs: 0.1,
            speed: 10.0,
            grid_step: 1.0,
            body_extent: 0.9,
            trail_extent: 0.9,
            arena_width: 40.0,
            arena_height: 30.0,
            arena_walls: true,
            initial_lives: 3,
            reload_delay_secs: 1.0,
            player_one: SideConfig::default_for(Side::One),
            player_two: SideConfig::default_for(Side::Two),
        }
    }
}

impl DuelConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("LIGHTDUEL_CONFIG")
            && let Some(config) = Self::from_file(&path)
        {
            return config;
        }
        if let Some(config) = Self::from_file("config/lightduel.toml") {
            return config;
        }
        Self::default()
    }

    fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match toml::from_str::<Self>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path, error = %e, "Ignoring unparsable duel config");
                None
            },
        }
    }

    pub fn side(&self, side: Side) -> &SideConfig {
        match side {
            Side::One => &self.player_one,
            Side::Two => &self.player_two,
        }
    }

    /// Key bindings of the side, falling back to the side's default set.
    pub fn keys(&self, side: Side) -> KeyBindings {
        self.side(side)
            .keys
            .clone()
            .unwrap_or_else(|| KeyBindings::default_for(side))
    }

    /// Tag of the side, as carried by collision events.
    pub fn tag(&self, side: Side) -> &str {
        &self.side(side).tag
    }

    pub fn collision_rules(&self) -> CollisionRules {
        CollisionRules {
            body_extent: self.body_extent,
            trail_extent: self.trail_extent,
        }
    }

    /// Reject configurations the match cannot run with.
    pub fn validate(&self) -> Result<(), LightDuelError> {
        let positive = [
            ("tick_interval_secs", self.tick_interval_secs),
            ("speed", self.speed),
            ("grid_step", self.grid_step),
            ("body_extent", self.body_extent),
            ("trail_extent", self.trail_extent),
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LightDuelError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.reload_delay_secs.is_finite() && self.reload_delay_secs >= 0.0) {
            return Err(LightDuelError::Config(format!(
                "reload_delay_secs must be non-negative, got {}",
                self.reload_delay_secs
            )));
        }
        for side in Side::BOTH {
            let sc = self.side(side);
            if sc.tag.trim().is_empty() {
                return Err(LightDuelError::Config(format!(
                    "player {side:?} has an empty tag"
                )));
            }
            if sc.label.trim().is_empty() {
                return Err(LightDuelError::Config(format!(
                    "player {side:?} has an empty HUD label"
                )));
            }
            if let Some((x, y)) = sc.spawn
                && (!(0.0..=self.arena_width).contains(&x)
                    || !(0.0..=self.arena_height).contains(&y))
            {
                return Err(LightDuelError::Config(format!(
                    "player {side:?} spawn ({x}, {y}) lies outside the {}x{} arena",
                    self.arena_width, self.arena_height
                )));
            }
        }
        if self.movement_model == MovementModel::DiscreteGridStep
            && self.speed * self.tick_interval_secs < self.grid_step / 2.0
        {
            return Err(LightDuelError::Config(format!(
                "speed {} covers less than half a grid step per tick; \
                 grid movers would never leave their cell",
                self.speed
            )));
        }
        let arena = create_arena(self);
        for side in Side::BOTH {
            let spawn = arena.spawn(side).position;
            if arena.touches_wall(spawn, self.body_extent) {
                return Err(LightDuelError::Config(format!(
                    "player {side:?} spawn ({}, {}) touches the arena wall",
                    spawn.x, spawn.y
                )));
            }
        }
        let (one, two) = (arena.spawn(Side::One), arena.spawn(Side::Two));
        if boxes_overlap(one.position, self.body_extent, two.position, self.body_extent) {
            return Err(LightDuelError::Config(format!(
                "spawns ({}, {}) and ({}, {}) overlap",
                one.position.x, one.position.y, two.position.x, two.position.y
            )));
        }
        if self.player_one.tag == self.player_two.tag {
            return Err(LightDuelError::Config(format!(
                "both players use the tag {:?}",
                self.player_one.tag
            )));
        }
        if self.initial_lives <= 0 {
            tracing::warn!(
                initial_lives = self.initial_lives,
                "Starting lives are not positive; the first crash ends the game"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        DuelConfig::default().validate().unwrap();
    }

    #[test]
    fn one_grid_step_per_tick_by_default() {
        let c = DuelConfig::default();
        assert!((c.speed * c.tick_interval_secs - c.grid_step).abs() < 1e-6);
    }

    #[test]
    fn duplicate_tags_rejected() {
        let mut c = DuelConfig::default();
        c.player_two.tag = c.player_one.tag.clone();
        assert!(matches!(c.validate(), Err(LightDuelError::Config(_))));
    }

    #[test]
    fn empty_tag_rejected() {
        let mut c = DuelConfig::default();
        c.player_one.tag = "  ".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn zero_tick_interval_rejected() {
        let c = DuelConfig {
            tick_interval_secs: 0.0,
            ..DuelConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn spawn_outside_arena_rejected() {
        let mut c = DuelConfig::default();
        c.player_two.spawn = Some((100.0, 5.0));
        assert!(c.validate().is_err());
    }

    #[test]
    fn grid_speed_below_half_a_step_rejected() {
        let c = DuelConfig {
            speed: 4.0,
            ..DuelConfig::default()
        };
        assert!(matches!(c.validate(), Err(LightDuelError::Config(_))));

        // Continuous movers still creep forward
        let c = DuelConfig {
            speed: 4.0,
            movement_model: MovementModel::ContinuousVelocity,
            ..DuelConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn spawn_touching_wall_rejected() {
        let mut c = DuelConfig::default();
        c.player_one.spawn = Some((0.0, 15.0));
        assert!(matches!(c.validate(), Err(LightDuelError::Config(_))));

        let mut c = DuelConfig::default();
        c.player_two.spawn = Some((20.0, 30.0));
        assert!(c.validate().is_err());

        // Snapped onto the border row
        let mut c = DuelConfig::default();
        c.player_two.spawn = Some((20.0, 0.3));
        assert!(c.validate().is_err());
    }

    #[test]
    fn border_spawn_allowed_without_walls() {
        let mut c = DuelConfig {
            arena_walls: false,
            ..DuelConfig::default()
        };
        c.player_one.spawn = Some((0.0, 15.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn overlapping_spawns_rejected() {
        let mut c = DuelConfig::default();
        c.player_one.spawn = Some((10.0, 15.0));
        c.player_two.spawn = Some((10.4, 15.0));
        assert!(matches!(c.validate(), Err(LightDuelError::Config(_))));

        c.player_two.spawn = Some((11.0, 15.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_lives_is_allowed() {
        let c = DuelConfig {
            initial_lives: 0,
            ..DuelConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_src = r#"
            movement_model = "continuous_velocity"
            initial_lives = 5

            [player_two]
            tag = "Blue"
            label = "B"
        "#;
        let c: DuelConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(c.movement_model, MovementModel::ContinuousVelocity);
        assert_eq!(c.initial_lives, 5);
        assert_eq!(c.player_two.tag, "Blue");
        assert_eq!(c.player_one.tag, "Player1");
        assert_eq!(c.keys(Side::Two), KeyBindings::arrows());
        assert!((c.tick_interval_secs - 0.1).abs() < f32::EPSILON);
        c.validate().unwrap();
    }

    #[test]
    fn shipped_config_file_is_valid() {
        let c: DuelConfig =
            toml::from_str(include_str!("../../../../config/lightduel.toml")).unwrap();
        c.validate().unwrap();
        assert_eq!(c.initial_lives, 3);
        assert_eq!(c.movement_model, MovementModel::DiscreteGridStep);
    }
}

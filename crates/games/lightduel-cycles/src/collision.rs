use lightduel_core::events::ColliderTag;
use lightduel_core::player::Side;

use crate::Position;
use crate::agent::PlayerAgent;
use crate::arena::Arena;

/// Collision box sizes.
#[derive(Debug, Clone, Copy)]
pub struct CollisionRules {
    pub body_extent: f32,
    pub trail_extent: f32,
}

impl CollisionRules {
    /// Distance an agent must travel past one of its own segments before the
    /// segment becomes solid to it. Along a straight run the body is then
    /// well clear of the segment, so only a real loop back can touch it.
    pub fn self_trail_grace(&self) -> f32 {
        self.body_extent + self.trail_extent
    }
}

/// Whether two axis-aligned squares (centre + edge length) overlap.
/// Boxes that merely share an edge do not.
pub fn boxes_overlap(a: Position, a_extent: f32, b: Position, b_extent: f32) -> bool {
    let reach = (a_extent + b_extent) / 2.0;
    (a.x - b.x).abs() < reach && (a.y - b.y).abs() < reach
}

/// First hazard `agent` is touching, checked in the order: opponent body,
/// opponent trail, own trail, wall.
pub fn find_contact(
    agent: &PlayerAgent,
    opponent: &PlayerAgent,
    arena: &Arena,
    rules: &CollisionRules,
) -> Option<ColliderTag> {
    let pos = agent.position();

    if boxes_overlap(pos, rules.body_extent, opponent.position(), rules.body_extent) {
        return Some(ColliderTag::Body(opponent.side()));
    }

    if opponent
        .trail()
        .iter()
        .any(|seg| boxes_overlap(pos, rules.body_extent, seg.position, rules.trail_extent))
    {
        return Some(ColliderTag::Trail(opponent.side()));
    }

    // Freshly stamped segments still sit under or right behind the body
    let grace = rules.self_trail_grace();
    let own_solid = agent
        .trail()
        .iter()
        .filter(|seg| agent.travelled() - seg.travelled >= grace);
    for seg in own_solid {
        if boxes_overlap(pos, rules.body_extent, seg.position, rules.trail_extent) {
            return Some(ColliderTag::Trail(agent.side()));
        }
    }

    if arena.touches_wall(pos, rules.body_extent) {
        return Some(ColliderTag::Wall);
    }

    None
}

/// Contacts for both sides, computed from the same frame state so neither
/// agent's reaction can influence the other's detection.
pub fn detect_contacts(
    agents: &[PlayerAgent; 2],
    arena: &Arena,
    rules: &CollisionRules,
) -> [Option<ColliderTag>; 2] {
    Side::BOTH.map(|side| {
        let agent = &agents[side.index()];
        if !agent.is_moving() {
            return None;
        }
        find_contact(agent, &agents[side.opponent().index()], arena, rules)
    })
}

#[cfg(test)]
mod tests {
    use lightduel_core::events::CollisionBus;
    use lightduel_core::player::Direction;
    use lightduel_core::time::SimClock;

    use super::*;
    use crate::agent::AgentSettings;
    use crate::arena::create_arena;
    use crate::config::DuelConfig;

    fn rules() -> CollisionRules {
        DuelConfig::default().collision_rules()
    }

    fn setup(config: &DuelConfig) -> ([PlayerAgent; 2], Arena) {
        let bus = CollisionBus::new();
        let arena = create_arena(config);
        let agents = Side::BOTH.map(|side| {
            let mut agent = PlayerAgent::new(
                AgentSettings::from_config(config, &arena, side),
                bus.publisher(),
            );
            agent.reset_visuals();
            agent
        });
        (agents, arena)
    }

    #[test]
    fn overlap_requires_interpenetration() {
        let a = Position { x: 0.0, y: 0.0 };
        assert!(boxes_overlap(a, 0.9, Position { x: 0.5, y: 0.5 }, 0.9));
        assert!(!boxes_overlap(a, 0.9, Position { x: 1.0, y: 0.0 }, 0.9));
        assert!(!boxes_overlap(a, 1.0, Position { x: 1.0, y: 0.0 }, 1.0));
    }

    #[test]
    fn fresh_spawns_touch_nothing() {
        let (agents, arena) = setup(&DuelConfig::default());
        assert_eq!(detect_contacts(&agents, &arena, &rules()), [None, None]);
    }

    #[test]
    fn moving_straight_never_hits_own_trail() {
        let (mut agents, arena) = setup(&DuelConfig::default());
        let clock = SimClock::new();
        for _ in 0..10 {
            agents[0].tick(&clock);
            assert_eq!(find_contact(&agents[0], &agents[1], &arena, &rules()), None);
        }
    }

    #[test]
    fn head_on_meeting_is_mutual() {
        let mut config = DuelConfig::default();
        config.player_one.spawn = Some((10.0, 15.0));
        config.player_two.spawn = Some((12.0, 15.0));
        let (mut agents, arena) = setup(&config);
        let clock = SimClock::new();
        for agent in &mut agents {
            agent.tick(&clock);
        }
        let contacts = detect_contacts(&agents, &arena, &rules());
        assert_eq!(
            contacts,
            [
                Some(ColliderTag::Body(Side::Two)),
                Some(ColliderTag::Body(Side::One))
            ]
        );
    }

    #[test]
    fn driving_into_opponent_trail() {
        let mut config = DuelConfig::default();
        config.player_one.spawn = Some((10.0, 10.0));
        config.player_one.direction = Some(Direction::Up);
        config.player_two.spawn = Some((12.0, 12.0));
        let (mut agents, arena) = setup(&config);
        let clock = SimClock::new();

        // Two stamps (12,12) and (11,12); One steps up, right, then up into (11,12)
        agents[1].tick(&clock);
        agents[1].tick(&clock);
        agents[0].tick(&clock);
        agents[0].poll_input(Some(Direction::Right));
        agents[0].tick(&clock);
        assert_eq!(agents[0].position(), Position { x: 11.0, y: 11.0 });
        assert_eq!(
            find_contact(&agents[0], &agents[1], &arena, &rules()),
            None
        );
        agents[0].poll_input(Some(Direction::Up));
        agents[0].tick(&clock);
        assert_eq!(
            find_contact(&agents[0], &agents[1], &arena, &rules()),
            Some(ColliderTag::Trail(Side::Two))
        );
    }

    #[test]
    fn looping_back_hits_own_trail() {
        let (mut agents, arena) = setup(&DuelConfig::default());
        let clock = SimClock::new();
        for dir in [
            Direction::Right,
            Direction::Up,
            Direction::Left,
            Direction::Down,
        ] {
            agents[0].poll_input(Some(dir));
            agents[0].tick(&clock);
        }
        assert_eq!(
            agents[0].position(),
            agents[0].settings().spawn.position
        );
        assert_eq!(
            find_contact(&agents[0], &agents[1], &arena, &rules()),
            Some(ColliderTag::Trail(Side::One))
        );
    }

    #[test]
    fn wall_contact_at_border() {
        let mut config = DuelConfig::default();
        config.player_one.spawn = Some((1.0, 15.0));
        config.player_one.direction = Some(Direction::Left);
        let (mut agents, arena) = setup(&config);
        let clock = SimClock::new();
        assert_eq!(find_contact(&agents[0], &agents[1], &arena, &rules()), None);
        agents[0].tick(&clock);
        assert_eq!(
            find_contact(&agents[0], &agents[1], &arena, &rules()),
            Some(ColliderTag::Wall)
        );
    }

    #[test]
    fn halted_agents_are_not_checked() {
        let mut config = DuelConfig::default();
        config.player_one.spawn = Some((10.0, 15.0));
        config.player_two.spawn = Some((10.0, 15.0));
        let (mut agents, arena) = setup(&config);
        agents[0].on_collision(ColliderTag::Wall);
        let contacts = detect_contacts(&agents, &arena, &rules());
        assert_eq!(contacts[0], None);
        assert_eq!(contacts[1], Some(ColliderTag::Body(Side::One)));
    }
}

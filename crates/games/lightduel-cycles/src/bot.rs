use rand::Rng;

use lightduel_core::player::{Direction, Side};

use crate::Position;
use crate::agent::PlayerAgent;
use crate::arena::Arena;
use crate::collision::{CollisionRules, boxes_overlap};
use crate::movement::step;

/// Cells of free travel below which the bot starts steering away.
const DANGER_LOOK_AHEAD_CELLS: f32 = 3.0;

/// Probe limit for arenas without walls.
const MAX_PROBE_CELLS: u32 = 200;

/// Chance per frame of a random turn on open ground.
const WANDER_CHANCE: f32 = 0.02;

/// World view the bot steers against.
pub struct BotView<'a> {
    pub agents: &'a [PlayerAgent; 2],
    pub arena: &'a Arena,
    pub rules: CollisionRules,
    pub grid_step: f32,
}

/// Pick a direction for `side`, or `None` to keep going straight.
/// Only ever proposes quarter turns, never a reversal.
pub fn generate_bot_input(
    view: &BotView<'_>,
    side: Side,
    rng: &mut impl Rng,
) -> Option<Direction> {
    let me = &view.agents[side.index()];
    if !me.is_moving() {
        return None;
    }

    let heading = me.direction();
    let pos = me.position();
    let danger = view.grid_step * DANGER_LOOK_AHEAD_CELLS;

    let straight = open_distance(view, side, pos, heading);
    let left_dir = heading.turn_left();
    let right_dir = heading.turn_right();
    let left = open_distance(view, side, pos, left_dir);
    let right = open_distance(view, side, pos, right_dir);

    if straight < danger {
        // Two-step lookahead: travel a little each way, then take the best exit
        let left_score = left + second_step_best(view, side, pos, left_dir, left);
        let right_score = right + second_step_best(view, side, pos, right_dir, right);
        let best = if left_score >= right_score {
            (left_dir, left)
        } else {
            (right_dir, right)
        };
        // Nowhere better to go: stay the course
        if best.1 <= straight {
            return None;
        }
        return Some(best.0);
    }

    if straight > danger * 3.0 && rng.random::<f32>() < WANDER_CHANCE {
        let (dir, open) = if rng.random_bool(0.5) {
            (left_dir, left)
        } else {
            (right_dir, right)
        };
        if open > danger * 3.0 {
            tracing::trace!(?side, ?dir, "Bot wanders");
            return Some(dir);
        }
    }

    None
}

fn second_step_best(
    view: &BotView<'_>,
    side: Side,
    from: Position,
    first_dir: Direction,
    first_open: f32,
) -> f32 {
    let travel = (first_open - view.grid_step)
        .min(view.grid_step * DANGER_LOOK_AHEAD_CELLS)
        .max(0.0);
    let sim = step(from, first_dir, travel);
    let s = open_distance(view, side, sim, first_dir);
    let l = open_distance(view, side, sim, first_dir.turn_left());
    let r = open_distance(view, side, sim, first_dir.turn_right());
    s.max(l).max(r)
}

/// Distance to the first blocked cell in `dir`, probing one grid step at a time.
fn open_distance(view: &BotView<'_>, side: Side, from: Position, dir: Direction) -> f32 {
    for i in 1..=MAX_PROBE_CELLS {
        let dist = view.grid_step * i as f32;
        let probe = step(from, dir, dist);
        if is_blocked(view, side, probe) {
            return dist;
        }
    }
    view.grid_step * MAX_PROBE_CELLS as f32
}

fn is_blocked(view: &BotView<'_>, side: Side, probe: Position) -> bool {
    let rules = &view.rules;
    if view.arena.touches_wall(probe, rules.body_extent) {
        return true;
    }
    let opponent = &view.agents[side.opponent().index()];
    if boxes_overlap(probe, rules.body_extent, opponent.position(), rules.body_extent) {
        return true;
    }
    view.agents.iter().any(|agent| {
        agent
            .trail()
            .iter()
            .any(|seg| boxes_overlap(probe, rules.body_extent, seg.position, rules.trail_extent))
    })
}

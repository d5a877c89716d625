use std::collections::HashSet;

use itertools::Itertools;
use log::{debug, trace, warn};

use super::{
    bonus::{BonusHandler, BonusTracker},
    options::SearchOptions,
    risk::collision_risk,
    world::World,
};
use crate::arena::{
    types::{Coord, Direction},
    utils::manhattan_distance,
};

/// How far one direction's search got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathResult {
    pub path_length:       u32,
    pub final_open_spaces: usize,
}

/// Everything the selection cascade needs to know about one legal
/// direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub direction:         Direction,
    pub path_length:       u32,
    pub final_open_spaces: usize,
    pub open_spaces:       usize,
    pub bonus:             i64,
    pub risk:              i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub will_eat:  bool,
}

/// Open space left where the search stopped: straight on if we still can,
/// otherwise the best legal turn.
fn finalize_path(state: &World) -> usize {
    let heading = state.you.heading;
    if state.can_move(heading) {
        return state.open_spaces(heading);
    }

    Direction::iter()
        .filter(|d| state.can_move(**d))
        .map(|d| state.open_spaces(*d))
        .max()
        .unwrap_or(0)
}

fn check_bonus(
    state: &World,
    tracker: &mut BonusTracker,
    depth: u32,
    food: &HashSet<Coord>,
    options: &SearchOptions,
) {
    let head = state.you.head();

    if state.foes.len() > 1 {
        if options.within(depth, options.head_free_window)
            && !state.is_head_wrapped()
        {
            tracker.head_free();
        }

        if options.within(depth, options.food_window) && food.contains(&head) {
            tracker.food_found(options.food_bonus);
        }

        if options.within(depth, options.middle_window)
            && state.is_moving_to_middle()
        {
            tracker.target_middle();
        }

        if options.within(depth, options.near_collision_window)
            && state
                .foes
                .iter()
                .any(|foe| manhattan_distance(head, foe.head()) == 1)
        {
            tracker.near_collision();
        }
    }

    if options.within(depth, options.kill_window) && state.killed_foe() {
        trace!("predicting a kill {} steps in", options.max_depth - depth);
        tracker.killed();
    }
}

/// Walks forward from `state`, going straight while possible and otherwise
/// turning towards the most open space, until `max_depth` steps have been
/// taken or no move is left.
///
/// Food is checked against `food`, the food known at the start of the tick.
pub fn longest_path(
    state: World,
    tracker: &mut BonusTracker,
    food: &HashSet<Coord>,
    options: &SearchOptions,
) -> PathResult {
    let mut state = state;
    let mut depth = options.max_depth;
    let mut path_length = 0;

    loop {
        if depth == 0 {
            return PathResult {
                path_length,
                final_open_spaces: finalize_path(&state),
            };
        }

        check_bonus(&state, tracker, depth, food, options);

        let heading = state.you.heading;
        let next = if state.can_move(heading) {
            Some(heading)
        } else {
            state.most_open_direction()
        };

        match next {
            Some(direction) => {
                trace!(
                    "depth {depth}: {} going {direction}",
                    state.you.head()
                );
                state = state.project(direction);
                depth -= 1;
                path_length += 1;
            },
            None => {
                trace!(
                    "path ended at {} after {path_length}",
                    state.you.head()
                );
                return PathResult {
                    path_length,
                    final_open_spaces: state.open_spaces(heading),
                };
            },
        }
    }
}

/// Picks one of the candidates. Candidates must be in direction iteration
/// order; later stages may overturn earlier ones.
pub fn select(
    candidates: &[Candidate],
    options: &SearchOptions,
) -> Option<Direction> {
    let first = candidates.first()?;

    // stage a: longest path, with open space allowed to win at the margins
    let mut best = *first;
    let mut max_value = first.path_length;
    let mut max_tiles = first.open_spaces;
    let mut most_final_open_spaces = first.final_open_spaces;
    for candidate in &candidates[1..] {
        if candidate.path_length > max_value {
            max_value = candidate.path_length;
            best = *candidate;
            max_tiles = candidate.open_spaces;
            most_final_open_spaces = candidate.final_open_spaces;
        } else if candidate.final_open_spaces > most_final_open_spaces
            && candidate.open_spaces > max_value as usize
        {
            best = *candidate;
            max_tiles = candidate.open_spaces;
            most_final_open_spaces = candidate.final_open_spaces;
        } else if candidate.open_spaces > max_tiles {
            best = *candidate;
            max_tiles = candidate.open_spaces;
            most_final_open_spaces = candidate.final_open_spaces;
        }
    }

    // stage b: a bigger bonus wins if it gives up nothing
    let mut max_bonus = best.bonus;
    for candidate in candidates {
        if candidate.direction != best.direction
            && candidate.path_length >= max_value
            && candidate.open_spaces >= max_tiles
            && candidate.bonus > max_bonus
        {
            debug!("changed to {} due to bonuses", candidate.direction);
            best = *candidate;
            max_bonus = candidate.bonus;
        }
    }

    // stage c: back off from likely collisions if the path stays decent
    let mut least_risk = best.risk;
    if least_risk > options.risk_threshold {
        let floor = options.risk_fallback_ratio * f64::from(max_value);
        for candidate in candidates {
            if candidate.risk < least_risk
                && f64::from(candidate.path_length) >= floor
            {
                debug!(
                    "changed to {} due to collision risk",
                    candidate.direction
                );
                best = *candidate;
                least_risk = candidate.risk;
            }
        }
    }

    Some(best.direction)
}

/// Runs one full decision pass over `world`.
///
/// A snake with no legal move keeps its heading.
pub fn decide(world: &World, options: &SearchOptions) -> Decision {
    let mut handler = BonusHandler::default();
    let mut candidates = Vec::with_capacity(4);

    for &direction in Direction::iter() {
        if !world.can_move(direction) {
            continue;
        }

        let tracker = handler.add_tracker(direction);
        let result = longest_path(
            world.project(direction),
            tracker,
            &world.food,
            options,
        );

        let candidate = Candidate {
            direction,
            path_length: result.path_length,
            final_open_spaces: result.final_open_spaces,
            open_spaces: world.open_spaces(direction),
            bonus: handler.bonus(direction),
            risk: collision_risk(world, direction),
        };
        debug!(
            "{direction}: path {} (final open {}), {} open, bonus {}, risk {}",
            candidate.path_length,
            candidate.final_open_spaces,
            candidate.open_spaces,
            handler
                .tracker(direction)
                .map_or_else(String::new, ToString::to_string),
            candidate.risk
        );
        candidates.push(candidate);
    }

    let direction = select(&candidates, options).unwrap_or_else(|| {
        warn!(
            "no legal move from {}, keeping heading {}",
            world.you.head(),
            world.you.heading
        );
        world.you.heading
    });

    if !candidates.is_empty() {
        debug!(
            "tick {}: considered [{}], best bonus {}, going {direction}",
            world.tick,
            candidates.iter().map(|c| c.direction).join(", "),
            handler.best_bonus()
        );
    }

    Decision {
        direction,
        will_eat: world.food.contains(&world.you.head().neighbour(direction)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        arena::types::Direction::{Down, Left, Right, Up},
        strategies::solid::{
            snake::Snake,
            world::tests::{snake, world},
        },
    };

    fn candidate(
        direction: Direction,
        path_length: u32,
        final_open_spaces: usize,
        open_spaces: usize,
    ) -> Candidate {
        Candidate {
            direction,
            path_length,
            final_open_spaces,
            open_spaces,
            bonus: 0,
            risk: 0,
        }
    }

    #[test]
    fn nothing_to_select_from() {
        assert_eq!(select(&[], &SearchOptions::default()), None);
    }

    #[test]
    fn longest_path_wins() {
        let candidates = [
            candidate(Up, 12, 50, 50),
            candidate(Down, 30, 10, 40),
            candidate(Left, 20, 10, 40),
        ];
        assert_eq!(select(&candidates, &SearchOptions::default()), Some(Down));
    }

    #[test]
    fn equal_paths_prefer_more_final_space() {
        let candidates =
            [candidate(Up, 30, 10, 50), candidate(Down, 30, 20, 50)];
        assert_eq!(select(&candidates, &SearchOptions::default()), Some(Down));
    }

    #[test]
    fn more_immediate_space_beats_a_longer_path() {
        let candidates = [candidate(Up, 30, 5, 40), candidate(Left, 10, 0, 60)];
        assert_eq!(select(&candidates, &SearchOptions::default()), Some(Left));
    }

    #[test]
    fn final_space_needs_room_beyond_the_best_path() {
        // more final space but fewer open tiles than the best path length
        let candidates =
            [candidate(Up, 30, 5, 20), candidate(Right, 30, 9, 20)];
        assert_eq!(select(&candidates, &SearchOptions::default()), Some(Up));
    }

    #[test]
    fn bonus_overrides_only_without_losing_ground() {
        let options = SearchOptions::default();
        let mut right = candidate(Right, 30, 10, 50);
        right.bonus = 15;
        let up = candidate(Up, 30, 10, 50);
        assert_eq!(select(&[up, right], &options), Some(Right));

        right.open_spaces = 49;
        assert_eq!(select(&[up, right], &options), Some(Up));

        right.open_spaces = 50;
        right.path_length = 29;
        assert_eq!(select(&[up, right], &options), Some(Up));
    }

    #[test]
    fn risk_veto_needs_enough_path() {
        let options = SearchOptions::default();
        let mut up = candidate(Up, 30, 10, 50);
        up.risk = 3;
        let mut left = candidate(Left, 18, 10, 10);
        let mut right = candidate(Right, 25, 10, 10);
        right.risk = 1;

        // both fit under the floor of 18, left is the safest
        assert_eq!(select(&[up, left, right], &options), Some(Left));

        left.path_length = 17;
        assert_eq!(select(&[up, left, right], &options), Some(Right));

        right.path_length = 17;
        assert_eq!(select(&[up, left, right], &options), Some(Up));
    }

    #[test]
    fn risk_of_one_is_tolerated() {
        let mut up = candidate(Up, 30, 10, 50);
        up.risk = 1;
        let down = candidate(Down, 30, 10, 10);
        assert_eq!(select(&[up, down], &SearchOptions::default()), Some(Up));
    }

    #[test]
    fn path_length_never_exceeds_max_depth() {
        let options = SearchOptions::default();
        let w = world(20, 20, snake("me", &[(10, 10)]), vec![], &[]);
        for &d in Direction::iter() {
            let mut tracker = BonusTracker::default();
            let result =
                longest_path(w.project(d), &mut tracker, &w.food, &options);
            assert_eq!(result.path_length, options.max_depth);
        }

        let short = SearchOptions {
            max_depth: 4,
            ..SearchOptions::default()
        };
        let mut tracker = BonusTracker::default();
        let result = longest_path(w.project(Up), &mut tracker, &w.food, &short);
        assert_eq!(result.path_length, 4);
    }

    #[test]
    fn dead_end_stops_the_path() {
        // a one-cell corridor with walls above and below
        let walls: Vec<_> = (0..6).flat_map(|x| [(x, 0), (x, 2)]).collect();
        let me = snake("me", &[(2, 1), (1, 1), (0, 1)]);
        let w = world(6, 3, me, vec![], &walls);
        let mut tracker = BonusTracker::default();
        let result = longest_path(
            w.project(Right),
            &mut tracker,
            &w.food,
            &SearchOptions::default(),
        );
        assert_eq!(result, PathResult {
            path_length:       2,
            final_open_spaces: 0,
        });
    }

    #[test]
    fn kill_is_credited_early_in_the_search() {
        let w = world(
            4,
            3,
            snake("me", &[(2, 0), (3, 0)]),
            vec![snake("foe", &[(1, 1), (0, 1), (0, 0)])],
            &[(1, 0), (0, 2), (1, 2)],
        );
        let mut tracker = BonusTracker::default();
        let options = SearchOptions::default();
        longest_path(w.project(Down), &mut tracker, &w.food, &options);
        assert_eq!(tracker.kill_bonus, 1);
    }

    // heading right along row 10 of a wide board, foes far off in the
    // top rows heading left
    fn open_run(foes: Vec<Snake>) -> World {
        world(40, 20, snake("me", &[(1, 10), (0, 10)]), foes, &[])
    }

    fn far_foes() -> Vec<Snake> {
        vec![
            snake("a", &[(30, 2), (31, 2)]),
            snake("b", &[(30, 4), (31, 4)]),
        ]
    }

    fn run_right(w: &World) -> BonusTracker {
        let mut tracker = BonusTracker::default();
        let result = longest_path(
            w.project(Right),
            &mut tracker,
            &w.food,
            &SearchOptions::default(),
        );
        assert_eq!(result.path_length, 30);
        tracker
    }

    #[test]
    fn open_run_credits_free_head_and_middle_within_their_windows() {
        let tracker = run_right(&open_run(far_foes()));
        assert_eq!(tracker.free_head_spaces, 11);
        assert_eq!(tracker.middle_bonus, 3);
        assert_eq!(tracker.near_collisions, 0);
        assert_eq!(tracker.food_on_path, 0);
        assert_eq!(tracker.kill_bonus, 0);
    }

    #[test]
    fn positional_bonuses_need_more_than_one_foe() {
        let mut lone = far_foes();
        lone.truncate(1);
        let tracker = run_right(&open_run(lone));
        assert_eq!(tracker, BonusTracker::default());
    }

    #[test]
    fn food_beyond_the_window_is_not_credited() {
        // reached on the 25th step
        let mut w = open_run(far_foes());
        w.food.insert(Coord::new(26, 10));
        assert_eq!(run_right(&w).food_on_path, 0);

        // reached on the 21st step, the last one inside the window
        let mut w = open_run(far_foes());
        w.food.insert(Coord::new(22, 10));
        assert_eq!(run_right(&w).food_on_path, 15);
    }

    #[test]
    fn foe_running_alongside_counts_near_collisions() {
        // one row below us, keeping pace the whole way
        let mut foes = far_foes();
        foes.push(snake("c", &[(1, 11), (0, 11)]));
        let tracker = run_right(&open_run(foes));
        assert_eq!(tracker.near_collisions, 11);
        assert_eq!(tracker.free_head_spaces, 0);
    }

    #[test]
    fn boxed_in_keeps_heading() {
        let mut me = snake("me", &[(1, 1), (1, 2)]);
        me.has_eaten = true;
        let w = world(3, 3, me, vec![], &[(0, 1), (2, 1), (1, 0)]);
        let decision = decide(&w, &SearchOptions::default());
        assert_eq!(decision.direction, Up);
        assert!(!decision.will_eat);
    }
}

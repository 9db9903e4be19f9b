// Target selection and move resolution
//
// The per-turn policy has three tiers: chase the nearest reachable food while
// the rival is at least as long as us, intercept the rival's head once we
// hold a length lead, and fall back to the flood-fill scored neighbor when
// neither tier yields a reachable target.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::PolicyConfig;
use crate::grid::{CellState, Grid};
use crate::search;
use crate::types::{Battlesnake, Board, Coord, Direction};

/// The designated rival: the first snake in board order that isn't us.
/// Returns None in a solo game.
pub fn designated_rival<'a>(board: &'a Board, you_id: &str) -> Option<&'a Battlesnake> {
    board.snakes.iter().find(|s| s.id != you_id)
}

/// Chooses the goal cell for this turn.
///
/// Without a sufficient length lead over the rival (or without a rival at
/// all) the target is the nearest reachable food. With the lead, the target
/// is the nearest reachable cell the rival's head could move into next.
/// Returns None when no candidate is reachable.
pub fn select_target(
    board: &Board,
    you: &Battlesnake,
    grid: &Grid,
    policy: &PolicyConfig,
) -> Option<Coord> {
    let rival = designated_rival(board, &you.id);
    let aggressive =
        rival.map_or(false, |r| you.length - r.length >= policy.length_advantage);

    let candidates: Vec<Coord> = if aggressive {
        let rival_head = rival.map(|r| r.head)?;
        grid.neighbors(rival_head)
            .into_iter()
            .filter(|c| grid.get(*c) != CellState::Unsafe && *c != you.head)
            .collect()
    } else {
        board
            .food
            .iter()
            .filter(|c| **c != you.head)
            .copied()
            .collect()
    };

    nearest_reachable(grid, you.head, &candidates)
}

/// Finds the candidate with the shortest path (in steps) from `from`,
/// skipping unreachable candidates. Ties keep the first-encountered
/// candidate in input order.
fn nearest_reachable(grid: &Grid, from: Coord, candidates: &[Coord]) -> Option<Coord> {
    let mut nearest = None;
    let mut best_steps = usize::MAX;
    for &candidate in candidates {
        if let Some(path) = search::search(grid, from, candidate) {
            if path.len() < best_steps {
                best_steps = path.len();
                nearest = Some(candidate);
            }
        }
    }
    nearest
}

/// Converts the chosen target into a cardinal move.
///
/// With a target, the move is the first step of the minimum-cost path to it.
/// Without one (or when the path has degenerated), each passable head
/// neighbor is scored by its flood-fill region size plus its open-cell value
/// and the move is drawn uniformly at random among the maxima. Returns None
/// only when the head is fully enclosed.
pub fn resolve<R: Rng>(
    you: &Battlesnake,
    grid: &Grid,
    target: Option<Coord>,
    rng: &mut R,
) -> Option<Direction> {
    if let Some(goal) = target {
        if let Some(path) = search::search(grid, you.head, goal) {
            if path.len() >= 2 {
                return Direction::from_step(&path[0], &path[1]);
            }
        }
    }

    fallback_move(you.head, grid, rng)
}

/// Picks the locally safest neighbor of `head`: the passable neighbor whose
/// connected free region is largest, uniformly at random among ties.
pub fn fallback_move<R: Rng>(head: Coord, grid: &Grid, rng: &mut R) -> Option<Direction> {
    let mut scored: Vec<(Coord, usize)> = Vec::with_capacity(4);
    for neighbor in grid.neighbors(head) {
        let score = match grid.get(neighbor) {
            CellState::Unsafe => continue,
            CellState::Danger => grid.region_size(neighbor),
            CellState::Open(cost) => cost as usize + grid.region_size(neighbor),
        };
        scored.push((neighbor, score));
    }

    let best = scored.iter().map(|(_, s)| *s).max()?;
    let winners: Vec<Coord> = scored
        .into_iter()
        .filter(|(_, s)| *s == best)
        .map(|(c, _)| c)
        .collect();

    let chosen = winners.choose(rng)?;
    Direction::from_step(&head, chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
        let coords: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 100,
            head: coords[0],
            length: coords.len() as i32,
            body: coords,
        }
    }

    fn board(width: i32, height: i32, food: &[(i32, i32)], snakes: Vec<Battlesnake>) -> Board {
        Board {
            width,
            height,
            food: food.iter().map(|&(x, y)| Coord { x, y }).collect(),
            snakes,
        }
    }

    fn policy() -> PolicyConfig {
        Config::default_hardcoded().policy
    }

    fn turn_grid(board: &Board, you_id: &str) -> Grid {
        let rival_head = designated_rival(board, you_id).map(|r| r.head);
        Grid::build(board, rival_head, &policy())
    }

    #[test]
    fn test_solo_board_targets_nearest_food() {
        // Scenario: 11x11, no rival, single food at (5,5), head at (0,0)
        let you = snake("me", &[(0, 0), (0, 0), (0, 0)]);
        let b = board(11, 11, &[(5, 5)], vec![you.clone()]);
        let grid = turn_grid(&b, "me");

        assert_eq!(select_target(&b, &you, &grid, &policy()), Some(Coord { x: 5, y: 5 }));

        let mut rng = StdRng::seed_from_u64(7);
        let first = resolve(&you, &grid, Some(Coord { x: 5, y: 5 }), &mut rng).unwrap();
        assert!(first == Direction::Right || first == Direction::Up);

        // Tie-break must be deterministic for a fixed grid
        let mut rng2 = StdRng::seed_from_u64(99);
        let again = resolve(&you, &grid, Some(Coord { x: 5, y: 5 }), &mut rng2).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_nearest_food_tie_keeps_input_order() {
        let you = snake("me", &[(0, 0), (0, 0)]);
        // Both foods are three steps away; the first listed must win
        let b = board(7, 7, &[(0, 3), (3, 0)], vec![you.clone()]);
        let grid = turn_grid(&b, "me");

        assert_eq!(select_target(&b, &you, &grid, &policy()), Some(Coord { x: 0, y: 3 }));
    }

    #[test]
    fn test_unreachable_food_is_excluded() {
        let you = snake("me", &[(0, 0), (0, 0)]);
        // Wall off the far corner; only the near food remains reachable
        let wall = snake(
            "w",
            &[(5, 6), (5, 5), (6, 5), (6, 5)],
        );
        let b = board(7, 7, &[(6, 6), (2, 0)], vec![you.clone(), wall]);
        let rival_head = None; // wall snake is scenery here, not the rival
        let grid = Grid::build(&b, rival_head, &policy());

        assert_eq!(
            nearest_reachable(&grid, you.head, &b.food),
            Some(Coord { x: 2, y: 0 })
        );
    }

    #[test]
    fn test_length_lead_switches_to_intercept() {
        // Scenario: we are length 10, rival length 5 nearby; must target one
        // of the rival head's open neighbors instead of the food
        let you = snake(
            "me",
            &[
                (2, 2), (2, 1), (2, 0), (3, 0), (4, 0),
                (5, 0), (6, 0), (7, 0), (8, 0), (9, 0),
            ],
        );
        let rival = snake("them", &[(5, 5), (5, 6), (5, 7), (5, 8), (5, 9)]);
        let b = board(11, 11, &[(0, 10)], vec![you.clone(), rival.clone()]);
        let grid = turn_grid(&b, "me");

        let target = select_target(&b, &you, &grid, &policy()).unwrap();
        let rival_neighbors = grid.neighbors(rival.head);
        assert!(rival_neighbors.contains(&target));
        assert_ne!(target, Coord { x: 0, y: 10 });
    }

    #[test]
    fn test_no_length_lead_stays_on_food() {
        let you = snake("me", &[(2, 2), (2, 1), (2, 0)]);
        let rival = snake("them", &[(8, 8), (8, 7), (8, 6)]);
        let b = board(11, 11, &[(4, 2)], vec![you.clone(), rival]);
        let grid = turn_grid(&b, "me");

        assert_eq!(select_target(&b, &you, &grid, &policy()), Some(Coord { x: 4, y: 2 }));
    }

    #[test]
    fn test_enclosed_rival_and_no_food_yields_no_target() {
        // Scenario: aggressive tier selected, but the rival is boxed in by
        // its own body and there is no food to fall back to
        let you = snake(
            "me",
            &[(8, 1), (8, 2), (8, 3), (8, 4), (8, 5), (8, 6)],
        );
        let rival = snake("them", &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 0)]);
        let b = board(11, 11, &[], vec![you.clone(), rival]);
        let grid = turn_grid(&b, "me");

        assert_eq!(select_target(&b, &you, &grid, &policy()), None);
    }

    #[test]
    fn test_fallback_takes_the_only_open_neighbor() {
        // Scenario: head boxed on three sides, single pocket to the left
        let you = snake(
            "me",
            &[(2, 2), (2, 3), (3, 3), (3, 2), (3, 1), (2, 1), (2, 1)],
        );
        let b = board(5, 5, &[], vec![you.clone()]);
        let grid = Grid::build(&b, None, &policy());

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            fallback_move(you.head, &grid, &mut rng),
            Some(Direction::Left)
        );
    }

    #[test]
    fn test_fallback_prefers_larger_region() {
        let mut grid = Grid::build(&board(7, 7, &[], vec![]), None, &policy());
        // Wall splitting the board: left pocket is 1 cell, right side is big
        let head = Coord { x: 1, y: 0 };
        grid.set(Coord { x: 0, y: 1 }, CellState::Unsafe);
        grid.set(Coord { x: 1, y: 1 }, CellState::Unsafe);
        grid.set(head, CellState::Unsafe);

        let mut rng = StdRng::seed_from_u64(1);
        // Left leads into the 1-cell pocket at (0,0); right opens the rest
        assert_eq!(
            fallback_move(head, &grid, &mut rng),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_fully_enclosed_reports_no_legal_move() {
        let mut grid = Grid::build(&board(5, 5, &[], vec![]), None, &policy());
        let head = Coord { x: 2, y: 2 };
        for neighbor in grid.neighbors(head) {
            grid.set(neighbor, CellState::Unsafe);
        }

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(fallback_move(head, &grid, &mut rng), None);
    }

    #[test]
    fn test_fallback_tie_break_is_pinned_by_seed() {
        let grid = Grid::build(&board(5, 5, &[], vec![]), None, &policy());
        let head = Coord { x: 2, y: 2 };

        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        assert_eq!(
            fallback_move(head, &grid, &mut rng_a),
            fallback_move(head, &grid, &mut rng_b)
        );
    }

    #[test]
    fn test_resolve_follows_path_first_step() {
        let you = snake("me", &[(0, 0), (0, 0)]);
        let b = board(5, 5, &[(3, 0)], vec![you.clone()]);
        let grid = Grid::build(&b, None, &policy());

        let mut rng = StdRng::seed_from_u64(3);
        let dir = resolve(&you, &grid, Some(Coord { x: 3, y: 0 }), &mut rng);
        assert_eq!(dir, Some(Direction::Right));
    }
}

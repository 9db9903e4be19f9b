// Weighted shortest-path search over the occupancy grid
//
// Best-first search with accumulated cell cost plus a Manhattan heuristic.
// Diagonal moves don't exist and the minimum cell cost is 1, so the heuristic
// is admissible. Frontier ties are broken FIFO by insertion order, which keeps
// results reproducible for a fixed grid.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use crate::grid::Grid;
use crate::types::Coord;

#[derive(Debug, PartialEq, Eq)]
struct FrontierEntry {
    f_score: u32,
    seq: u64,
    coord: Coord,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.f_score, self.seq).cmp(&(other.f_score, other.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds the minimum-cost path from `start` to `goal`, both inclusive.
///
/// Only passable cells (positive traversal cost) are ever entered; the start
/// cell itself is exempt since the searcher's own head sits on an occupied
/// cell. Returns None when the goal is unreachable.
pub fn search(grid: &Grid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_list: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut g_score: HashMap<Coord, u32> = HashMap::new();
    let mut seq: u64 = 0;

    g_score.insert(start, 0);
    open_list.push(Reverse(FrontierEntry {
        f_score: start.manhattan_distance(&goal) as u32,
        seq,
        coord: start,
    }));

    while let Some(Reverse(entry)) = open_list.pop() {
        let current = entry.coord;
        if current == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }

        let current_g = g_score[&current];
        for neighbor in grid.neighbors(current) {
            let step_cost = match grid.cost(neighbor) {
                Some(cost) => cost,
                None => continue,
            };
            let tentative_g = current_g + step_cost;
            if g_score
                .get(&neighbor)
                .map_or(true, |&known| tentative_g < known)
            {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g);
                seq += 1;
                open_list.push(Reverse(FrontierEntry {
                    f_score: tentative_g + neighbor.manhattan_distance(&goal) as u32,
                    seq,
                    coord: neighbor,
                }));
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &HashMap<Coord, Coord>, start: Coord, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}

// Per-turn occupancy grid
//
// Rebuilt from scratch from every snapshot: snake bodies become impassable,
// cells next to the rival's head become expensive, and interior cells get a
// small cost bias so equal-length paths prefer the perimeter. The grid is
// owned by the turn's decision and dropped when the move is returned.

use std::collections::HashSet;

use crate::config::PolicyConfig;
use crate::types::{Board, Coord};

/// Traversal state of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Free cell with an explicit traversal cost
    Open(u32),
    /// Cell adjacent to the rival's head; enterable but expensive
    Danger,
    /// Occupied by a snake body segment; never enterable this turn
    Unsafe,
}

/// Owned width x height occupancy grid for a single turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellState>,
    danger_cost: u32,
}

impl Grid {
    /// Builds the occupancy grid for one turn.
    ///
    /// All cells start at the baseline cost. Every snake's body except its
    /// tail segment is marked unsafe (the tail vacates next turn). The
    /// in-bounds neighbors of `rival_head` that are still open are marked as
    /// danger. Finally every open non-border cell gets the interior bias.
    ///
    /// Snapshot consistency (coordinates within the stated dimensions) is a
    /// caller precondition.
    pub fn build(board: &Board, rival_head: Option<Coord>, policy: &PolicyConfig) -> Grid {
        let mut grid = Grid {
            width: board.width,
            height: board.height,
            cells: vec![
                CellState::Open(policy.base_cell_cost);
                (board.width * board.height) as usize
            ],
            danger_cost: policy.danger_cost,
        };

        for snake in &board.snakes {
            if snake.body.is_empty() {
                continue;
            }
            // Tail stays traversable; it moves out of the way next turn
            for segment in &snake.body[..snake.body.len() - 1] {
                grid.set(*segment, CellState::Unsafe);
            }
        }

        if let Some(head) = rival_head {
            for neighbor in grid.neighbors(head) {
                if let CellState::Open(_) = grid.get(neighbor) {
                    grid.set(neighbor, CellState::Danger);
                }
            }
        }

        for y in 1..board.height - 1 {
            for x in 1..board.width - 1 {
                let coord = Coord { x, y };
                if let CellState::Open(cost) = grid.get(coord) {
                    grid.set(coord, CellState::Open(cost + policy.interior_cost_bias));
                }
            }
        }

        grid
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    fn index(&self, coord: Coord) -> usize {
        (coord.y * self.width + coord.x) as usize
    }

    /// Returns the state of an in-bounds cell
    pub fn get(&self, coord: Coord) -> CellState {
        self.cells[self.index(coord)]
    }

    pub fn set(&mut self, coord: Coord, state: CellState) {
        let idx = self.index(coord);
        self.cells[idx] = state;
    }

    /// Traversal cost of entering a cell, or None when the cell is out of
    /// bounds or unsafe
    pub fn cost(&self, coord: Coord) -> Option<u32> {
        if !self.in_bounds(coord) {
            return None;
        }
        match self.get(coord) {
            CellState::Open(cost) => Some(cost),
            CellState::Danger => Some(self.danger_cost),
            CellState::Unsafe => None,
        }
    }

    /// In-bounds cardinal neighbors of a cell, in down/up/left/right order
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        let candidates = [
            Coord { x: coord.x, y: coord.y - 1 },
            Coord { x: coord.x, y: coord.y + 1 },
            Coord { x: coord.x - 1, y: coord.y },
            Coord { x: coord.x + 1, y: coord.y },
        ];
        candidates
            .iter()
            .filter(|c| self.in_bounds(**c))
            .copied()
            .collect()
    }

    /// Size of the connected component of passable cells reachable from
    /// `coord` via cardinal moves, counting `coord` itself. Returns 0 when
    /// the starting cell is itself impassable.
    pub fn region_size(&self, coord: Coord) -> usize {
        if self.cost(coord).is_none() {
            return 0;
        }

        let mut stack = vec![coord];
        let mut visited: HashSet<Coord> = HashSet::new();
        let mut size = 0;

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            size += 1;
            for neighbor in self.neighbors(current) {
                if self.cost(neighbor).is_some() && !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        size
    }
}

// Core decision engine orchestration
//
// One Bot instance lives for the whole server process; every /move request
// gets a fresh grid, target and path derived from that turn's snapshot only.
// The CPU-bound decision runs on a blocking thread while the async side polls
// against the response budget, so a slow search still answers in time with
// the pre-seeded fallback move.

use log::{error, info, warn};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::grid::Grid;
use crate::strategy;
use crate::types::{Battlesnake, Board, Direction, Game};

/// Snapshot contract violations; game conditions (unreachable targets, being
/// boxed in) are never errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("snapshot contains our snake with an empty body")]
    EmptyBody,
    #[error("snapshot board dimensions are not positive: {width}x{height}")]
    BadDimensions { width: i32, height: i32 },
}

/// Sentinel for "no move stored yet"
const NO_MOVE: u8 = u8::MAX;

/// Lock-free state shared between the async poller and the decision engine
#[derive(Debug)]
struct SharedDecisionState {
    best_move: AtomicU8,
    decision_complete: AtomicBool,
}

impl SharedDecisionState {
    fn new() -> Self {
        SharedDecisionState {
            best_move: AtomicU8::new(NO_MOVE),
            decision_complete: AtomicBool::new(false),
        }
    }

    fn store_move(&self, direction: Direction) {
        self.best_move
            .store(direction_to_index(direction), Ordering::Release);
    }

    fn load_move(&self) -> Option<Direction> {
        match self.best_move.load(Ordering::Acquire) {
            NO_MOVE => None,
            idx => Some(index_to_direction(idx)),
        }
    }
}

fn direction_to_index(direction: Direction) -> u8 {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Left => 2,
        Direction::Right => 3,
    }
}

fn index_to_direction(idx: u8) -> Direction {
    match idx {
        0 => Direction::Up,
        1 => Direction::Down,
        2 => Direction::Left,
        _ => Direction::Right,
    }
}

/// Battlesnake bot with methods corresponding to the API endpoints
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    pub fn new(config: Config, debug_logger: DebugLogger) -> Self {
        Bot {
            config,
            debug_logger,
        }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, _game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START");
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, _game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER");
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// Spawns the decision engine on a blocking thread and polls its shared
    /// state until it finishes or the effective budget lapses. The engine
    /// stores the cheap flood-fill fallback before pathfinding, so a budget
    /// overrun still answers with a considered move.
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Result<Value, EngineError> {
        let start_time = Instant::now();
        Self::validate_snapshot(board, you)?;

        let shared = Arc::new(SharedDecisionState::new());
        let shared_clone = shared.clone();

        let board_clone = board.clone();
        let you_clone = you.clone();
        let config = self.config.clone();
        let turn_number = *turn;

        tokio::task::spawn_blocking(move || {
            Bot::compute_decision(&board_clone, &you_clone, &config, turn_number, &shared_clone)
        });

        let effective_budget = self.config.timing.effective_budget_ms();
        let polling_interval = Duration::from_millis(self.config.timing.polling_interval_ms);

        loop {
            tokio::time::sleep(polling_interval).await;

            let elapsed = start_time.elapsed().as_millis() as u64;
            if elapsed >= effective_budget || shared.decision_complete.load(Ordering::Acquire) {
                break;
            }
        }

        let chosen_move = match shared.load_move() {
            Some(direction) => direction,
            None => {
                // Fully enclosed (or the engine never got that far): answer
                // with a best-effort in-bounds move instead of failing
                let forced = Self::forced_move(board, you);
                warn!("Turn {}: no legal move, forcing {}", turn, forced.as_str());
                forced
            }
        };

        info!(
            "MOVE {}: {} ({}ms)",
            turn,
            chosen_move.as_str(),
            start_time.elapsed().as_millis()
        );

        self.debug_logger
            .log_decision(turn_number, board.clone(), chosen_move);

        Ok(json!({ "move": chosen_move.as_str() }))
    }

    fn validate_snapshot(board: &Board, you: &Battlesnake) -> Result<(), EngineError> {
        if board.width <= 0 || board.height <= 0 {
            return Err(EngineError::BadDimensions {
                width: board.width,
                height: board.height,
            });
        }
        if you.body.is_empty() {
            return Err(EngineError::EmptyBody);
        }
        Ok(())
    }

    /// Decision engine, run on a blocking thread. Grid build and the
    /// flood-fill fallback are cheap; the per-candidate path searches
    /// dominate, which is why the fallback is stored first.
    fn compute_decision(
        board: &Board,
        you: &Battlesnake,
        config: &Config,
        turn: i32,
        shared: &SharedDecisionState,
    ) {
        let rival_head = strategy::designated_rival(board, &you.id).map(|r| r.head);
        let grid = Grid::build(board, rival_head, &config.policy);
        let mut rng = rand::rng();

        if let Some(fallback) = strategy::fallback_move(you.head, &grid, &mut rng) {
            shared.store_move(fallback);
        }

        let target = strategy::select_target(board, you, &grid, &config.policy);
        if let Some(goal) = target {
            info!("Turn {}: destination ({},{})", turn, goal.x, goal.y);
        }

        match strategy::resolve(you, &grid, target, &mut rng) {
            Some(direction) => shared.store_move(direction),
            None => error!("Turn {}: fully enclosed, no legal move", turn),
        }

        shared.decision_complete.store(true, Ordering::Release);
    }

    /// Last-resort move when every neighbor is occupied: any in-bounds
    /// direction, however losing, keeps the response well-formed
    fn forced_move(board: &Board, you: &Battlesnake) -> Direction {
        Direction::all()
            .iter()
            .find(|dir| {
                let next = dir.apply(&you.head);
                next.x >= 0 && next.x < board.width && next.y >= 0 && next.y < board.height
            })
            .copied()
            .unwrap_or(Direction::Up)
    }
}

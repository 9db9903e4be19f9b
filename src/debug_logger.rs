// Optional per-turn decision log
//
// Fire-and-forget async writes so the /move response cycle never waits on
// disk. One JSON object per line, suitable for replaying a game offline.

use log::error;
use serde::Serialize;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::DebugConfig;
use crate::types::{Board, Direction};

#[derive(Debug, Serialize)]
struct DecisionLogEntry {
    turn: i32,
    chosen_move: String,
    board: Board,
    timestamp: String,
}

/// Shared decision logger; cloned handles append to the same file
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Opens the log file named in the config, truncating a previous run's
    /// log. Falls back to a disabled logger when the file can't be created.
    pub async fn from_config(config: &DebugConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&config.log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", config.log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!(
                    "Failed to create decision log file '{}': {}",
                    config.log_file_path, e
                );
                Self::disabled()
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    /// Records one turn's decision without blocking the caller
    pub fn log_decision(&self, turn: i32, board: Board, chosen_move: Direction) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        let entry = DecisionLogEntry {
            turn,
            chosen_move: chosen_move.as_str().to_string(),
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DecisionLogEntry) {
        let mut file_guard = file_handle.lock().await;

        let file = match file_guard.as_mut() {
            Some(file) => file,
            None => return,
        };

        let json_line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize decision log entry: {}", e);
                return;
            }
        };

        if let Err(e) = file.write_all(format!("{}\n", json_line).as_bytes()).await {
            error!("Failed to write decision log entry: {}", e);
            return;
        }
        if let Err(e) = file.flush().await {
            error!("Failed to flush decision log: {}", e);
        }
    }
}

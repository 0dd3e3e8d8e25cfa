// Debug logging module for per-tick session traces
//
// Each tick's intents and resulting snapshot are appended to a JSONL file.
// The trace carries everything `replay` needs to re-run the game: seed, mode,
// board size, tick cap and whether the player was on autopilot.

use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::session::SessionSnapshot;
use crate::types::{Direction, GameMode, TickReport};

/// A single line of the tick log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLogEntry {
    pub game_seed: u64,
    pub mode: GameMode,
    pub board_size: i32,
    pub max_ticks: u64,
    pub tick: u64,
    pub autopilot: bool,
    pub player_move: Option<Direction>,
    pub opponent_move: Option<Direction>,
    pub respawned: bool,
    pub snapshot: SessionSnapshot,
    pub timestamp: String,
}

impl TickLogEntry {
    pub fn new(
        game_seed: u64,
        max_ticks: u64,
        autopilot: bool,
        report: &TickReport,
        snapshot: SessionSnapshot,
    ) -> Self {
        TickLogEntry {
            game_seed,
            mode: snapshot.mode,
            board_size: snapshot.board_size,
            max_ticks,
            tick: snapshot.tick,
            autopilot,
            player_move: report.player_intent,
            opponent_move: report.opponent_intent,
            respawned: report.respawned,
            snapshot,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Appends tick entries to a JSONL file; a disabled logger is a no-op
pub struct DebugLogger {
    file: Option<File>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Some(file),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: None,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Writes one entry and flushes; failures are reported and swallowed
    pub fn log_tick(&mut self, entry: &TickLogEntry) {
        if !self.enabled {
            return;
        }
        let Some(file) = self.file.as_mut() else {
            return;
        };

        match serde_json::to_string(entry) {
            Ok(json_line) => {
                if let Err(e) = writeln!(file, "{}", json_line) {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush() {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Bot;
    use crate::config::Config;
    use crate::session::{PlayerControl, Session};
    use std::fs;

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let mut logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());

        let config = Config::default_hardcoded().with_board_size(10);
        let mut session = Session::new(config.clone(), GameMode::Classic, 4).unwrap();
        let report = session.tick(&Bot::new(config), PlayerControl::Autopilot);
        logger.log_tick(&TickLogEntry::new(4, 0, true, &report, session.snapshot()));
    }

    #[test]
    fn test_entries_are_json_lines() {
        let path = std::env::temp_dir().join("snake_arena_debug_logger_unit.jsonl");
        let path_str = path.to_string_lossy().to_string();
        let mut logger = DebugLogger::new(true, &path_str);
        assert!(logger.is_enabled());

        let config = Config::default_hardcoded().with_board_size(12);
        let bot = Bot::new(config.clone());
        let mut session = Session::new(config, GameMode::Classic, 8).unwrap();
        for _ in 0..3 {
            let report = session.tick(&bot, PlayerControl::Autopilot);
            logger.log_tick(&TickLogEntry::new(8, 0, true, &report, session.snapshot()));
        }

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);

        let last: TickLogEntry = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(last.tick, 3);
        assert_eq!(last.mode, GameMode::Classic);
        assert_eq!(last.snapshot, session.snapshot());
        let _ = fs::remove_file(&path);
    }
}

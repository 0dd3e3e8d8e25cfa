// Replay module for verifying tick logs against the current engine
//
// This module provides functionality to:
// 1. Parse JSONL tick logs
// 2. Re-run each logged game from its seed and recorded intents
// 3. Compare logged vs replayed intents and snapshots tick by tick
// 4. Generate summary reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::TickLogEntry;
use crate::session::{PlayerControl, Session};
use crate::types::Direction;

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game_seed: u64,
    pub tick: u64,
    pub original_move: Option<Direction>,
    pub replayed_move: Option<Direction>,
    pub original_opponent_move: Option<Direction>,
    pub replayed_opponent_move: Option<Direction>,
    /// Snapshot (and respawn flag) after the tick equals the logged one
    pub state_matches: bool,
    pub matches: bool,
    pub computation_time_us: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub games: usize,
    pub total_ticks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing tick logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    ///
    /// Board size and tick limit come from the log; every other setting
    /// comes from `config`, so replaying under different weights shows
    /// where decisions would diverge.
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<TickLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: TickLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Splits a log into games
    ///
    /// A new game starts at tick 1 or whenever the seed or mode changes.
    pub fn split_games(entries: &[TickLogEntry]) -> Vec<&[TickLogEntry]> {
        let mut games = Vec::new();
        let mut start = 0;
        for i in 1..entries.len() {
            let prev = &entries[i - 1];
            let cur = &entries[i];
            if cur.tick == 1 || cur.game_seed != prev.game_seed || cur.mode != prev.mode {
                games.push(&entries[start..i]);
                start = i;
            }
        }
        if start < entries.len() {
            games.push(&entries[start..]);
        }
        games
    }

    fn session_config(&self, first: &TickLogEntry) -> Config {
        let mut config = self.config.clone().with_board_size(first.board_size);
        config.rules.max_ticks = first.max_ticks;
        config
    }

    /// Re-runs one game from a fresh session and compares every tick
    pub fn replay_game(&self, game: &[TickLogEntry]) -> Result<Vec<ReplayResult>, String> {
        let first = game.first().ok_or("Cannot replay an empty game")?;
        if first.tick != 1 {
            return Err(format!(
                "Game {} starts at tick {}, expected tick 1",
                first.game_seed, first.tick
            ));
        }

        let config = self.session_config(first);
        let bot = Bot::new(config.clone());
        let mut session = Session::new(config, first.mode, first.game_seed)?;
        let mut results = Vec::with_capacity(game.len());

        for entry in game {
            if session.status().is_terminal() {
                warn!(
                    "Game {} ended before logged tick {}",
                    entry.game_seed, entry.tick
                );
                break;
            }

            let control = if entry.autopilot {
                PlayerControl::Autopilot
            } else {
                PlayerControl::Manual(entry.player_move)
            };

            let start_time = Instant::now();
            let report = session.tick(&bot, control);
            let computation_time_us = start_time.elapsed().as_micros();

            let state_matches =
                report.respawned == entry.respawned && session.snapshot() == entry.snapshot;
            let matches = state_matches
                && report.player_intent == entry.player_move
                && report.opponent_intent == entry.opponent_move;

            let result = ReplayResult {
                game_seed: entry.game_seed,
                tick: entry.tick,
                original_move: entry.player_move,
                replayed_move: report.player_intent,
                original_opponent_move: entry.opponent_move,
                replayed_opponent_move: report.opponent_intent,
                state_matches,
                matches,
                computation_time_us,
            };

            if self.verbose {
                if matches {
                    info!(
                        "Tick {}: ✓ MATCH - {} ({}us)",
                        entry.tick,
                        move_str(result.replayed_move),
                        computation_time_us
                    );
                } else {
                    warn!(
                        "Tick {}: ✗ MISMATCH - Original: {}, Replayed: {}, state {}",
                        entry.tick,
                        move_str(result.original_move),
                        move_str(result.replayed_move),
                        if state_matches { "equal" } else { "diverged" }
                    );
                }
            }

            results.push(result);
        }

        Ok(results)
    }

    /// Replays every game in a log
    pub fn replay_all(&self, entries: &[TickLogEntry]) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for game in Self::split_games(entries) {
            match self.replay_game(game) {
                Ok(game_results) => results.extend(game_results),
                Err(e) => {
                    warn!("Failed to replay game: {}", e);
                }
            }
        }

        Ok(results)
    }

    /// Replays the log and keeps only the requested ticks
    ///
    /// Ticks cannot be replayed in isolation; each game is re-run from tick 1.
    pub fn replay_ticks(
        &self,
        entries: &[TickLogEntry],
        ticks: &[u64],
    ) -> Result<Vec<ReplayResult>, String> {
        for tick in ticks {
            if !entries.iter().any(|e| e.tick == *tick) {
                return Err(format!("Tick {} not found in log file", tick));
            }
        }

        let results = self.replay_all(entries)?;
        Ok(results
            .into_iter()
            .filter(|r| ticks.contains(&r.tick))
            .collect())
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_ticks = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_ticks - matches;
        let match_rate = if total_ticks > 0 {
            (matches as f64 / total_ticks as f64) * 100.0
        } else {
            0.0
        };
        let games = results.iter().filter(|r| r.tick == 1).count();

        ReplayStats {
            games,
            total_ticks,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Games:          {}", stats.games);
        println!("Total Ticks:    {}", stats.total_ticks);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Tick Time:   {:.1}us\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Game {} tick {}: player {} → {}, opponent {} → {}, state {}",
                    result.game_seed,
                    result.tick,
                    move_str(result.original_move),
                    move_str(result.replayed_move),
                    move_str(result.original_opponent_move),
                    move_str(result.replayed_opponent_move),
                    if result.state_matches { "equal" } else { "diverged" }
                );
            }
            println!();
        }
    }

    /// Validates that specific expected player moves were logged
    pub fn validate_expected_moves(
        &self,
        entries: &[TickLogEntry],
        expected_moves: &[(u64, Vec<Direction>)], // (tick, acceptable_moves)
    ) -> Result<(), String> {
        for (tick, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log", tick))?;

            let actual = entry
                .player_move
                .ok_or_else(|| format!("Tick {}: no player move was logged", tick))?;

            if !acceptable.contains(&actual) {
                return Err(format!(
                    "Tick {}: Expected one of {:?}, but got {}",
                    tick,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual.as_str()
                ));
            }
        }

        Ok(())
    }
}

fn move_str(direction: Option<Direction>) -> &'static str {
    direction.map_or("none", |d| d.as_str())
}

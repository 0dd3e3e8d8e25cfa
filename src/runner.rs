// Headless autoplay: whole games driven by the bot, one at a time or as a
// batch spread over the rayon thread pool.

use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::{DebugLogger, TickLogEntry};
use crate::session::{PlayerControl, Session};
use crate::types::{GameMode, GameStatus};

/// Tick cap applied when the configuration leaves `rules.max_ticks` at 0
pub const DEFAULT_TICK_CAP: u64 = 10_000;

/// Outcome of one autoplayed game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub mode: GameMode,
    pub ticks: u64,
    pub score: u32,
    pub opponent_score: Option<u32>,
    pub length: usize,
    pub status: GameStatus,
    pub respawns: u32,
}

/// Returns `config` with a finite tick limit so autoplay always terminates
pub fn capped(config: &Config) -> Config {
    let mut config = config.clone();
    if config.rules.max_ticks == 0 {
        config.rules.max_ticks = DEFAULT_TICK_CAP;
    }
    config
}

/// Plays one game on autopilot until it ends, logging every tick
pub fn play_game(
    config: &Config,
    mode: GameMode,
    seed: u64,
    logger: &mut DebugLogger,
) -> Result<GameSummary, String> {
    let config = capped(config);
    let max_ticks = config.rules.max_ticks;
    let bot = Bot::new(config.clone());
    let mut session = Session::new(config, mode, seed)?;
    let mut respawns = 0;

    while !session.status().is_terminal() {
        let report = session.tick(&bot, PlayerControl::Autopilot);
        if report.respawned {
            respawns += 1;
        }
        if logger.is_enabled() {
            logger.log_tick(&TickLogEntry::new(
                seed,
                max_ticks,
                true,
                &report,
                session.snapshot(),
            ));
        }
    }

    let summary = GameSummary {
        seed,
        mode,
        ticks: session.tick_count(),
        score: session.score(),
        opponent_score: session.opponent_score(),
        length: session.player().len(),
        status: session.status(),
        respawns,
    };
    debug!("Game {} finished: {:?}", seed, summary);
    Ok(summary)
}

/// Plays one game per seed in parallel; results come back in seed order
pub fn play_many(config: &Config, mode: GameMode, seeds: &[u64]) -> Vec<Result<GameSummary, String>> {
    info!(
        "Playing {} {} games on {} threads",
        seeds.len(),
        mode.as_str(),
        rayon::current_num_threads()
    );
    seeds
        .par_iter()
        .map(|&seed| play_game(config, mode, seed, &mut DebugLogger::disabled()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Completion;

    #[test]
    fn test_zero_tick_limit_gets_default_cap() {
        let config = Config::default_hardcoded();
        assert_eq!(config.rules.max_ticks, 0);
        assert_eq!(capped(&config).rules.max_ticks, DEFAULT_TICK_CAP);

        let mut limited = Config::default_hardcoded();
        limited.rules.max_ticks = 7;
        assert_eq!(capped(&limited).rules.max_ticks, 7);
    }

    #[test]
    fn test_play_game_terminates() {
        let mut config = Config::default_hardcoded().with_board_size(10);
        config.rules.max_ticks = 40;
        let summary =
            play_game(&config, GameMode::Classic, 3, &mut DebugLogger::disabled()).unwrap();
        assert!(summary.status.is_terminal());
        assert!(summary.ticks <= 40);
        if summary.status == GameStatus::Completed(Completion::TickLimit) {
            assert_eq!(summary.ticks, 40);
        }
        assert_eq!(summary.opponent_score, None);
    }

    #[test]
    fn test_play_many_keeps_seed_order() {
        let mut config = Config::default_hardcoded().with_board_size(12);
        config.rules.max_ticks = 30;
        let seeds = [5, 1, 9];
        let results = play_many(&config, GameMode::Adversarial, &seeds);
        let played: Vec<u64> = results.iter().map(|r| r.as_ref().unwrap().seed).collect();
        assert_eq!(played, seeds.to_vec());
    }
}

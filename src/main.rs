// Headless autoplay entry point
//
// Usage:
//   snake-arena [--mode classic|adversarial|shadow] [--games N] [--seed S]
//               [--ticks T] [--config Snake.toml] [--log path.jsonl] [--verbose]

use log::{error, info};
use std::env;
use std::process;

use snake_arena::config::Config;
use snake_arena::debug_logger::DebugLogger;
use snake_arena::runner::{self, GameSummary};
use snake_arena::types::GameMode;

struct Options {
    mode: GameMode,
    games: u64,
    seed: u64,
    ticks: Option<u64>,
    config_path: Option<String>,
    log_path: Option<String>,
    verbose: bool,
}

fn print_usage() {
    eprintln!("Snake Arena");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  snake-arena [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --mode <MODE>       classic, adversarial or shadow (default: classic)");
    eprintln!("  --games <N>         Number of games to play (default: 1)");
    eprintln!("  --seed <S>          Seed of the first game (default: 0)");
    eprintln!("  --ticks <T>         Tick limit per game (default: from config)");
    eprintln!("  --config <path>     Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --log <path>        Write a JSONL tick log (single game only)");
    eprintln!("  --verbose           Print every game summary");
    eprintln!("  --help              Show this help message");
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str, String> {
    args.get(i + 1)
        .map(|s| s.as_str())
        .ok_or_else(|| format!("{} requires an argument", flag))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        mode: GameMode::Classic,
        games: 1,
        seed: 0,
        ticks: None,
        config_path: None,
        log_path: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--mode" => {
                options.mode = GameMode::parse(value(args, i, "--mode")?)?;
                i += 1;
            }
            "--games" => {
                let raw = value(args, i, "--games")?;
                options.games = raw
                    .parse()
                    .map_err(|e| format!("Invalid game count '{}': {}", raw, e))?;
                i += 1;
            }
            "--seed" => {
                let raw = value(args, i, "--seed")?;
                options.seed = raw
                    .parse()
                    .map_err(|e| format!("Invalid seed '{}': {}", raw, e))?;
                i += 1;
            }
            "--ticks" => {
                let raw = value(args, i, "--ticks")?;
                options.ticks = Some(
                    raw.parse()
                        .map_err(|e| format!("Invalid tick limit '{}': {}", raw, e))?,
                );
                i += 1;
            }
            "--config" => {
                options.config_path = Some(value(args, i, "--config")?.to_string());
                i += 1;
            }
            "--log" => {
                options.log_path = Some(value(args, i, "--log")?.to_string());
                i += 1;
            }
            "--verbose" => options.verbose = true,
            other => return Err(format!("Unknown option '{}'", other)),
        }
        i += 1;
    }

    if options.games == 0 {
        return Err("--games must be at least 1".to_string());
    }
    Ok(options)
}

fn print_summary(summary: &GameSummary) {
    let opponent = summary
        .opponent_score
        .map(|s| format!(", opponent {}", s))
        .unwrap_or_default();
    println!(
        "seed {:>6}: {:?} after {} ticks, score {}{}, length {}, respawns {}",
        summary.seed,
        summary.status,
        summary.ticks,
        summary.score,
        opponent,
        summary.length,
        summary.respawns
    );
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(0);
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(1);
        }
    };

    let mut config = match &options.config_path {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => Config::load_or_default(),
    };
    if let Some(ticks) = options.ticks {
        config.rules.max_ticks = ticks;
    }

    info!(
        "Starting {} {} game(s) from seed {}",
        options.games,
        options.mode.as_str(),
        options.seed
    );

    let summaries: Vec<Result<GameSummary, String>> = if options.games == 1 {
        let log_path = options
            .log_path
            .clone()
            .or_else(|| config.debug.enabled.then(|| config.debug.log_file_path.clone()));
        let mut logger = match &log_path {
            Some(path) => DebugLogger::new(true, path),
            None => DebugLogger::disabled(),
        };
        vec![runner::play_game(&config, options.mode, options.seed, &mut logger)]
    } else {
        if options.log_path.is_some() {
            eprintln!("Warning: --log is ignored when playing more than one game");
        }
        let seeds: Vec<u64> = (0..options.games)
            .map(|i| options.seed.wrapping_add(i))
            .collect();
        runner::play_many(&config, options.mode, &seeds)
    };

    let mut played = Vec::new();
    for result in summaries {
        match result {
            Ok(summary) => played.push(summary),
            Err(e) => error!("Game failed: {}", e),
        }
    }
    if played.is_empty() {
        eprintln!("Error: no game could be played");
        process::exit(1);
    }

    if options.verbose || played.len() == 1 {
        for summary in &played {
            print_summary(summary);
        }
    }

    let games = played.len() as f64;
    let avg_score = played.iter().map(|s| s.score as f64).sum::<f64>() / games;
    let avg_ticks = played.iter().map(|s| s.ticks as f64).sum::<f64>() / games;
    let best = played.iter().map(|s| s.score).max().unwrap_or(0);

    println!("\n═══════════════════════════════════════════════════════════");
    println!("                    ARENA SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!("Mode:           {}", options.mode.as_str());
    println!("Games:          {}", played.len());
    println!("Average Score:  {:.1}", avg_score);
    println!("Best Score:     {}", best);
    println!("Average Ticks:  {:.1}", avg_ticks);
    println!("═══════════════════════════════════════════════════════════\n");
}

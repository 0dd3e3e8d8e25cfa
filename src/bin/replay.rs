// Standalone replay tool for verifying snake arena tick logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay every logged game
//   --ticks <t1,t2>        Report specific ticks (comma-separated)
//   --validate             Check logged player moves against expectations
//   --verbose              Show detailed output for each tick
//   --config <path>        Path to Snake.toml (default: Snake.toml)

use std::env;
use std::process;

use snake_arena::config::Config;
use snake_arena::replay::ReplayEngine;
use snake_arena::types::Direction;

enum Mode {
    All,
    Ticks(String),
    Validate(String),
}

fn print_usage() {
    eprintln!("Snake Arena Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay every game in the log");
    eprintln!("  --ticks <T1,T2,...>     Report specific ticks (comma-separated)");
    eprintln!("  --validate <T:M,...>    Validate expected moves (format: tick:move,...)");
    eprintln!("  --verbose               Show detailed output for each tick");
    eprintln!("  --config <path>         Path to Snake.toml (default: Snake.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  replay snake_ticks.jsonl --all");
    eprintln!("  replay snake_ticks.jsonl --ticks 5,10,15");
    eprintln!("  replay snake_ticks.jsonl --validate 5:up,10:right|down");
}

fn parse_ticks(s: &str) -> Result<Vec<u64>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u64>()
                .map_err(|e| format!("Invalid tick number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u64, Vec<Direction>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'tick:move'", pair));
            }

            let tick = parts[0]
                .parse::<u64>()
                .map_err(|e| format!("Invalid tick number '{}': {}", parts[0], e))?;

            // Support multiple acceptable moves separated by '|'
            let moves: Result<Vec<Direction>, String> = parts[1]
                .split('|')
                .map(|m| Direction::parse(m.trim()))
                .collect();

            Ok((tick, moves?))
        })
        .collect()
}

fn fail(message: String) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn arg_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(v) => v.clone(),
        None => fail(format!("{} requires an argument", flag)),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--ticks" => {
                mode = Some(Mode::Ticks(arg_value(&args, i, "--ticks")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(arg_value(&args, i, "--validate")));
                i += 1;
            }
            "--config" => {
                config_path = arg_value(&args, i, "--config");
                i += 1;
            }
            "--verbose" => verbose = true,
            other => {
                eprintln!("Error: Unknown option '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --ticks, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let engine = ReplayEngine::new(config, verbose);

    let entries = engine
        .load_log_file(log_file)
        .unwrap_or_else(|e| fail(format!("loading log file: {}", e)));
    if entries.is_empty() {
        fail("Log file is empty".to_string());
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => {
            println!("Replaying all {} ticks...\n", entries.len());
            let results = engine
                .replay_all(&entries)
                .unwrap_or_else(|e| fail(format!("during replay: {}", e)));
            engine.print_report(&results);
            if engine.generate_stats(&results).mismatches > 0 {
                process::exit(2);
            }
        }
        Mode::Ticks(raw) => {
            let ticks = parse_ticks(&raw).unwrap_or_else(|e| fail(e));
            println!("Replaying {} specific tick(s)...\n", ticks.len());
            let results = engine
                .replay_ticks(&entries, &ticks)
                .unwrap_or_else(|e| fail(format!("during replay: {}", e)));
            engine.print_report(&results);
        }
        Mode::Validate(raw) => {
            let expected_moves = parse_expected_moves(&raw).unwrap_or_else(|e| fail(e));
            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

// Integration test for per-tick session invariants
//
// Autoplays games in every mode and checks after each tick that:
// 1. Length grows by exactly one on eating and is unchanged otherwise
// 2. Free cells, snake cells and food partition the board
// 3. The effective heading never reverses onto the neck

use snake_arena::bot::Bot;
use snake_arena::config::Config;
use snake_arena::session::{PlayerControl, Session};
use snake_arena::types::{Direction, GameMode};

const MODES: [GameMode; 3] = [GameMode::Classic, GameMode::Adversarial, GameMode::Shadow];

fn config() -> Config {
    let mut config = Config::default_hardcoded().with_board_size(15);
    config.rules.max_ticks = 300;
    config
}

#[test]
fn test_invariants_hold_every_tick() {
    for mode in MODES {
        for seed in 0..4 {
            let config = config();
            let bot = Bot::new(config.clone());
            let mut session = Session::new(config, mode, seed).unwrap();

            while !session.status().is_terminal() {
                let len_before = session.player().len();
                let dir_before = session.player().direction();
                let opponent_before = session
                    .opponent()
                    .map(|s| (s.len(), s.direction()));

                let report = session.tick(&bot, PlayerControl::Autopilot);
                let context = format!("{} seed {} tick {}", mode.as_str(), seed, session.tick_count());

                assert_ne!(
                    session.player().direction(),
                    dir_before.opposite(),
                    "{}: player reversed",
                    context
                );

                if !report.player.terminal {
                    let expected = if report.player.scored {
                        len_before + 1
                    } else {
                        len_before
                    };
                    assert_eq!(session.player().len(), expected, "{}: player length", context);
                }

                if let (Some((len, dir)), Some(outcome)) = (opponent_before, report.opponent) {
                    if !outcome.terminal && !report.respawned {
                        let opponent = session.opponent().unwrap();
                        assert_ne!(opponent.direction(), dir.opposite(), "{}: opponent reversed", context);
                        let expected = if outcome.scored { len + 1 } else { len };
                        assert_eq!(opponent.len(), expected, "{}: opponent length", context);
                    }
                }

                if !session.status().is_terminal() {
                    if let Err(e) = session.check_partition() {
                        panic!("{}: {}", context, e);
                    }
                }
            }
        }
    }
}

#[test]
fn test_manual_reversal_keeps_heading() {
    let mut session = Session::new(config(), GameMode::Classic, 0).unwrap();
    let bot = Bot::new(session.config().clone());
    let before = session.player().direction();
    let report = session.tick(&bot, PlayerControl::Manual(Some(before.opposite())));
    assert_eq!(report.player_intent, Some(Direction::Up));
    assert_eq!(session.player().direction(), before);
    assert!(!report.player.terminal);
}

#[test]
fn test_shadow_mirrors_track_player_every_tick() {
    let config = config();
    let bot = Bot::new(config.clone());
    let mut session = Session::new(config, GameMode::Shadow, 11).unwrap();

    for _ in 0..50 {
        session.tick(&bot, PlayerControl::Autopilot);
        if session.status().is_terminal() {
            break;
        }
        let snap = session.snapshot();
        let mirrors = snap.mirrors.unwrap();
        assert_eq!(mirrors.left.len(), snap.player.body.len());
        assert_eq!(mirrors.right.len(), snap.player.body.len());
        for ((p, l), r) in snap.player.body.iter().zip(&mirrors.left).zip(&mirrors.right) {
            assert_eq!(p.row, l.row);
            assert_eq!(p.row, r.row);
            assert!(l.col < p.col && p.col < r.col);
        }
    }
}

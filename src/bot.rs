// Move selection for AI-controlled snakes
//
// Decision order:
// 1. Follow the A* path to food when the projected space after eating is safe
// 2. Otherwise score every safe candidate (space, food, border, rival terms)
// 3. Fall back to any unblocked non-reversing move, then to any move at all

use log::debug;
use rand::seq::IndexedRandom;
use std::collections::HashSet;

use crate::config::Config;
use crate::flood_fill;
use crate::grid::OccupancyGrid;
use crate::oscillation::{self, AiMemory};
use crate::pathfinding::{self, Path};
use crate::shadow::ShadowRule;
use crate::snake::Snake;
use crate::types::{Cell, Direction};

/// The rival snake as seen by the deciding snake
#[derive(Debug, Clone, Copy)]
pub struct RivalView<'a> {
    pub snake: &'a Snake,
    pub score: u32,
}

/// Read-only snapshot of everything a decision may look at
#[derive(Debug, Clone)]
pub struct GameView<'a> {
    pub board_size: i32,
    /// The snake being steered
    pub own: &'a Snake,
    pub own_score: u32,
    /// A live rival, if any
    pub rival: Option<RivalView<'a>>,
    pub food: Cell,
    /// Every blocked cell except the steered snake's own body
    pub obstacles: OccupancyGrid,
    /// Present when the steered snake drags mirrors along
    pub shadow: Option<ShadowRule>,
}

impl<'a> GameView<'a> {
    /// Obstacles plus the steered snake's body, minus its tail
    ///
    /// Food never lies on a snake, so a move onto the tail never grows and
    /// the tail is vacated before the head arrives.
    pub fn occupancy(&self) -> OccupancyGrid {
        let mut grid = self.obstacles.clone();
        for cell in self.own.cells() {
            grid.block(cell);
        }
        if self.own.len() > 1 {
            grid.unblock(self.own.tail());
        }
        grid
    }
}

/// Score breakdown for one candidate move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    pub direction: Direction,
    pub space: f64,
    pub score: f64,
}

/// How a decision was reached, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    FoodPath,
    Scored,
    SafeFallback,
    Concession,
}

/// AI move engine with static configuration
pub struct Bot {
    config: Config,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Picks the next direction for `view.own`
    ///
    /// Records the current head in the position history before deciding and
    /// the chosen direction in the direction history afterwards.
    pub fn decide(&self, view: &GameView, memory: &mut AiMemory) -> Direction {
        memory.record_position(view.own.head());
        let occupancy = view.occupancy();

        let (choice, source) = match self.pursue_food(view, &occupancy) {
            Some(dir) => (dir, DecisionSource::FoodPath),
            None => self.choose_scored(view, &occupancy, memory),
        };

        debug!(
            "Decided {} via {:?} (head {}, food {})",
            choice.as_str(),
            source,
            view.own.head(),
            view.food
        );

        memory.record_direction(choice);
        choice
    }

    /// Steps 2-5 of the decision: scored choice with random fallbacks
    fn choose_scored(
        &self,
        view: &GameView,
        occupancy: &OccupancyGrid,
        memory: &mut AiMemory,
    ) -> (Direction, DecisionSource) {
        let scores = self.score_candidates(view, occupancy, memory);

        let best = scores
            .iter()
            .map(|s| s.score)
            .filter(|&s| s > 0.0)
            .fold(f64::NEG_INFINITY, f64::max);

        if best > 0.0 {
            let cutoff = best * self.config.scores.near_best_ratio;
            let near_best: Vec<Direction> = scores
                .iter()
                .filter(|s| s.score > 0.0 && s.score >= cutoff)
                .map(|s| s.direction)
                .collect();
            if let Some(&dir) = near_best.choose(memory.rng()) {
                return (dir, DecisionSource::Scored);
            }
        }

        let current = view.own.direction();
        let head = view.own.head();
        let safe: Vec<Direction> = Direction::all()
            .into_iter()
            .filter(|&d| d != current.opposite() && !occupancy.is_blocked(d.apply(&head)))
            .collect();
        if let Some(&dir) = safe.choose(memory.rng()) {
            return (dir, DecisionSource::SafeFallback);
        }

        let all = Direction::all();
        let dir = all.choose(memory.rng()).copied().unwrap_or(current);
        (dir, DecisionSource::Concession)
    }

    /// Step 1: commit to the shortest path to food if eating keeps enough room
    fn pursue_food(&self, view: &GameView, occupancy: &OccupancyGrid) -> Option<Direction> {
        let head = view.own.head();
        let path = pathfinding::find_path(head, view.food, occupancy, &self.config.pathfinding)?;
        let first = path.first()?;

        if first == view.own.direction().opposite() {
            return None;
        }
        if !self.mirrors_survive(view, first) {
            return None;
        }

        let projected = self.projected_space_after_eating(view, &path);
        let floor = self
            .config
            .scores
            .min_safe_space
            .max((view.own.len() / 2) as f64);

        if projected > floor {
            Some(first)
        } else {
            debug!(
                "Food path rejected: projected space {:.1} <= floor {:.1}",
                projected, floor
            );
            None
        }
    }

    /// Best space score around the food after following `path` and growing
    fn projected_space_after_eating(&self, view: &GameView, path: &Path) -> f64 {
        let start = view.own.head();
        let mut projected: Vec<Cell> = path.cells(start);
        projected.reverse();
        projected.extend(view.own.cells());
        projected.truncate(view.own.len() + 1);

        let mut grid = view.obstacles.clone();
        for &cell in &projected {
            grid.block(cell);
        }

        view.food
            .neighbors()
            .into_iter()
            .filter(|&n| !grid.is_blocked(n))
            .map(|n| flood_fill::evaluate(n, &grid, &self.config.flood_fill))
            .fold(0.0, f64::max)
    }

    /// True unless moving in `dir` would kill one of the steered snake's mirrors
    fn mirrors_survive(&self, view: &GameView, dir: Direction) -> bool {
        let Some(rule) = view.shadow else {
            return true;
        };
        let next = dir.apply(&view.own.head());
        let grows = next == view.food;
        let keep = if grows {
            view.own.len()
        } else {
            view.own.len().saturating_sub(1)
        };
        let body: Vec<Cell> = std::iter::once(next)
            .chain(view.own.cells().take(keep))
            .collect();
        rule.casualties(body.iter().copied()).is_none()
    }

    /// Scores every safe candidate move
    ///
    /// Unsafe candidates (reversals, blocked cells, mirror-killing moves) are
    /// omitted rather than given a score.
    pub fn score_candidates(
        &self,
        view: &GameView,
        occupancy: &OccupancyGrid,
        memory: &AiMemory,
    ) -> Vec<CandidateScore> {
        let scores_cfg = &self.config.scores;
        let head = view.own.head();
        let current = view.own.direction();
        let progress = occupancy.occupied_fraction();
        let rival = self.rival_context(view, occupancy);

        let mut out = Vec::with_capacity(4);
        for dir in Direction::all() {
            if dir == current.opposite() {
                continue;
            }
            let next = dir.apply(&head);
            if occupancy.is_blocked(next) || !self.mirrors_survive(view, dir) {
                continue;
            }

            let report = flood_fill::explore(next, occupancy, &self.config.flood_fill);
            let food_dist = next.manhattan(view.food);
            let border_dist = next.border_distance(view.board_size);

            let mut score = report.score * scores_cfg.space_weight
                + scores_cfg.food_scale / (food_dist as f64 + 1.0) * scores_cfg.food_weight
                + border_dist as f64 * scores_cfg.border_scale * scores_cfg.border_weight;

            if let Some(ctx) = &rival {
                score += self.rival_bonus(view, ctx, next, report.score);
            }

            if memory.previous_directions().len() >= scores_cfg.diversity_min_history
                && memory.repeated_twice(dir)
            {
                score *= scores_cfg.diversity_penalty;
            }
            if oscillation::is_looping(
                next,
                memory,
                view.own.len(),
                progress,
                &self.config.oscillation,
            ) {
                score *= scores_cfg.oscillation_penalty;
            }
            if !report.truncated && report.cells < view.own.len() {
                score *= scores_cfg.trap_penalty;
            }

            out.push(CandidateScore {
                direction: dir,
                space: report.score,
                score,
            });
        }
        out
    }

    fn rival_context(&self, view: &GameView, occupancy: &OccupancyGrid) -> Option<RivalContext> {
        let rival = view.rival?;
        let head = rival.snake.head();
        let path_cells: HashSet<Cell> =
            pathfinding::find_path(head, view.food, occupancy, &self.config.pathfinding)
                .map(|p| p.cells(head).into_iter().collect())
                .unwrap_or_default();
        let lead = view.own_score as i64 - rival.score as i64;
        let (aggression, caution) = self.config.adversarial.weights_for_lead(lead);
        Some(RivalContext {
            head,
            len: rival.snake.len(),
            path_cells,
            aggression,
            caution,
        })
    }

    /// Attack, encirclement, defence and food-contention terms
    fn rival_bonus(&self, view: &GameView, ctx: &RivalContext, next: Cell, space: f64) -> f64 {
        let adv = &self.config.adversarial;
        let dist_to_rival = next.manhattan(ctx.head);

        let attack = match dist_to_rival {
            1 => adv.attack_adjacent_bonus,
            2 => adv.attack_near_bonus,
            _ => 0.0,
        };
        let encircle = if ctx.path_cells.contains(&next) {
            adv.encircle_bonus
        } else {
            0.0
        };
        let defense = if ctx.len > adv.defense_min_rival_length
            && dist_to_rival < adv.defense_distance
            && space < adv.defense_space_threshold
        {
            adv.defense_bonus
        } else {
            0.0
        };
        let contention = if next.manhattan(view.food) < ctx.head.manhattan(view.food) {
            adv.food_contention_bonus
        } else {
            0.0
        };

        (attack + encircle + contention) * ctx.aggression + defense * ctx.caution
    }
}

struct RivalContext {
    head: Cell,
    len: usize,
    path_cells: HashSet<Cell>,
    aggression: f64,
    caution: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot() -> Bot {
        Bot::new(Config::default_hardcoded())
    }

    fn view<'a>(size: i32, own: &'a Snake, food: Cell) -> GameView<'a> {
        GameView {
            board_size: size,
            own,
            own_score: 0,
            rival: None,
            food,
            obstacles: OccupancyGrid::new(size),
            shadow: None,
        }
    }

    #[test]
    fn test_decide_records_history() {
        let snake = Snake::new(
            vec![Cell::new(5, 5), Cell::new(6, 5), Cell::new(7, 5)],
            Direction::Up,
        )
        .unwrap();
        let mut memory = AiMemory::new(30, 10, 3);
        let dir = bot().decide(&view(10, &snake, Cell::new(2, 5)), &mut memory);
        assert_eq!(memory.recent_positions().back(), Some(&Cell::new(5, 5)));
        assert_eq!(memory.previous_directions().back(), Some(&dir));
    }

    #[test]
    fn test_scored_candidates_skip_reverse_and_walls() {
        let snake = Snake::new(
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)],
            Direction::Up,
        )
        .unwrap();
        let v = view(10, &snake, Cell::new(5, 5));
        let memory = AiMemory::new(30, 10, 0);
        let scores = bot().score_candidates(&v, &v.occupancy(), &memory);
        let dirs: Vec<Direction> = scores.iter().map(|s| s.direction).collect();
        assert_eq!(dirs, vec![Direction::Right]);
    }

    #[test]
    fn test_cornered_snake_follows_its_tail() {
        // Head in the corner, walls on two sides, neck on the right, tail below
        let snake = Snake::new(
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1), Cell::new(1, 0)],
            Direction::Left,
        )
        .unwrap();
        let v = view(5, &snake, Cell::new(4, 4));
        let occupancy = v.occupancy();
        assert!(!occupancy.is_blocked(Cell::new(1, 0)));
        assert!(occupancy.is_blocked(Cell::new(0, 1)));

        let scores = bot().score_candidates(&v, &occupancy, &AiMemory::new(30, 10, 9));
        let dirs: Vec<Direction> = scores.iter().map(|s| s.direction).collect();
        assert_eq!(dirs, vec![Direction::Down]);

        for seed in 0..20 {
            let mut memory = AiMemory::new(30, 10, seed);
            assert_eq!(bot().decide(&v, &mut memory), Direction::Down, "seed {}", seed);
        }
    }

    #[test]
    fn test_only_the_tail_is_left_open() {
        // Head at (3,0) against the left wall; the neck is to the right and
        // the body wraps above, so the tail at (4,0) is the only way out
        let snake = Snake::new(
            vec![
                Cell::new(3, 0),
                Cell::new(3, 1),
                Cell::new(2, 1),
                Cell::new(2, 0),
                Cell::new(1, 0),
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(2, 2),
                Cell::new(3, 2),
                Cell::new(4, 2),
                Cell::new(4, 1),
                Cell::new(4, 0),
            ],
            Direction::Left,
        )
        .unwrap();
        let v = view(8, &snake, Cell::new(7, 7));
        for seed in 0..20 {
            let mut memory = AiMemory::new(30, 10, seed);
            assert_eq!(bot().decide(&v, &mut memory), Direction::Down, "seed {}", seed);
        }
    }

    #[test]
    fn test_shadow_rule_blocks_mirror_killing_moves() {
        // Left mirror sits on column 0: turning left would collapse it
        let snake = Snake::new(
            vec![Cell::new(5, 5), Cell::new(6, 5), Cell::new(7, 5)],
            Direction::Up,
        )
        .unwrap();
        let mut v = view(20, &snake, Cell::new(5, 2));
        v.shadow = Some(ShadowRule::symmetric(5, 20));
        let memory = AiMemory::new(30, 10, 0);
        let scores = bot().score_candidates(&v, &v.occupancy(), &memory);
        assert!(
            scores.iter().all(|s| s.direction != Direction::Left),
            "left should be filtered: {:?}",
            scores
        );
    }
}

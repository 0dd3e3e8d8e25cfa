// Game session: owns every snake, the food, the free-cell set and the RNGs,
// and resolves one tick at a time.
//
// Update order within a tick is player first, then opponent (or mirrors).
// Deaths are ordinary outcome values; a terminal session ignores further steps.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::bot::{Bot, GameView, RivalView};
use crate::config::Config;
use crate::food;
use crate::grid::{Board, OccupancyGrid};
use crate::oscillation::AiMemory;
use crate::shadow::{self, Mirror, ShadowRule};
use crate::snake::{Snake, SnakeSnapshot};
use crate::types::{
    Cell, Completion, Controlled, DeathReason, Direction, GameMode, GameStatus, MirrorSide,
    StepOutcome, TickReport,
};

const PLAYER_AI_SEED_OFFSET: u64 = 1;
const OPPONENT_AI_SEED_OFFSET: u64 = 2;

/// Non-player snakes of a session
#[derive(Debug, Clone)]
enum Companions {
    Solo,
    Opponent { snake: Snake, score: u32 },
    Shadows { rule: ShadowRule, left: Mirror, right: Mirror },
}

/// Where the player's intent comes from for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerControl {
    Manual(Option<Direction>),
    Autopilot,
}

/// Body and heading used to build a session from an explicit layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeLayout {
    pub body: Vec<Cell>,
    pub direction: Direction,
}

/// Explicit starting position (scenarios and tests)
///
/// Mirrors are derived from the player body in shadow mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub mode: GameMode,
    pub player: SnakeLayout,
    pub opponent: Option<SnakeLayout>,
    pub food: Cell,
    pub score: u32,
    pub opponent_score: u32,
}

/// Mirror bodies in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorSnapshot {
    pub left: Vec<Cell>,
    pub right: Vec<Cell>,
    pub left_alive: bool,
    pub right_alive: bool,
}

/// Serializable state of a session after a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub board_size: i32,
    pub tick: u64,
    pub player: SnakeSnapshot,
    pub opponent: Option<SnakeSnapshot>,
    pub mirrors: Option<MirrorSnapshot>,
    pub food: Cell,
    pub score: u32,
    pub opponent_score: Option<u32>,
    pub status: GameStatus,
}

pub struct Session {
    config: Config,
    mode: GameMode,
    seed: u64,
    board: Board,
    player: Snake,
    companions: Companions,
    food: Cell,
    score: u32,
    status: GameStatus,
    tick: u64,
    rng: StdRng,
    player_ai: AiMemory,
    opponent_ai: AiMemory,
}

impl Session {
    /// Creates a session in the standard starting layout for `mode`
    pub fn new(config: Config, mode: GameMode, seed: u64) -> Result<Self, String> {
        config.validate()?;
        let size = config.board.size;
        let player = Snake::new(vec![Cell::new(0, 0)], Direction::Down)?;
        let mut session = Session {
            board: Board::new(size),
            player_ai: Self::fresh_memory(&config, seed, PLAYER_AI_SEED_OFFSET),
            opponent_ai: Self::fresh_memory(&config, seed, OPPONENT_AI_SEED_OFFSET),
            config,
            mode,
            seed,
            player,
            companions: Companions::Solo,
            food: Cell::SENTINEL,
            score: 0,
            status: GameStatus::Running,
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
        };
        session.reset()?;
        Ok(session)
    }

    /// Creates a session from an explicit, validated layout
    pub fn from_layout(config: Config, seed: u64, layout: Layout) -> Result<Self, String> {
        config.validate()?;
        let size = config.board.size;
        let in_bounds = |body: &[Cell]| body.iter().all(|c| crate::grid::is_inside(size, *c));

        if !in_bounds(&layout.player.body) {
            return Err("Player body is outside the board".to_string());
        }
        let player = Snake::new(layout.player.body.clone(), layout.player.direction)?;

        let companions = match (layout.mode, &layout.opponent) {
            (GameMode::Adversarial, Some(opp)) => {
                if !in_bounds(&opp.body) {
                    return Err("Opponent body is outside the board".to_string());
                }
                let snake = Snake::new(opp.body.clone(), opp.direction)?;
                if snake.cells().any(|c| player.occupies(c)) {
                    return Err("Opponent overlaps the player".to_string());
                }
                Companions::Opponent {
                    snake,
                    score: layout.opponent_score,
                }
            }
            (GameMode::Adversarial, None) => {
                return Err("Adversarial layout needs an opponent".to_string());
            }
            (_, Some(_)) => {
                return Err(format!(
                    "{} layout must not have an opponent",
                    layout.mode.as_str()
                ));
            }
            (GameMode::Shadow, None) => Self::initial_mirrors(&config, &player)?,
            (GameMode::Classic, None) => Companions::Solo,
        };

        let mut session = Session {
            board: Board::new(size),
            player_ai: Self::fresh_memory(&config, seed, PLAYER_AI_SEED_OFFSET),
            opponent_ai: Self::fresh_memory(&config, seed, OPPONENT_AI_SEED_OFFSET),
            config,
            mode: layout.mode,
            seed,
            player,
            companions,
            food: layout.food,
            score: layout.score,
            status: GameStatus::Running,
            tick: 0,
            rng: StdRng::seed_from_u64(seed),
        };

        if !session.board.is_inside(layout.food) || session.is_snake_cell(layout.food) {
            return Err(format!("Food {} is not on a free cell", layout.food));
        }
        session.rebuild_free();
        Ok(session)
    }

    /// Restores the standard starting layout, scores, food and AI memories
    pub fn reset(&mut self) -> Result<(), String> {
        let size = self.config.board.size;
        let mid = size / 2;

        self.rng = StdRng::seed_from_u64(self.seed);
        self.player_ai = Self::fresh_memory(&self.config, self.seed, PLAYER_AI_SEED_OFFSET);
        self.opponent_ai = Self::fresh_memory(&self.config, self.seed, OPPONENT_AI_SEED_OFFSET);
        self.board = Board::new(size);
        self.score = 0;
        self.tick = 0;
        self.status = GameStatus::Running;
        self.food = Cell::SENTINEL;

        let len = self.config.placement.initial_length as i32;
        let offset = self.config.placement.opponent_offset;
        let player_body = Self::vertical_body(mid + 1 - (len - 1), mid, len);
        if !player_body.iter().all(|&c| self.board.is_inside(c)) {
            return Err(format!(
                "Initial length {} does not fit a {}x{} board",
                len, size, size
            ));
        }
        // Built tail-first from the top, so the head is the lowest cell
        self.player = Snake::new(player_body.into_iter().rev().collect(), Direction::Down)?;

        self.companions = match self.mode {
            GameMode::Classic => Companions::Solo,
            GameMode::Adversarial => {
                let standard = Self::vertical_body(mid - offset - 1, mid - offset, len);
                let fits = standard
                    .iter()
                    .all(|&c| self.board.is_inside(c) && !self.player.occupies(c));
                let (body, direction) = if fits {
                    (standard, Direction::Up)
                } else {
                    self.find_opponent_placement()
                        .ok_or_else(|| format!("Cannot place an opponent on a {}x{} board", size, size))?
                };
                Companions::Opponent {
                    snake: Snake::new(body, direction)?,
                    score: 0,
                }
            }
            GameMode::Shadow => Self::initial_mirrors(&self.config, &self.player)?,
        };

        let taken = self.snake_cells();
        self.board.rebuild(taken);
        self.regenerate_food();
        info!(
            "New {} session (seed {}, board {}x{})",
            self.mode.as_str(),
            self.seed,
            size,
            size
        );
        Ok(())
    }

    /// `len` cells going down from (row, col), top cell first
    fn vertical_body(row: i32, col: i32, len: i32) -> Vec<Cell> {
        (0..len).map(|i| Cell::new(row + i, col)).collect()
    }

    fn fresh_memory(config: &Config, seed: u64, offset: u64) -> AiMemory {
        AiMemory::new(
            config.oscillation.history_capacity,
            config.scores.direction_history,
            seed.wrapping_add(offset),
        )
    }

    fn initial_mirrors(config: &Config, player: &Snake) -> Result<Companions, String> {
        let rule = ShadowRule::symmetric(config.placement.shadow_offset, config.board.size);
        if rule.casualties(player.cells()).is_some() {
            return Err(format!(
                "Board of size {} is too small for shadow snakes at offset {}",
                config.board.size, config.placement.shadow_offset
            ));
        }
        let (left, right) = rule.project_both(player.cells());
        Ok(Companions::Shadows {
            rule,
            left: Mirror::new(left),
            right: Mirror::new(right),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Snake {
        &self.player
    }

    pub fn opponent(&self) -> Option<&Snake> {
        match &self.companions {
            Companions::Opponent { snake, .. } => Some(snake),
            _ => None,
        }
    }

    pub fn opponent_score(&self) -> Option<u32> {
        match &self.companions {
            Companions::Opponent { score, .. } => Some(*score),
            _ => None,
        }
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Advances the player by one cell
    pub fn step(&mut self, intent: Option<Direction>) -> StepOutcome {
        if self.status.is_terminal() {
            return self.terminal_outcome(self.player.head());
        }

        if let Some(dir) = intent {
            self.player.set_direction(dir);
        }
        let next = self.player.next_head();
        self.tick += 1;

        if !self.board.is_inside(next) {
            return self.lose(DeathReason::Wall, next, false);
        }
        let grow = next == self.food;
        if self.player.collides_on_advance(grow) {
            return self.lose(DeathReason::SelfCollision, next, false);
        }
        match &self.companions {
            Companions::Opponent { snake, .. } if snake.occupies(next) => {
                return self.lose(DeathReason::HitOpponent, next, false);
            }
            Companions::Shadows { left, right, .. }
                if left.occupies(next) || right.occupies(next) =>
            {
                return self.lose(DeathReason::HitMirror, next, false);
            }
            _ => {}
        }

        let advance = self.player.advance(grow);
        if let Some(vacated) = advance.vacated {
            self.release(vacated);
        }
        self.board.mark_occupied(next);
        if grow {
            self.score += self.config.rules.food_score;
        }

        let mut food_covered = false;
        if let Companions::Shadows { .. } = self.companions {
            match self.update_mirrors() {
                Ok(covered) => food_covered = covered,
                Err(side) => return self.lose(DeathReason::MirrorLost(side), next, grow),
            }
        }

        if grow || food_covered {
            self.regenerate_food();
        }
        self.check_completion();
        self.debug_check();

        StepOutcome {
            terminal: self.status.is_terminal(),
            death_reason: None,
            completion: self.completion(),
            scored: grow,
            new_head: next,
            food: self.food,
        }
    }

    /// Advances the opponent by one cell (adversarial mode only)
    ///
    /// A no-op with a terminal outcome when there is no live opponent or the
    /// session is over.
    pub fn opponent_step(&mut self, intent: Option<Direction>) -> StepOutcome {
        let player_head = self.player.head();
        if self.status.is_terminal() {
            return self.terminal_outcome(player_head);
        }
        let food_cell = self.food;
        let Companions::Opponent { snake, .. } = &mut self.companions else {
            return self.terminal_outcome(player_head);
        };
        if !snake.is_alive() {
            let head = snake.head();
            return self.terminal_outcome(head);
        }

        if let Some(dir) = intent {
            snake.set_direction(dir);
        }
        let next = snake.next_head();
        let grow = next == food_cell;

        let death = if !crate::grid::is_inside(self.config.board.size, next) {
            Some(DeathReason::Wall)
        } else if snake.collides_on_advance(grow) {
            Some(DeathReason::SelfCollision)
        } else if self.player.occupies(next) {
            Some(DeathReason::HitOpponent)
        } else {
            None
        };

        if let Some(reason) = death {
            snake.kill();
            self.score += self.config.rules.kill_bonus;
            info!(
                "Opponent died at tick {}: {:?} (player score {})",
                self.tick, reason, self.score
            );
            self.check_completion();
            return StepOutcome {
                terminal: true,
                death_reason: Some(reason),
                completion: self.completion(),
                scored: false,
                new_head: next,
                food: self.food,
            };
        }

        let advance = snake.advance(grow);
        if let Companions::Opponent { score, .. } = &mut self.companions {
            if grow {
                *score += self.config.rules.food_score;
            }
        }
        if let Some(vacated) = advance.vacated {
            self.release(vacated);
        }
        self.board.mark_occupied(next);
        if grow {
            self.regenerate_food();
        }
        self.check_completion();
        self.debug_check();

        StepOutcome {
            terminal: self.status.is_terminal(),
            death_reason: None,
            completion: self.completion(),
            scored: grow,
            new_head: next,
            food: self.food,
        }
    }

    /// Replaces a dead opponent with a fresh one; false when nothing was placed
    pub fn respawn_opponent(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match &self.companions {
            Companions::Opponent { snake, .. } if !snake.is_alive() => {}
            _ => return false,
        }

        let Some((body, direction)) = self.find_opponent_placement() else {
            warn!("No room to respawn the opponent at tick {}", self.tick);
            return false;
        };
        let fresh = match Snake::new(body, direction) {
            Ok(snake) => snake,
            Err(e) => {
                warn!("Rejected opponent placement: {}", e);
                return false;
            }
        };
        if let Companions::Opponent { snake, .. } = &mut self.companions {
            *snake = fresh;
        }
        self.opponent_ai.clear();
        self.rebuild_free();
        if let Some(opponent) = self.opponent() {
            debug!("Opponent respawned at {}", opponent.head());
        }
        true
    }

    /// Random vertical placements first, then a deterministic scan
    fn find_opponent_placement(&mut self) -> Option<(Vec<Cell>, Direction)> {
        let size = self.config.board.size;
        let len = self.config.placement.initial_length as i32;
        let fits = |session: &Session, body: &[Cell]| {
            body.iter().all(|&c| {
                session.board.is_inside(c) && !session.player.occupies(c) && c != session.food
            })
        };

        // Heads stay `respawn_margin` cells from the top and left edges and
        // the body keeps the same margin from the bottom
        let lo = self.config.placement.respawn_margin;
        let hi = size - lo - len;
        if hi >= lo {
            for _ in 0..self.config.placement.respawn_attempts {
                let row = self.rng.random_range(lo..=hi);
                let col = self.rng.random_range(lo..=hi);
                let body = Self::vertical_body(row, col, len);
                if fits(self, &body) {
                    // Down would run straight into the neck
                    let headings = [Direction::Up, Direction::Left, Direction::Right];
                    let direction = headings.choose(&mut self.rng).copied().unwrap_or(Direction::Up);
                    return Some((body, direction));
                }
            }
        }

        for row in 0..=(size - len) {
            for col in 0..size {
                let body = Self::vertical_body(row, col, len);
                if fits(self, &body) {
                    return Some((body, Direction::Up));
                }
            }
        }
        None
    }

    /// Recomputes both mirrors from the player's body
    ///
    /// Returns whether the new mirrors cover the food, or the side that died.
    fn update_mirrors(&mut self) -> Result<bool, MirrorSide> {
        let size = self.config.board.size;
        let Companions::Shadows { rule, left, right } = &mut self.companions else {
            return Ok(false);
        };

        let (new_left, new_right) = rule.project_both(self.player.cells());
        let player_cells: HashSet<Cell> = self.player.cells().collect();
        if let Some(side) = shadow::adjudicate(&player_cells, &new_left, &new_right, size) {
            if matches!(side, MirrorSide::Left | MirrorSide::Both) {
                left.kill();
            }
            if matches!(side, MirrorSide::Right | MirrorSide::Both) {
                right.kill();
            }
            left.replace(new_left);
            right.replace(new_right);
            return Err(side);
        }

        let covered = new_left.contains(&self.food) || new_right.contains(&self.food);
        let mut old = left.replace(new_left.clone());
        old.extend(right.replace(new_right.clone()));

        for cell in old {
            self.release(cell);
        }
        for cell in new_left.into_iter().chain(new_right) {
            self.board.mark_occupied(cell);
        }
        Ok(covered)
    }

    /// Places new food on a free cell, or completes the game when none is left
    fn regenerate_food(&mut self) {
        if self.board.free_count() == 0 {
            self.food = Cell::SENTINEL;
            self.status = GameStatus::Completed(Completion::BoardFilled);
            info!(
                "Board filled at tick {} (score {})",
                self.tick, self.score
            );
            return;
        }
        self.food = food::spawn(&self.board, &mut self.rng);
        self.board.mark_occupied(self.food);
    }

    fn check_completion(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        let rules = &self.config.rules;
        let target = match self.mode {
            GameMode::Adversarial => rules.adversarial_target_score,
            _ => rules.target_score,
        };
        if target > 0 && self.score >= target {
            self.status = GameStatus::Completed(Completion::TargetScore);
            info!("Target score {} reached at tick {}", target, self.tick);
        } else if rules.max_ticks > 0 && self.tick >= rules.max_ticks {
            self.status = GameStatus::Completed(Completion::TickLimit);
            info!("Tick limit {} reached (score {})", rules.max_ticks, self.score);
        }
    }

    fn completion(&self) -> Option<Completion> {
        match self.status {
            GameStatus::Completed(c) => Some(c),
            _ => None,
        }
    }

    fn lose(&mut self, reason: DeathReason, new_head: Cell, scored: bool) -> StepOutcome {
        self.status = GameStatus::Lost(reason);
        info!(
            "Game over at tick {}: {:?} (score {})",
            self.tick, reason, self.score
        );
        StepOutcome {
            terminal: true,
            death_reason: Some(reason),
            completion: None,
            scored,
            new_head,
            food: self.food,
        }
    }

    fn terminal_outcome(&self, head: Cell) -> StepOutcome {
        let death_reason = match self.status {
            GameStatus::Lost(reason) => Some(reason),
            _ => None,
        };
        StepOutcome {
            terminal: true,
            death_reason,
            completion: self.completion(),
            scored: false,
            new_head: head,
            food: self.food,
        }
    }

    /// True if any snake (including a dead opponent or a mirror) covers the cell
    fn is_snake_cell(&self, cell: Cell) -> bool {
        if self.player.occupies(cell) {
            return true;
        }
        match &self.companions {
            Companions::Solo => false,
            Companions::Opponent { snake, .. } => snake.occupies(cell),
            Companions::Shadows { left, right, .. } => left.occupies(cell) || right.occupies(cell),
        }
    }

    /// Returns a cell to the free set if nothing else holds it
    fn release(&mut self, cell: Cell) {
        if cell != self.food && !self.is_snake_cell(cell) {
            self.board.mark_free(cell);
        }
    }

    fn companion_cells(&self) -> Vec<Cell> {
        match &self.companions {
            Companions::Solo => Vec::new(),
            Companions::Opponent { snake, .. } => snake.to_vec(),
            Companions::Shadows { left, right, .. } => {
                left.body().iter().chain(right.body()).copied().collect()
            }
        }
    }

    fn snake_cells(&self) -> Vec<Cell> {
        let mut cells = self.companion_cells();
        cells.extend(self.player.cells());
        cells
    }

    fn rebuild_free(&mut self) {
        let mut taken = self.snake_cells();
        if self.board.is_inside(self.food) && self.status == GameStatus::Running {
            taken.push(self.food);
        }
        self.board.rebuild(taken);
    }

    /// Verifies free ∪ snakes ∪ {food} covers the board with no overlaps
    pub fn check_partition(&self) -> Result<(), String> {
        let mut taken: HashSet<Cell> = HashSet::new();
        let mut bodies: Vec<(&str, Vec<Cell>)> = vec![("player", self.player.to_vec())];
        match &self.companions {
            Companions::Solo => {}
            Companions::Opponent { snake, .. } => bodies.push(("opponent", snake.to_vec())),
            Companions::Shadows { left, right, .. } => {
                bodies.push(("left mirror", left.body().to_vec()));
                bodies.push(("right mirror", right.body().to_vec()));
            }
        }

        for (name, body) in &bodies {
            for &cell in body {
                if !self.board.is_inside(cell) {
                    return Err(format!("{} cell {} is outside the board", name, cell));
                }
                if !taken.insert(cell) {
                    return Err(format!("{} cell {} overlaps another snake", name, cell));
                }
            }
        }

        if self.status == GameStatus::Running {
            if taken.contains(&self.food) {
                return Err(format!("Food {} is on a snake", self.food));
            }
            taken.insert(self.food);
        }

        for &cell in self.board.free_cells() {
            if taken.contains(&cell) {
                return Err(format!("Free cell {} is also taken", cell));
            }
        }
        if self.status == GameStatus::Running
            && self.board.free_count() + taken.len() != self.board.area()
        {
            return Err(format!(
                "Partition covers {} of {} cells",
                self.board.free_count() + taken.len(),
                self.board.area()
            ));
        }
        Ok(())
    }

    fn debug_check(&self) {
        if self.status == GameStatus::Running {
            debug_assert!(
                self.check_partition().is_ok(),
                "{:?}",
                self.check_partition()
            );
        }
    }

    /// Asks the bot for a move for one snake, or None if it cannot move
    pub fn decide(&mut self, bot: &Bot, who: Controlled) -> Option<Direction> {
        if self.status.is_terminal() {
            return None;
        }
        let size = self.config.board.size;
        match who {
            Controlled::Player => {
                let (rival, shadow) = match &self.companions {
                    Companions::Opponent { snake, score } if snake.is_alive() => {
                        (Some(RivalView { snake, score: *score }), None)
                    }
                    Companions::Shadows { rule, .. } => (None, Some(*rule)),
                    _ => (None, None),
                };
                let view = GameView {
                    board_size: size,
                    own: &self.player,
                    own_score: self.score,
                    rival,
                    food: self.food,
                    obstacles: OccupancyGrid::from_cells(size, self.companion_cells()),
                    shadow,
                };
                Some(bot.decide(&view, &mut self.player_ai))
            }
            Controlled::Opponent => {
                let Companions::Opponent { snake, score } = &self.companions else {
                    return None;
                };
                if !snake.is_alive() {
                    return None;
                }
                let view = GameView {
                    board_size: size,
                    own: snake,
                    own_score: *score,
                    rival: Some(RivalView {
                        snake: &self.player,
                        score: self.score,
                    }),
                    food: self.food,
                    obstacles: OccupancyGrid::from_cells(size, self.player.cells()),
                    shadow: None,
                };
                Some(bot.decide(&view, &mut self.opponent_ai))
            }
        }
    }

    /// Runs one full tick: player, then the opponent's decision and step,
    /// then an immediate respawn if the opponent is dead
    pub fn tick(&mut self, bot: &Bot, control: PlayerControl) -> TickReport {
        let player_intent = match control {
            PlayerControl::Manual(intent) => intent,
            PlayerControl::Autopilot => self.decide(bot, Controlled::Player),
        };
        let player = self.step(player_intent);

        let mut opponent_intent = None;
        let mut opponent = None;
        let mut respawned = false;
        if self.mode == GameMode::Adversarial && !self.status.is_terminal() {
            opponent_intent = self.decide(bot, Controlled::Opponent);
            opponent = Some(self.opponent_step(opponent_intent));
            if self.opponent().map_or(false, |s| !s.is_alive()) {
                respawned = self.respawn_opponent();
            }
        }

        TickReport {
            player_intent,
            player,
            opponent_intent,
            opponent,
            respawned,
        }
    }

    /// Serializable view of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        let (opponent, opponent_score, mirrors) = match &self.companions {
            Companions::Solo => (None, None, None),
            Companions::Opponent { snake, score } => {
                (Some(SnakeSnapshot::from(snake)), Some(*score), None)
            }
            Companions::Shadows { left, right, .. } => (
                None,
                None,
                Some(MirrorSnapshot {
                    left: left.body().to_vec(),
                    right: right.body().to_vec(),
                    left_alive: left.is_alive(),
                    right_alive: right.is_alive(),
                }),
            ),
        };
        SessionSnapshot {
            mode: self.mode,
            board_size: self.config.board.size,
            tick: self.tick,
            player: SnakeSnapshot::from(&self.player),
            opponent,
            mirrors,
            food: self.food,
            score: self.score,
            opponent_score,
            status: self.status,
        }
    }
}

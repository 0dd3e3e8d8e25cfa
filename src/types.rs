// Core value types shared by the simulation and the decision engine
//
// Cells are (row, col) pairs with row 0 at the top of the board.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D grid coordinate
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// Placeholder food position used once the board is completely filled
    pub const SENTINEL: Cell = Cell::new(0, 0);

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: Cell) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Distance to the nearest board edge (0 for edge cells)
    pub fn border_distance(&self, board_size: i32) -> i32 {
        self.row
            .min(board_size - 1 - self.row)
            .min(self.col)
            .min(board_size - 1 - self.col)
    }

    /// The four orthogonal neighbours in `Direction::all()` order
    pub fn neighbors(&self) -> [Cell; 4] {
        let all = Direction::all();
        [
            all[0].apply(self),
            all[1].apply(self),
            all[2].apply(self),
            all[3].apply(self),
        ]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Represents the four possible movement directions for a snake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to its lowercase string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses the lowercase (or mixed case) string form
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Decodes the numeric action used by input layers:
    /// 0 up, 1 left, 2 right, 3 down, anything else means "keep going"
    pub fn from_action(action: i64) -> Option<Direction> {
        match action {
            0 => Some(Direction::Up),
            1 => Some(Direction::Left),
            2 => Some(Direction::Right),
            3 => Some(Direction::Down),
            _ => None,
        }
    }

    /// The direction that would reverse a snake onto its own neck
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Calculates the next cell when moving in this direction
    pub fn apply(&self, cell: &Cell) -> Cell {
        match self {
            Direction::Up => Cell { row: cell.row - 1, col: cell.col },
            Direction::Down => Cell { row: cell.row + 1, col: cell.col },
            Direction::Left => Cell { row: cell.row, col: cell.col - 1 },
            Direction::Right => Cell { row: cell.row, col: cell.col + 1 },
        }
    }
}

/// Which of the two shadow snakes a mirror event refers to
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MirrorSide {
    Left,
    Right,
    Both,
}

/// Why a snake died
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DeathReason {
    /// Head left the board
    Wall,
    /// Head ran into the snake's own body
    SelfCollision,
    /// Head ran into the rival snake (opponent or player)
    HitOpponent,
    /// Player ran into one of its shadow snakes
    HitMirror,
    /// A shadow snake died, which is fatal to the player
    MirrorLost(MirrorSide),
}

/// Non-fatal ways a session can end
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// No free cell is left for food
    BoardFilled,
    /// Player score reached the configured target
    TargetScore,
    /// The configured tick limit was reached
    TickLimit,
}

/// Session lifecycle state
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Running,
    Lost(DeathReason),
    Completed(Completion),
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Running)
    }
}

/// Session configuration variants
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One snake alone on the board
    Classic,
    /// Player against an AI-controlled opponent
    Adversarial,
    /// Player flanked by two mirrored shadow snakes
    Shadow,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Adversarial => "adversarial",
            GameMode::Shadow => "shadow",
        }
    }

    pub fn parse(s: &str) -> Result<GameMode, String> {
        match s.to_lowercase().as_str() {
            "classic" | "normal" => Ok(GameMode::Classic),
            "adversarial" | "opponent" => Ok(GameMode::Adversarial),
            "shadow" | "three" => Ok(GameMode::Shadow),
            _ => Err(format!("Invalid game mode: {}", s)),
        }
    }
}

/// Which snake an AI decision is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controlled {
    Player,
    Opponent,
}

/// Result of advancing one snake by one tick
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// True when this step ended the snake (or the session)
    pub terminal: bool,
    pub death_reason: Option<DeathReason>,
    pub completion: Option<Completion>,
    /// True when food was eaten during this step
    pub scored: bool,
    pub new_head: Cell,
    /// Food position after the step
    pub food: Cell,
}

/// Result of a full ordered tick (player first, then the opponent)
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub player_intent: Option<Direction>,
    pub player: StepOutcome,
    pub opponent_intent: Option<Direction>,
    pub opponent: Option<StepOutcome>,
    pub respawned: bool,
}

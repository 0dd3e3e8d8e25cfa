// Snake entity: ordered body, heading, life state and an occupancy index
// that is kept 1:1 with the body by every mutation in this module.

use serde::{Deserialize, Serialize};
use std::collections::{vec_deque, HashSet, VecDeque};
use std::iter::Copied;

use crate::types::{Cell, Direction};

/// Result of moving a snake one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub new_head: Cell,
    /// Tail cell released by this move (None when growing or when the move was fatal)
    pub vacated: Option<Cell>,
}

#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    occupancy: HashSet<Cell>,
    direction: Direction,
    alive: bool,
}

impl Snake {
    /// Builds a live snake from head-first body cells
    ///
    /// The body must be non-empty, free of duplicates, and orthogonally connected.
    pub fn new(body: Vec<Cell>, direction: Direction) -> Result<Self, String> {
        if body.is_empty() {
            return Err("Snake body must not be empty".to_string());
        }

        let occupancy: HashSet<Cell> = body.iter().copied().collect();
        if occupancy.len() != body.len() {
            return Err(format!("Snake body has duplicate cells: {:?}", body));
        }

        if let Some(pair) = body.windows(2).find(|w| w[0].manhattan(w[1]) != 1) {
            return Err(format!(
                "Snake body is not connected between {} and {}",
                pair[0], pair[1]
            ));
        }

        Ok(Snake {
            body: body.into_iter().collect(),
            occupancy,
            direction,
            alive: true,
        })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn cells(&self) -> Copied<vec_deque::Iter<'_, Cell>> {
        self.body.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.cells().collect()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.occupancy.contains(&cell)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Changes heading unless the new heading reverses onto the neck
    ///
    /// Returns false (and keeps the current heading) for a reversal.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Cell the head would enter on the next move
    pub fn next_head(&self) -> Cell {
        self.direction.apply(&self.head())
    }

    /// Whether the next move would bite the body (the tail is free unless growing)
    pub fn collides_on_advance(&self, grow: bool) -> bool {
        let next = self.next_head();
        self.occupies(next) && (grow || next != self.tail())
    }

    /// Moves one cell along the current heading
    ///
    /// The tail is released before the head moves in, so entering the
    /// current tail cell is legal when not growing. A move that would bite
    /// the body leaves the snake untouched; callers check
    /// `collides_on_advance` first to tell it apart.
    pub fn advance(&mut self, grow: bool) -> Advance {
        let new_head = self.next_head();
        let tail = self.tail();

        if self.collides_on_advance(grow) {
            return Advance {
                new_head,
                vacated: None,
            };
        }

        let vacated = if grow {
            None
        } else {
            self.body.pop_back();
            self.occupancy.remove(&tail);
            Some(tail)
        };

        self.body.push_front(new_head);
        self.occupancy.insert(new_head);
        debug_assert_eq!(self.body.len(), self.occupancy.len());

        Advance { new_head, vacated }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Serializable view of a snake used in snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    pub body: Vec<Cell>,
    pub direction: Direction,
    pub alive: bool,
}

impl From<&Snake> for SnakeSnapshot {
    fn from(snake: &Snake) -> Self {
        SnakeSnapshot {
            body: snake.to_vec(),
            direction: snake.direction(),
            alive: snake.is_alive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical(head: Cell, direction: Direction) -> Snake {
        Snake::new(
            vec![head, Cell::new(head.row + 1, head.col), Cell::new(head.row + 2, head.col)],
            direction,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_bodies() {
        assert!(Snake::new(vec![], Direction::Up).is_err());
        assert!(Snake::new(vec![Cell::new(0, 0), Cell::new(0, 0)], Direction::Up).is_err());
        assert!(Snake::new(vec![Cell::new(0, 0), Cell::new(2, 0)], Direction::Up).is_err());
    }

    #[test]
    fn test_advance_without_growth_keeps_length() {
        let mut snake = vertical(Cell::new(5, 5), Direction::Up);
        let step = snake.advance(false);
        assert_eq!(step.new_head, Cell::new(4, 5));
        assert_eq!(step.vacated, Some(Cell::new(7, 5)));
        assert_eq!(snake.len(), 3);
        assert!(!snake.occupies(Cell::new(7, 5)));
        assert!(snake.occupies(Cell::new(4, 5)));
    }

    #[test]
    fn test_advance_with_growth_adds_one() {
        let mut snake = vertical(Cell::new(5, 5), Direction::Up);
        let step = snake.advance(true);
        assert_eq!(step.vacated, None);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Cell::new(7, 5));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut snake = vertical(Cell::new(5, 5), Direction::Up);
        assert!(!snake.set_direction(Direction::Down));
        assert_eq!(snake.direction(), Direction::Up);
        assert!(snake.set_direction(Direction::Left));
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn test_following_own_tail_is_legal() {
        // 2x2 loop: head (0,0), then (0,1), (1,1), tail (1,0)
        let mut snake = Snake::new(
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1), Cell::new(1, 0)],
            Direction::Left,
        )
        .unwrap();
        snake.set_direction(Direction::Down);
        assert!(!snake.collides_on_advance(false));
        let step = snake.advance(false);
        assert_eq!(step.vacated, Some(Cell::new(1, 0)));
        assert_eq!(snake.head(), Cell::new(1, 0));
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn test_self_collision_leaves_body_untouched() {
        let mut snake = Snake::new(
            vec![
                Cell::new(1, 1),
                Cell::new(1, 2),
                Cell::new(2, 2),
                Cell::new(2, 1),
                Cell::new(2, 0),
            ],
            Direction::Left,
        )
        .unwrap();
        snake.set_direction(Direction::Down);
        let before = snake.to_vec();
        assert!(snake.collides_on_advance(false));
        let step = snake.advance(false);
        assert_eq!(step.vacated, None);
        assert_eq!(snake.to_vec(), before);
    }
}

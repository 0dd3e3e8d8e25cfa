// Per-snake AI working memory and loop detection
//
// The memory is heuristic state only: recent head positions, recently chosen
// directions, and a private RNG so AI tie-breaking never consumes randomness
// from the session's food/respawn stream.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashSet, VecDeque};

use crate::config::OscillationConfig;
use crate::types::{Cell, Direction};

#[derive(Debug, Clone)]
pub struct AiMemory {
    recent_positions: VecDeque<Cell>,
    previous_directions: VecDeque<Direction>,
    position_capacity: usize,
    direction_capacity: usize,
    rng: StdRng,
}

impl AiMemory {
    pub fn new(position_capacity: usize, direction_capacity: usize, seed: u64) -> Self {
        AiMemory {
            recent_positions: VecDeque::with_capacity(position_capacity),
            previous_directions: VecDeque::with_capacity(direction_capacity),
            position_capacity,
            direction_capacity,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Appends a head position, evicting the oldest past capacity
    pub fn record_position(&mut self, cell: Cell) {
        if self.position_capacity == 0 {
            return;
        }
        while self.recent_positions.len() >= self.position_capacity {
            self.recent_positions.pop_front();
        }
        self.recent_positions.push_back(cell);
    }

    /// Appends a chosen direction, evicting the oldest past capacity
    pub fn record_direction(&mut self, direction: Direction) {
        if self.direction_capacity == 0 {
            return;
        }
        while self.previous_directions.len() >= self.direction_capacity {
            self.previous_directions.pop_front();
        }
        self.previous_directions.push_back(direction);
    }

    pub fn recent_positions(&self) -> &VecDeque<Cell> {
        &self.recent_positions
    }

    pub fn previous_directions(&self) -> &VecDeque<Direction> {
        &self.previous_directions
    }

    /// True when `direction` was chosen on each of the last two decisions
    pub fn repeated_twice(&self, direction: Direction) -> bool {
        let n = self.previous_directions.len();
        n >= 2
            && self.previous_directions[n - 1] == direction
            && self.previous_directions[n - 2] == direction
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn clear(&mut self) {
        self.recent_positions.clear();
        self.previous_directions.clear();
    }
}

/// Reports whether moving to `candidate` looks like circling in place
///
/// `progress` is the occupied fraction of the board.
pub fn is_looping(
    candidate: Cell,
    memory: &AiMemory,
    snake_len: usize,
    progress: f64,
    config: &OscillationConfig,
) -> bool {
    let history = memory.recent_positions();
    if snake_len < config.min_length || history.len() < config.min_history {
        return false;
    }

    let distinct: HashSet<Cell> = last_n(history, config.distinct_window).collect();
    if distinct.len() <= config.min_distinct {
        return true;
    }

    if history.len() >= config.distance_min_history && config.distance_window > 0 {
        let window: Vec<Cell> = last_n(history, config.distance_window).collect();
        let total: i32 = window.iter().map(|&old| candidate.manhattan(old)).sum();
        let mean = total as f64 / window.len() as f64;
        let threshold = if progress > config.late_game_threshold {
            config.late_distance_threshold
        } else {
            config.distance_threshold
        };
        if mean < threshold {
            return true;
        }
    }

    if history.len() >= config.reversal_window {
        let window: Vec<Cell> = last_n(history, config.reversal_window).collect();
        let mut reversals = 0;
        for triple in window.windows(3) {
            let prev = (triple[1].row - triple[0].row, triple[1].col - triple[0].col);
            let curr = (triple[2].row - triple[1].row, triple[2].col - triple[1].col);
            if prev.0 == -curr.0 && prev.1 == -curr.1 {
                reversals += 1;
                if reversals >= config.max_reversals {
                    return true;
                }
            }
        }
    }

    false
}

fn last_n(history: &VecDeque<Cell>, n: usize) -> impl Iterator<Item = Cell> + '_ {
    history.iter().skip(history.len().saturating_sub(n)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn cfg() -> OscillationConfig {
        Config::default_hardcoded().oscillation
    }

    fn memory_with(cells: &[Cell]) -> AiMemory {
        let mut memory = AiMemory::new(30, 10, 0);
        for &c in cells {
            memory.record_position(c);
        }
        memory
    }

    /// A clockwise walk around a 2x2 block, repeated
    fn tight_circle(len: usize) -> Vec<Cell> {
        let ring = [Cell::new(5, 5), Cell::new(5, 6), Cell::new(6, 6), Cell::new(6, 5)];
        (0..len).map(|i| ring[i % 4]).collect()
    }

    /// A straight walk along one row
    fn straight_line(len: usize) -> Vec<Cell> {
        (0..len).map(|i| Cell::new(3, i as i32)).collect()
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let memory = memory_with(&straight_line(40));
        assert_eq!(memory.recent_positions().len(), 30);
        assert_eq!(memory.recent_positions().front(), Some(&Cell::new(3, 10)));
    }

    #[test]
    fn test_short_snake_never_loops() {
        let memory = memory_with(&tight_circle(20));
        assert!(!is_looping(Cell::new(5, 5), &memory, 4, 0.1, &cfg()));
    }

    #[test]
    fn test_short_history_never_loops() {
        let memory = memory_with(&tight_circle(8));
        assert!(!is_looping(Cell::new(5, 5), &memory, 10, 0.1, &cfg()));
    }

    #[test]
    fn test_tight_circle_is_detected() {
        let memory = memory_with(&tight_circle(20));
        assert!(is_looping(Cell::new(5, 5), &memory, 10, 0.1, &cfg()));
    }

    #[test]
    fn test_straight_walk_is_not_looping() {
        let memory = memory_with(&straight_line(20));
        assert!(!is_looping(Cell::new(3, 20), &memory, 10, 0.1, &cfg()));
    }

    #[test]
    fn test_zig_zag_reversals_are_detected() {
        // Walk right, then bounce back and forth twice
        let mut cells = straight_line(12);
        cells.push(Cell::new(3, 10));
        cells.push(Cell::new(3, 11));
        cells.push(Cell::new(3, 10));
        let memory = memory_with(&cells);
        assert!(is_looping(Cell::new(2, 10), &memory, 10, 0.1, &cfg()));
    }

    #[test]
    fn test_repeated_twice() {
        let mut memory = AiMemory::new(30, 10, 0);
        memory.record_direction(Direction::Up);
        assert!(!memory.repeated_twice(Direction::Up));
        memory.record_direction(Direction::Up);
        assert!(memory.repeated_twice(Direction::Up));
        memory.record_direction(Direction::Left);
        assert!(!memory.repeated_twice(Direction::Up));
    }
}

// Food placement over the free-cell set

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::grid::Board;
use crate::types::Cell;

/// Picks a uniformly random free cell, or the sentinel when the board is full
pub fn spawn<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Cell {
    board
        .free_cells()
        .choose(rng)
        .copied()
        .unwrap_or(Cell::SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_lands_on_free_cell() {
        let mut board = Board::new(4);
        board.rebuild(vec![Cell::new(0, 0), Cell::new(1, 1)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let food = spawn(&board, &mut rng);
            assert!(board.is_free(food), "food {} spawned on a taken cell", food);
        }
    }

    #[test]
    fn test_spawn_on_full_board_returns_sentinel() {
        let mut board = Board::new(2);
        let all: Vec<Cell> = board.all_cells().collect();
        board.rebuild(all);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(spawn(&board, &mut rng), Cell::SENTINEL);
    }

    #[test]
    fn test_same_seed_same_food() {
        let board = Board::new(10);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let seq_a: Vec<Cell> = (0..10).map(|_| spawn(&board, &mut a)).collect();
        let seq_b: Vec<Cell> = (0..10).map(|_| spawn(&board, &mut b)).collect();
        assert_eq!(seq_a, seq_b);
    }
}

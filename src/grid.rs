// Board geometry, the free-cell set, and read-only occupancy bitmaps
//
// The free-cell set is an indexed set: a dense Vec of free cells plus a
// per-cell slot index, so insert/remove are O(1) and iteration order only
// depends on the sequence of operations applied to it.

use crate::types::Cell;

const NOT_FREE: usize = usize::MAX;

/// Square board that owns the free-cell set
#[derive(Debug, Clone)]
pub struct Board {
    size: i32,
    free_cells: Vec<Cell>,
    free_pos: Vec<usize>,
}

impl Board {
    /// Creates a board with every cell free
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        let area = (size * size) as usize;
        let mut board = Board {
            size,
            free_cells: Vec::with_capacity(area),
            free_pos: vec![NOT_FREE; area],
        };
        for idx in 0..area {
            let cell = board.cell_at(idx);
            board.free_pos[idx] = board.free_cells.len();
            board.free_cells.push(cell);
        }
        board
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn area(&self) -> usize {
        (self.size * self.size) as usize
    }

    pub fn is_inside(&self, cell: Cell) -> bool {
        is_inside(self.size, cell)
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.index(cell)
            .map(|idx| self.free_pos[idx] != NOT_FREE)
            .unwrap_or(false)
    }

    /// Removes a cell from the free set (no-op when already occupied or out of bounds)
    pub fn mark_occupied(&mut self, cell: Cell) {
        let Some(idx) = self.index(cell) else {
            return;
        };
        let pos = self.free_pos[idx];
        if pos == NOT_FREE {
            return;
        }
        self.free_cells.swap_remove(pos);
        self.free_pos[idx] = NOT_FREE;
        if let Some(&moved) = self.free_cells.get(pos) {
            if let Some(moved_idx) = self.index(moved) {
                self.free_pos[moved_idx] = pos;
            }
        }
    }

    /// Returns a cell to the free set (no-op when already free or out of bounds)
    pub fn mark_free(&mut self, cell: Cell) {
        let Some(idx) = self.index(cell) else {
            return;
        };
        if self.free_pos[idx] != NOT_FREE {
            return;
        }
        self.free_pos[idx] = self.free_cells.len();
        self.free_cells.push(cell);
    }

    /// Resets the free set to every cell not covered by `occupied`
    pub fn rebuild<I>(&mut self, occupied: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        let area = self.area();
        let mut taken = vec![false; area];
        for cell in occupied {
            if let Some(idx) = self.index(cell) {
                taken[idx] = true;
            }
        }

        self.free_cells.clear();
        self.free_pos.clear();
        self.free_pos.resize(area, NOT_FREE);
        for (idx, is_taken) in taken.into_iter().enumerate() {
            if !is_taken {
                self.free_pos[idx] = self.free_cells.len();
                self.free_cells.push(self.cell_at(idx));
            }
        }
    }

    pub fn free_cells(&self) -> &[Cell] {
        &self.free_cells
    }

    pub fn free_count(&self) -> usize {
        self.free_cells.len()
    }

    /// Every board cell in row-major order
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.area()).map(move |idx| self.cell_at(idx))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.is_inside(cell) {
            Some((cell.row * self.size + cell.col) as usize)
        } else {
            None
        }
    }

    fn cell_at(&self, idx: usize) -> Cell {
        let size = self.size as usize;
        Cell::new((idx / size) as i32, (idx % size) as i32)
    }
}

/// Bounds check shared by every component that only knows the board size
pub fn is_inside(size: i32, cell: Cell) -> bool {
    cell.row >= 0 && cell.row < size && cell.col >= 0 && cell.col < size
}

/// Read-only bitmap of blocked cells handed to the search algorithms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    size: i32,
    blocked: Vec<bool>,
    blocked_count: usize,
}

impl OccupancyGrid {
    /// An empty grid with nothing blocked
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        OccupancyGrid {
            size,
            blocked: vec![false; (size * size) as usize],
            blocked_count: 0,
        }
    }

    /// A grid with the given cells blocked
    pub fn from_cells<I>(size: i32, cells: I) -> Self
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut grid = OccupancyGrid::new(size);
        for cell in cells {
            grid.block(cell);
        }
        grid
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn area(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_inside(&self, cell: Cell) -> bool {
        is_inside(self.size, cell)
    }

    /// True when the cell is off the board or occupied
    pub fn is_blocked(&self, cell: Cell) -> bool {
        match self.index(cell) {
            Some(idx) => self.blocked[idx],
            None => true,
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked_count
    }

    /// Share of board cells that are blocked, in [0, 1]
    pub fn occupied_fraction(&self) -> f64 {
        if self.blocked.is_empty() {
            return 1.0;
        }
        self.blocked_count as f64 / self.blocked.len() as f64
    }

    pub fn block(&mut self, cell: Cell) {
        if let Some(idx) = self.index(cell) {
            if !self.blocked[idx] {
                self.blocked[idx] = true;
                self.blocked_count += 1;
            }
        }
    }

    pub fn unblock(&mut self, cell: Cell) {
        if let Some(idx) = self.index(cell) {
            if self.blocked[idx] {
                self.blocked[idx] = false;
                self.blocked_count -= 1;
            }
        }
    }

    /// Copy of this grid with one extra obstacle
    pub fn with_blocked(&self, cell: Cell) -> Self {
        let mut grid = self.clone();
        grid.block(cell);
        grid
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.is_inside(cell) {
            Some((cell.row * self.size + cell.col) as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_all_free() {
        let board = Board::new(5);
        assert_eq!(board.free_count(), 25);
        assert!(board.is_free(Cell::new(0, 0)));
        assert!(board.is_free(Cell::new(4, 4)));
        assert!(!board.is_free(Cell::new(5, 0)), "out of bounds is never free");
    }

    #[test]
    fn test_mark_occupied_and_free_round_trip() {
        let mut board = Board::new(4);
        let cell = Cell::new(1, 2);
        board.mark_occupied(cell);
        assert!(!board.is_free(cell));
        assert_eq!(board.free_count(), 15);

        // Marking twice is a no-op
        board.mark_occupied(cell);
        assert_eq!(board.free_count(), 15);

        board.mark_free(cell);
        assert!(board.is_free(cell));
        assert_eq!(board.free_count(), 16);
    }

    #[test]
    fn test_free_index_stays_consistent_after_swap_remove() {
        let mut board = Board::new(3);
        board.mark_occupied(Cell::new(0, 0));
        board.mark_occupied(Cell::new(1, 1));
        board.mark_occupied(Cell::new(2, 2));

        for &cell in board.free_cells() {
            assert!(board.is_free(cell), "{} listed but not free", cell);
        }
        assert_eq!(board.free_count(), 6);

        for cell in board.free_cells().to_vec() {
            board.mark_occupied(cell);
        }
        assert_eq!(board.free_count(), 0);
    }

    #[test]
    fn test_out_of_bounds_marks_are_ignored() {
        let mut board = Board::new(3);
        board.mark_occupied(Cell::new(-1, 0));
        board.mark_free(Cell::new(3, 3));
        assert_eq!(board.free_count(), 9);
    }

    #[test]
    fn test_rebuild_excludes_occupied() {
        let mut board = Board::new(3);
        board.rebuild(vec![Cell::new(0, 0), Cell::new(0, 1)]);
        assert_eq!(board.free_count(), 7);
        assert!(!board.is_free(Cell::new(0, 1)));
        assert_eq!(board.free_cells()[0], Cell::new(0, 2));
    }

    #[test]
    fn test_occupancy_grid_blocks_out_of_bounds() {
        let grid = OccupancyGrid::from_cells(4, vec![Cell::new(1, 1)]);
        assert!(grid.is_blocked(Cell::new(1, 1)));
        assert!(grid.is_blocked(Cell::new(-1, 0)));
        assert!(grid.is_blocked(Cell::new(0, 4)));
        assert!(!grid.is_blocked(Cell::new(0, 0)));
        assert!((grid.occupied_fraction() - 1.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_with_blocked_leaves_original_untouched() {
        let grid = OccupancyGrid::new(4);
        let extra = grid.with_blocked(Cell::new(2, 2));
        assert!(!grid.is_blocked(Cell::new(2, 2)));
        assert!(extra.is_blocked(Cell::new(2, 2)));
        assert_eq!(extra.blocked_count(), 1);
    }
}

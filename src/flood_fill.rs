// Reachable-space evaluation
//
// The score of a region is a sum of static per-cell weights, so removing
// cells from the region (adding obstacles) can never raise it. Late-game
// weights are never above early-game weights, and a region larger than the
// node budget saturates at `budget * max_weight` for the active phase.

use std::collections::{HashSet, VecDeque};

use crate::config::FloodFillConfig;
use crate::grid::OccupancyGrid;
use crate::types::Cell;

/// Lowest score any region (including an unreachable start) can get
pub const MIN_SPACE_SCORE: f64 = 1.0;

/// Full result of exploring the region around a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpaceReport {
    pub score: f64,
    /// Cells reached (capped at the budget when truncated)
    pub cells: usize,
    /// The region was larger than the node budget
    pub truncated: bool,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Early,
    Late { band: i32 },
}

/// Scores the reachable space from `start`
pub fn evaluate(start: Cell, occupied: &OccupancyGrid, config: &FloodFillConfig) -> f64 {
    explore(start, occupied, config).score
}

/// Breadth-first exploration from `start` with the weighted space score
pub fn explore(start: Cell, occupied: &OccupancyGrid, config: &FloodFillConfig) -> SpaceReport {
    if occupied.is_blocked(start) {
        return SpaceReport {
            score: MIN_SPACE_SCORE,
            cells: 0,
            truncated: false,
        };
    }

    let size = occupied.size();
    let budget = config.budget(occupied.area());
    let phase = phase_for(occupied.occupied_fraction(), config);

    let mut seen: HashSet<Cell> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut total = 0.0;
    let mut truncated = false;

    seen.insert(start);
    queue.push_back(start);
    total += cell_weight(start, start, size, phase, config);

    'bfs: while let Some(cell) = queue.pop_front() {
        for next in cell.neighbors() {
            if occupied.is_blocked(next) || seen.contains(&next) {
                continue;
            }
            if seen.len() >= budget {
                truncated = true;
                break 'bfs;
            }
            seen.insert(next);
            total += cell_weight(next, start, size, phase, config);
            queue.push_back(next);
        }
    }

    let score = if truncated {
        budget as f64 * max_weight(phase, config)
    } else {
        total
    };

    SpaceReport {
        score: score.max(MIN_SPACE_SCORE),
        cells: seen.len(),
        truncated,
    }
}

fn phase_for(progress: f64, config: &FloodFillConfig) -> Phase {
    if progress > config.late_game_threshold {
        let band = if progress > config.wide_boundary_threshold {
            2
        } else {
            1
        };
        Phase::Late { band }
    } else {
        Phase::Early
    }
}

fn cell_weight(cell: Cell, start: Cell, size: i32, phase: Phase, config: &FloodFillConfig) -> f64 {
    let border = cell.border_distance(size);
    match phase {
        Phase::Early => {
            let spread = cell.manhattan(start).min(config.spread_cap).max(0) as f64;
            let boundary = if border <= 1 {
                config.boundary_penalty
            } else {
                0.0
            };
            (1.0 + config.spread_weight * spread) * (1.0 - boundary)
        }
        Phase::Late { band } => {
            if border > band {
                config.late_game_scale
            } else {
                0.0
            }
        }
    }
}

fn max_weight(phase: Phase, config: &FloodFillConfig) -> f64 {
    match phase {
        Phase::Early => 1.0 + config.spread_weight * config.spread_cap.max(0) as f64,
        Phase::Late { .. } => config.late_game_scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn cfg() -> FloodFillConfig {
        Config::default_hardcoded().flood_fill
    }

    #[test]
    fn test_blocked_start_scores_minimum() {
        let grid = OccupancyGrid::from_cells(10, vec![Cell::new(4, 4)]);
        let report = explore(Cell::new(4, 4), &grid, &cfg());
        assert_eq!(report.score, MIN_SPACE_SCORE);
        assert_eq!(report.cells, 0);
        assert_eq!(evaluate(Cell::new(-1, 0), &grid, &cfg()), MIN_SPACE_SCORE);
    }

    #[test]
    fn test_single_cell_pocket_scores_minimum() {
        // (0,0) sealed in by (0,1) and (1,0)
        let grid = OccupancyGrid::from_cells(10, vec![Cell::new(0, 1), Cell::new(1, 0)]);
        let report = explore(Cell::new(0, 0), &grid, &cfg());
        assert_eq!(report.cells, 1);
        assert!(!report.truncated);
        assert_eq!(report.score, MIN_SPACE_SCORE);
    }

    #[test]
    fn test_large_region_saturates() {
        let grid = OccupancyGrid::new(10);
        let report = explore(Cell::new(5, 5), &grid, &cfg());
        assert!(report.truncated);
        // budget 50, early max weight 1 + 0.25 * 8
        assert!((report.score - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_open_space_beats_corridor() {
        // 20x20 board split by a wall at row 3: 60 cells above, 320 below
        let wall: Vec<Cell> = (0..20).map(|c| Cell::new(3, c)).collect();
        let grid = OccupancyGrid::from_cells(20, wall);
        let corridor = explore(Cell::new(1, 1), &grid, &cfg());
        let open = explore(Cell::new(12, 12), &grid, &cfg());
        assert_eq!(corridor.cells, 60);
        assert!(!corridor.truncated);
        assert!(open.truncated);
        assert!(open.score > corridor.score);
    }

    #[test]
    fn test_adding_obstacles_never_raises_score() {
        let config = cfg();
        let start = Cell::new(2, 2);
        let mut grid = OccupancyGrid::new(8);
        let mut previous = evaluate(start, &grid, &config);
        // Fill the board cell by cell in row-major order, skipping the start
        for row in 0..8 {
            for col in 0..8 {
                let cell = Cell::new(row, col);
                if cell == start {
                    continue;
                }
                grid = grid.with_blocked(cell);
                let current = evaluate(start, &grid, &config);
                assert!(
                    current <= previous + 1e-9,
                    "blocking {} raised the score from {} to {}",
                    cell,
                    previous,
                    current
                );
                previous = current;
            }
        }
        assert_eq!(previous, MIN_SPACE_SCORE);
    }
}

// A* shortest-path search over an occupancy grid
//
// Unit step cost, Manhattan heuristic scaled down as the board fills, and a
// hard cap on node expansions. The open set is a binary heap ordered by
// f-score, then by depth (deeper first), then by insertion sequence, which
// keeps the search fully deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::config::PathfindingConfig;
use crate::grid::OccupancyGrid;
use crate::types::{Cell, Direction};

/// A route from the start cell to the goal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub directions: Vec<Direction>,
    pub cost: usize,
}

impl Path {
    pub fn first(&self) -> Option<Direction> {
        self.directions.first().copied()
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Cells visited after leaving `start`, ending at the goal
    pub fn cells(&self, start: Cell) -> Vec<Cell> {
        let mut current = start;
        self.directions
            .iter()
            .map(|d| {
                current = d.apply(&current);
                current
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    f: f64,
    g: usize,
    seq: u64,
    cell: Cell,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

/// Finds a shortest path from `start` to `goal`
///
/// The start cell itself may be occupied (it is usually a snake head).
/// Returns None when the goal is blocked, unreachable, or the expansion
/// budget runs out first.
pub fn find_path(
    start: Cell,
    goal: Cell,
    occupied: &OccupancyGrid,
    config: &PathfindingConfig,
) -> Option<Path> {
    if occupied.is_blocked(goal) {
        return None;
    }
    if start == goal {
        return Some(Path {
            directions: Vec::new(),
            cost: 0,
        });
    }

    let progress = occupied.occupied_fraction();
    let discount = config.max_heuristic_discount;
    let heuristic_factor = 1.0 - discount.min(progress * discount);
    let prune = progress > config.prune_threshold;
    let budget = config.budget(occupied.area());

    let heuristic = |cell: Cell| heuristic_factor * cell.manhattan(goal) as f64;

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<Cell> = HashSet::new();
    let mut g_score: HashMap<Cell, usize> = HashMap::new();
    let mut came_from: HashMap<Cell, (Cell, Direction)> = HashMap::new();
    let mut seq: u64 = 0;
    let mut expansions = 0usize;

    g_score.insert(start, 0);
    open.push(OpenNode {
        f: heuristic(start),
        g: 0,
        seq,
        cell: start,
    });

    while let Some(node) = open.pop() {
        if closed.contains(&node.cell) {
            continue;
        }
        if expansions >= budget {
            break;
        }
        expansions += 1;

        if node.cell == goal {
            return Some(reconstruct(&came_from, start, goal, node.g));
        }
        closed.insert(node.cell);

        for dir in candidate_directions(node.cell, goal, prune) {
            let neighbor = dir.apply(&node.cell);
            if occupied.is_blocked(neighbor) || closed.contains(&neighbor) {
                continue;
            }

            let tentative = node.g + 1;
            let improves = g_score
                .get(&neighbor)
                .map_or(true, |&known| tentative < known);
            if improves {
                g_score.insert(neighbor, tentative);
                came_from.insert(neighbor, (node.cell, dir));
                seq += 1;
                open.push(OpenNode {
                    f: tentative as f64 + heuristic(neighbor),
                    g: tentative,
                    seq,
                    cell: neighbor,
                });
            }
        }
    }

    None
}

/// All four directions, or only the distance-reducing ones when pruning
fn candidate_directions(from: Cell, goal: Cell, prune: bool) -> Vec<Direction> {
    let all = Direction::all();
    if !prune {
        return all.to_vec();
    }
    let here = from.manhattan(goal);
    all.into_iter()
        .filter(|d| d.apply(&from).manhattan(goal) < here)
        .take(3)
        .collect()
}

fn reconstruct(
    came_from: &HashMap<Cell, (Cell, Direction)>,
    start: Cell,
    goal: Cell,
    cost: usize,
) -> Path {
    let mut directions = Vec::with_capacity(cost);
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&(prev, dir)) => {
                directions.push(dir);
                current = prev;
            }
            None => break,
        }
    }
    directions.reverse();
    Path { directions, cost }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn cfg() -> PathfindingConfig {
        Config::default_hardcoded().pathfinding
    }

    #[test]
    fn test_open_board_path_is_manhattan() {
        let grid = OccupancyGrid::new(10);
        let start = Cell::new(1, 2);
        let goal = Cell::new(7, 6);
        let path = find_path(start, goal, &grid, &cfg()).expect("path should exist");
        assert_eq!(path.len(), 10);
        assert_eq!(path.cost, 10);
        assert_eq!(path.cells(start).last(), Some(&goal));
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = OccupancyGrid::new(5);
        let path = find_path(Cell::new(2, 2), Cell::new(2, 2), &grid, &cfg()).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn test_blocked_goal_has_no_path() {
        let grid = OccupancyGrid::from_cells(5, vec![Cell::new(3, 3)]);
        assert!(find_path(Cell::new(0, 0), Cell::new(3, 3), &grid, &cfg()).is_none());
    }

    #[test]
    fn test_routes_around_a_wall() {
        // Vertical wall at column 2 with a gap at row 4
        let wall: Vec<Cell> = (0..4).map(|r| Cell::new(r, 2)).collect();
        let grid = OccupancyGrid::from_cells(20, wall);
        let start = Cell::new(0, 0);
        let goal = Cell::new(0, 4);
        let path = find_path(start, goal, &grid, &cfg()).expect("gap should be found");
        assert_eq!(path.len(), 12);
        for cell in path.cells(start) {
            assert!(!grid.is_blocked(cell), "path crosses blocked cell {}", cell);
        }
    }

    #[test]
    fn test_sealed_goal_is_unreachable() {
        let seal = vec![Cell::new(0, 1), Cell::new(1, 0)];
        let grid = OccupancyGrid::from_cells(6, seal);
        assert!(find_path(Cell::new(4, 4), Cell::new(0, 0), &grid, &cfg()).is_none());
    }

    #[test]
    fn test_search_is_deterministic() {
        let grid = OccupancyGrid::from_cells(12, vec![Cell::new(5, 5), Cell::new(5, 6)]);
        let a = find_path(Cell::new(9, 1), Cell::new(2, 10), &grid, &cfg());
        let b = find_path(Cell::new(9, 1), Cell::new(2, 10), &grid, &cfg());
        assert_eq!(a, b);
    }
}

// Shadow snakes: column-translated copies of the player's body
//
// Mirrors never run step logic of their own. Both the step resolver and the
// decision engine go through `project` and `adjudicate`, so the AI predicts
// mirror deaths with exactly the rules the resolver applies.

use std::collections::HashSet;

use crate::grid;
use crate::types::{Cell, MirrorSide};

/// One shadow snake's current body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    body: Vec<Cell>,
    alive: bool,
}

impl Mirror {
    pub fn new(body: Vec<Cell>) -> Self {
        Mirror { body, alive: true }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Replaces the body, returning the previous one
    pub fn replace(&mut self, body: Vec<Cell>) -> Vec<Cell> {
        std::mem::replace(&mut self.body, body)
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Column offsets of the two mirrors relative to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowRule {
    pub left_offset: i32,
    pub right_offset: i32,
    pub board_size: i32,
}

impl ShadowRule {
    /// Mirrors at `-offset` and `+offset` columns
    pub fn symmetric(offset: i32, board_size: i32) -> Self {
        ShadowRule {
            left_offset: -offset.abs(),
            right_offset: offset.abs(),
            board_size,
        }
    }

    /// Both mirror bodies for the given player body
    pub fn project_both<I>(&self, player: I) -> (Vec<Cell>, Vec<Cell>)
    where
        I: IntoIterator<Item = Cell> + Clone,
    {
        (
            project(player.clone(), self.left_offset, self.board_size),
            project(player, self.right_offset, self.board_size),
        )
    }

    /// Which mirrors would die if the player's body became `player`
    pub fn casualties<I>(&self, player: I) -> Option<MirrorSide>
    where
        I: IntoIterator<Item = Cell> + Clone,
    {
        let player_cells: HashSet<Cell> = player.clone().into_iter().collect();
        let (left, right) = self.project_both(player);
        adjudicate(&player_cells, &left, &right, self.board_size)
    }
}

/// Translates a body by `offset` columns, clamping each cell to the board
pub fn project<I>(player: I, offset: i32, board_size: i32) -> Vec<Cell>
where
    I: IntoIterator<Item = Cell>,
{
    let max_col = (board_size - 1).max(0);
    player
        .into_iter()
        .map(|c| Cell::new(c.row, (c.col + offset).clamp(0, max_col)))
        .collect()
}

/// Decides which mirrors die for a freshly projected pair of bodies
///
/// A mirror dies when it leaves the board, overlaps itself, touches the
/// player, or touches the other mirror.
pub fn adjudicate(
    player: &HashSet<Cell>,
    left: &[Cell],
    right: &[Cell],
    board_size: i32,
) -> Option<MirrorSide> {
    let left_set: HashSet<Cell> = left.iter().copied().collect();
    let right_set: HashSet<Cell> = right.iter().copied().collect();

    let dies = |body: &[Cell], own: &HashSet<Cell>, other: &HashSet<Cell>| {
        body.iter().any(|&c| !grid::is_inside(board_size, c))
            || own.len() != body.len()
            || body.iter().any(|c| player.contains(c))
            || body.iter().any(|c| other.contains(c))
    };

    let left_dead = dies(left, &left_set, &right_set);
    let right_dead = dies(right, &right_set, &left_set);

    match (left_dead, right_dead) {
        (true, true) => Some(MirrorSide::Both),
        (true, false) => Some(MirrorSide::Left),
        (false, true) => Some(MirrorSide::Right),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(col: i32) -> Vec<Cell> {
        vec![Cell::new(5, col), Cell::new(6, col), Cell::new(7, col)]
    }

    #[test]
    fn test_projection_translates_columns() {
        let left = project(column(10), -5, 20);
        assert_eq!(left, column(5));
        let right = project(column(10), 5, 20);
        assert_eq!(right, column(15));
    }

    #[test]
    fn test_projection_clamps_to_board() {
        let left = project(column(2), -5, 20);
        assert_eq!(left, column(0));
    }

    #[test]
    fn test_centered_player_keeps_both_mirrors() {
        let rule = ShadowRule::symmetric(5, 20);
        assert_eq!(rule.casualties(column(10)), None);
    }

    #[test]
    fn test_clamped_horizontal_body_kills_mirror() {
        // A horizontal body near the left wall collapses onto column 0
        let body = vec![Cell::new(5, 2), Cell::new(5, 3), Cell::new(5, 4)];
        let rule = ShadowRule::symmetric(5, 20);
        assert_eq!(rule.casualties(body), Some(MirrorSide::Left));
    }

    #[test]
    fn test_mirror_touching_player_dies() {
        // Horizontal player spanning 6 columns overlaps its own mirrors
        let body: Vec<Cell> = (4..10).map(|c| Cell::new(3, c)).collect();
        let rule = ShadowRule::symmetric(5, 20);
        assert_eq!(rule.casualties(body), Some(MirrorSide::Both));
    }
}

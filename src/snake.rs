use std::collections::VecDeque;

use crate::grid::{Grid, Position};
use Direction::*;

/// Number of segments a bonus food adds behind the tail.
pub const BONUS_SEGMENTS: i32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Cell offset of one step; y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// Snake body, head first.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    pub fn new(origin: Position) -> Self {
        Snake { body: VecDeque::from(vec![origin]) }
    }

    /// Builds a snake from explicit segments, head first. Returns `None` for an empty body.
    pub fn from_segments<I: IntoIterator<Item = Position>>(segments: I) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() { None } else { Some(Snake { body }) }
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Where the head would go next. Not wrapped: leaving the grid is the caller's call.
    pub fn advance(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        self.head().offset(dx, dy)
    }

    pub fn grow(&mut self, new_head: Position) {
        self.body.push_front(new_head);
    }

    pub fn shrink_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }

    pub fn apply_penalty(&mut self) {
        let keep = (self.body.len() / 2).max(1);
        self.body.truncate(keep);
    }

    /// Appends the bonus segments behind the tail, stepping against `direction`.
    pub fn apply_bonus(&mut self, direction: Direction, grid: &Grid) {
        let tail = self.tail();
        let (dx, dy) = direction.delta();

        for i in 1..=BONUS_SEGMENTS {
            let segment = grid.wrap(tail.offset(-dx * i, -dy * i));
            self.body.push_back(segment);
        }
    }

    /// Cuts the body where the head bit into it. Returns true if anything was bitten off.
    pub fn self_collision_truncate(&mut self) -> bool {
        let head = self.head();

        match self.body.iter().skip(1).position(|&seg| seg == head) {
            Some(i) => {
                self.body.truncate(i + 1);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(points: &[(i32, i32)]) -> Snake {
        Snake::from_segments(points.iter().map(|&p| Position::from(p))).unwrap()
    }

    fn positions(snake: &Snake) -> Vec<(i32, i32)> {
        snake.body().iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn opposite_table() {
        assert_eq!(Up.opposite(), Down);
        assert_eq!(Left.opposite(), Right);
        assert!(Right.is_opposite(Left));
        assert!(!Right.is_opposite(Up));
        assert!(!Right.is_opposite(Right));
    }

    #[test]
    fn advance_does_not_wrap() {
        let s = snake(&[(0, 0)]);
        assert_eq!(s.advance(Left), Position::new(-1, 0));
        assert_eq!(s.advance(Up), Position::new(0, -1));
        assert_eq!(s.advance(Down), Position::new(0, 1));
    }

    #[test]
    fn shrink_keeps_last_segment() {
        let mut s = snake(&[(3, 3), (2, 3)]);
        s.shrink_tail();
        assert_eq!(positions(&s), vec![(3, 3)]);
        s.shrink_tail();
        assert_eq!(positions(&s), vec![(3, 3)]);
    }

    #[test]
    fn penalty_halves_with_floor_of_one() {
        let mut s = snake(&[(5, 1), (4, 1), (3, 1), (2, 1), (1, 1)]);
        s.apply_penalty();
        assert_eq!(positions(&s), vec![(5, 1), (4, 1)]);

        let mut single = snake(&[(0, 0)]);
        single.apply_penalty();
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn bonus_extends_behind_tail_and_wraps() {
        let grid = Grid::new(10, 10).unwrap();
        let mut s = snake(&[(3, 4), (2, 4)]);
        s.apply_bonus(Right, &grid);
        assert_eq!(
            positions(&s),
            vec![(3, 4), (2, 4), (1, 4), (0, 4), (9, 4), (8, 4), (7, 4)]
        );
        assert!(s.body().iter().all(|&p| grid.in_bounds(p)));
    }

    #[test]
    fn bite_cuts_at_collision_index() {
        // Head at (2,2) overlaps the segment at index 4.
        let mut s = snake(&[(2, 2), (2, 3), (3, 3), (3, 2), (2, 2), (1, 2), (0, 2)]);
        assert!(s.self_collision_truncate());
        assert_eq!(positions(&s), vec![(2, 2), (2, 3), (3, 3), (3, 2)]);
        assert!(!s.self_collision_truncate());
    }
}

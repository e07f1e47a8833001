use anyhow::{ensure, Result};

/// 400px at 20px per cell.
pub const DEFAULT_GRID_CELLS: i32 = 20;

/// A cell coordinate. Signed, so a head that stepped off the board can still be
/// represented and rejected by [`Grid::in_bounds`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// Board dimensions in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Default for Grid {
    fn default() -> Self {
        Grid { width: DEFAULT_GRID_CELLS, height: DEFAULT_GRID_CELLS }
    }
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        ensure!(width > 0 && height > 0, "grid must be at least 1x1 cells, got {}x{}", width, height);
        Ok(Grid { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert!(Grid::new(0, 10).is_err());
        assert!(Grid::new(10, -1).is_err());
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn bounds_are_half_open() {
        let grid = Grid::new(20, 10).unwrap();
        assert!(grid.in_bounds(Position::new(0, 0)));
        assert!(grid.in_bounds(Position::new(19, 9)));
        assert!(!grid.in_bounds(Position::new(20, 9)));
        assert!(!grid.in_bounds(Position::new(19, 10)));
        assert!(!grid.in_bounds(Position::new(-1, 0)));
        assert!(!grid.in_bounds(Position::new(0, -1)));
    }

    #[test]
    fn wrap_is_never_negative() {
        let grid = Grid::new(20, 10).unwrap();
        assert_eq!(grid.wrap(Position::new(-1, -1)), Position::new(19, 9));
        assert_eq!(grid.wrap(Position::new(-21, 23)), Position::new(19, 3));
        assert_eq!(grid.wrap(Position::new(20, 10)), Position::new(0, 0));
        assert_eq!(grid.wrap(Position::new(7, 3)), Position::new(7, 3));
    }
}

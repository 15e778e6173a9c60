use crate::config::GameConfig;

/// Cell coordinate on the board. `row` grows downwards, `col` grows to the right.
///
/// Both components are always within `[0, BOARD_SIZE)`; the only ways to
/// build a position check that.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// Returns the position if both coordinates are on the board.
    pub const fn try_new(row: usize, col: usize) -> Option<Self> {
        if row < GameConfig::BOARD_SIZE && col < GameConfig::BOARD_SIZE {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// Builds an in-bounds position.
    ///
    /// # Panics
    ///
    /// Panics if either coordinate is outside the board. Use
    /// [`Position::try_new`] for untrusted input.
    pub const fn new(row: usize, col: usize) -> Self {
        match Self::try_new(row, col) {
            Some(position) => position,
            None => panic!("position out of bounds"),
        }
    }

    pub const fn row(self) -> usize {
        self.row as usize
    }

    pub const fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major iteration over every cell of the board.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..GameConfig::BOARD_SIZE)
            .flat_map(|row| (0..GameConfig::BOARD_SIZE).map(move |col| Self::new(row, col)))
    }

    /// Orthogonal neighbours (no diagonals) that lie on the board.
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        let (row, col) = (self.row(), self.col());
        [
            row.checked_sub(1).map(|r| (r, col)),
            Some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            Some((row, col + 1)),
        ]
        .into_iter()
        .flatten()
        .filter_map(|(r, c)| Self::try_new(r, c))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_bounds_coordinates() {
        assert!(Position::try_new(3, 3).is_some());
        assert!(Position::try_new(4, 0).is_none());
        assert!(Position::try_new(0, 4).is_none());
    }

    #[test]
    fn corner_has_two_neighbors() {
        let neighbors: Vec<_> = Position::ORIGIN.neighbors().collect();
        assert_eq!(neighbors, vec![Position::new(1, 0), Position::new(0, 1)]);
    }

    #[test]
    fn inner_cell_has_four_neighbors() {
        assert_eq!(Position::new(1, 2).neighbors().count(), 4);
    }

    #[test]
    fn all_covers_every_cell_once() {
        let cells: Vec<_> = Position::all().collect();
        assert_eq!(cells.len(), GameConfig::CELL_COUNT);
        assert_eq!(cells.first(), Some(&Position::ORIGIN));
        assert_eq!(cells.last(), Some(&Position::new(3, 3)));
    }
}

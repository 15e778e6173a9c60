use crate::action::TileAction;
use crate::config::GameConfig;

use super::{Position, Tile, TileError};

const N: usize = GameConfig::BOARD_SIZE;

/// Square grid of optional tiles, indexed `[row][col]`.
///
/// Holds values only. Presentation layers keep their own coordinate → view
/// mapping and never store handles here, so a board is freely copyable and
/// doubles as its own history snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Board {
    cells: [[Option<Tile>; N]; N],
}

impl Board {
    /// A board with no tiles.
    pub const fn empty() -> Self {
        Self {
            cells: [[None; N]; N],
        }
    }

    /// Builds a board from raw numbers where `0` marks an empty cell.
    pub fn from_values(values: [[u32; N]; N]) -> Result<Self, TileError> {
        let mut board = Self::empty();
        for position in Position::all() {
            let value = values[position.row()][position.col()];
            if value != 0 {
                board.set(position, Some(Tile::new(value)?));
            }
        }
        Ok(board)
    }

    /// Inverse of [`Board::from_values`].
    pub fn to_values(&self) -> [[u32; N]; N] {
        self.cells
            .map(|row| row.map(|cell| cell.map_or(0, Tile::value)))
    }

    pub fn get(&self, position: Position) -> Option<Tile> {
        self.cells[position.row()][position.col()]
    }

    pub fn set(&mut self, position: Position, tile: Option<Tile>) {
        self.cells[position.row()][position.col()] = tile;
    }

    /// Removes and returns the tile at `position`.
    pub fn take(&mut self, position: Position) -> Option<Tile> {
        self.cells[position.row()][position.col()].take()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.get(position).is_some()
    }

    /// All unoccupied positions in row-major order.
    pub fn empty_cells(&self) -> Vec<Position> {
        Position::all().filter(|&p| !self.is_occupied(p)).collect()
    }

    /// Occupied positions with their tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        Position::all().filter_map(|p| self.get(p).map(|tile| (p, tile)))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.occupied_count() == GameConfig::CELL_COUNT
    }

    /// Game-over predicate: every cell holds a tile and no two orthogonally
    /// adjacent tiles can merge.
    ///
    /// Only meaningful on a settled board (after merges and the spawn).
    pub fn is_terminal(&self) -> bool {
        self.is_full()
            && !self.tiles().any(|(position, tile)| {
                position
                    .neighbors()
                    .any(|next| self.get(next).is_some_and(|other| tile.can_merge_with(other)))
            })
    }

    /// Value-only copy used for history.
    pub fn snapshot(&self) -> Self {
        *self
    }

    /// Highest tile level on the board, `0` for an empty board.
    pub fn max_level(&self) -> u32 {
        self.tiles().map(|(_, tile)| tile.level()).max().unwrap_or(0)
    }

    /// Sum of every tile value.
    pub fn total_value(&self) -> u64 {
        self.tiles().map(|(_, tile)| u64::from(tile.value())).sum()
    }

    /// Replays resolver actions onto this board.
    ///
    /// Sources are vacated before any destination is written: within one line
    /// a sliding tile may land on a cell that a merge is about to vacate.
    pub fn apply_actions(&mut self, actions: &[TileAction]) {
        for action in actions {
            for source in action.sources() {
                let vacated = self.take(source);
                debug_assert!(vacated.is_some(), "action source {source} was empty");
            }
        }
        for action in actions {
            self.set(action.destination(), Some(action.tile()));
        }
    }
}

impl From<[[Option<Tile>; N]; N]> for Board {
    fn from(cells: [[Option<Tile>; N]; N]) -> Self {
        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(values: [[u32; N]; N]) -> Board {
        Board::from_values(values).unwrap()
    }

    #[test]
    fn empty_cells_lists_unoccupied_positions() {
        let board = board([[2, 0, 0, 0], [0, 4, 0, 0], [0, 0, 0, 0], [0, 0, 0, 8]]);
        let empty = board.empty_cells();
        assert_eq!(empty.len(), 13);
        assert!(!empty.contains(&Position::new(0, 0)));
        assert!(!empty.contains(&Position::new(1, 1)));
        assert!(!empty.contains(&Position::new(3, 3)));
    }

    #[test]
    fn non_full_board_is_never_terminal() {
        let board = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(!board.is_terminal());
    }

    #[test]
    fn checkerboard_is_terminal() {
        let board = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(board.is_terminal());
    }

    #[test]
    fn one_horizontal_pair_keeps_board_alive() {
        let board = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 8, 8]]);
        assert!(!board.is_terminal());
    }

    #[test]
    fn one_vertical_pair_keeps_board_alive() {
        let alive = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 16], [4, 2, 4, 16]]);
        assert!(!alive.is_terminal());

        let dead = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 16], [4, 2, 4, 32]]);
        assert!(dead.is_terminal());
    }

    #[test]
    fn diagonal_equality_does_not_count() {
        let board = board([[2, 4, 8, 16], [4, 2, 16, 8], [8, 16, 2, 4], [16, 8, 4, 2]]);
        assert!(board.is_terminal());
    }

    #[test]
    fn adjacent_max_tiles_do_not_keep_board_alive() {
        let max = Tile::MAX.value();
        let board = board([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, max, max]]);
        assert!(board.is_terminal());
    }

    #[test]
    fn values_round_trip() {
        let values = [[2, 0, 0, 4], [0, 8, 0, 0], [0, 0, 16, 0], [2048, 0, 0, 2]];
        assert_eq!(board(values).to_values(), values);
    }

    #[test]
    fn from_values_rejects_invalid_tiles() {
        let result = Board::from_values([[3, 0, 0, 0], [0; N], [0; N], [0; N]]);
        assert_eq!(result, Err(TileError::NotPowerOfTwo(3)));

        let result = Board::from_values([[1 << 31, 0, 0, 0], [0; N], [0; N], [0; N]]);
        assert_eq!(result, Err(TileError::TooLarge(1 << 31)));
    }

    #[test]
    fn snapshot_is_independent_copy() {
        let mut original = board([[2, 0, 0, 0], [0; N], [0; N], [0; N]]);
        let snapshot = original.snapshot();
        original.set(Position::ORIGIN, None);
        assert_eq!(snapshot.get(Position::ORIGIN), Some(Tile::TWO));
    }

    #[test]
    fn max_level_and_total_value() {
        let board = board([[2, 0, 0, 0], [0, 32, 0, 0], [0; N], [0, 0, 0, 4]]);
        assert_eq!(board.max_level(), 5);
        assert_eq!(board.total_value(), 38);
        assert_eq!(Board::empty().max_level(), 0);
    }
}

use crate::config::GameConfig;
use crate::state::Position;

const N: usize = GameConfig::BOARD_SIZE;

/// Direction every tile on the board slides towards.
///
/// Parses case-insensitively from `"up"`, `"down"`, `"left"` and `"right"`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Left/right moves walk rows; up/down moves walk columns.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Right and down travel towards the high end of their axis, so their
    /// lines are read back to front.
    pub const fn is_reverse(self) -> bool {
        matches!(self, Direction::Right | Direction::Down)
    }

    /// The cells of line `index` (a row for horizontal moves, a column for
    /// vertical ones), ordered from the wall tiles travel towards inward.
    ///
    /// Slot `i` of the result is where the `i`-th packed tile lands, which is
    /// board offset `i` or `N - 1 - i` depending on [`Direction::is_reverse`].
    pub fn line(self, index: usize) -> [Position; N] {
        core::array::from_fn(|slot| {
            let offset = if self.is_reverse() { N - 1 - slot } else { slot };
            if self.is_horizontal() {
                Position::new(index, offset)
            } else {
                Position::new(offset, index)
            }
        })
    }

    /// Every line of the board for this direction.
    pub fn lines(self) -> impl Iterator<Item = [Position; N]> {
        (0..N).map(move |index| self.line(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("LEFT".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("up".parse::<Direction>(), Ok(Direction::Up));
        assert!("diagonal".parse::<Direction>().is_err());
        assert_eq!(Direction::Down.to_string(), "down");
    }

    #[test]
    fn left_lines_run_along_rows_from_column_zero() {
        let line = Direction::Left.line(2);
        assert_eq!(line[0], Position::new(2, 0));
        assert_eq!(line[3], Position::new(2, 3));
    }

    #[test]
    fn right_lines_start_at_the_right_wall() {
        let line = Direction::Right.line(1);
        assert_eq!(line[0], Position::new(1, 3));
        assert_eq!(line[3], Position::new(1, 0));
    }

    #[test]
    fn vertical_lines_run_along_columns() {
        let up = Direction::Up.line(3);
        assert_eq!(up[0], Position::new(0, 3));
        let down = Direction::Down.line(3);
        assert_eq!(down[0], Position::new(3, 3));
        assert_eq!(down[3], Position::new(0, 3));
    }

    #[test]
    fn lines_cover_the_board_exactly_once() {
        for direction in Direction::ALL {
            let mut cells: Vec<_> = direction.lines().flatten().collect();
            cells.sort();
            let all: Vec<_> = Position::all().collect();
            assert_eq!(cells, all, "{direction}");
        }
    }
}

//! Parsing of typed player commands.

use std::str::FromStr;

use game_core::{Direction, Position};
use thiserror::Error;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Move(Direction),
    Undo,
    Destroy(Position),
    Swap(Position, Position),
    /// Pretend an ad finished playing.
    WatchAd,
    Restart,
    Pause,
    Resume,
    Save,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty input")]
    Empty,

    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),

    #[error("`{command}` needs {expected} coordinates")]
    MissingCoordinates {
        command: &'static str,
        expected: usize,
    },

    #[error("`{0}` is not a cell on the board")]
    BadCoordinate(String),
}

impl FromStr for PlayerCommand {
    type Err = ParseCommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut words = input.split_whitespace();
        let Some(head) = words.next() else {
            return Err(ParseCommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match head.to_ascii_lowercase().as_str() {
            "w" | "k" => Self::Move(Direction::Up),
            "s" | "j" => Self::Move(Direction::Down),
            "a" | "h" => Self::Move(Direction::Left),
            "d" | "l" => Self::Move(Direction::Right),
            "u" | "undo" => Self::Undo,
            "x" | "destroy" => {
                let [position] = positions::<1>("destroy", &args)?;
                Self::Destroy(position)
            }
            "swap" => {
                let [first, second] = positions::<2>("swap", &args)?;
                Self::Swap(first, second)
            }
            "ad" => Self::WatchAd,
            "restart" | "new" => Self::Restart,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "save" => Self::Save,
            "?" | "help" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => other
                .parse::<Direction>()
                .map(Self::Move)
                .map_err(|_| ParseCommandError::Unknown(head.to_string()))?,
        };
        Ok(command)
    }
}

/// Reads `N` `row col` pairs.
fn positions<const N: usize>(
    command: &'static str,
    args: &[&str],
) -> Result<[Position; N], ParseCommandError> {
    if args.len() != N * 2 {
        return Err(ParseCommandError::MissingCoordinates {
            command,
            expected: N * 2,
        });
    }

    let mut parsed = [Position::ORIGIN; N];
    for (slot, pair) in parsed.iter_mut().zip(args.chunks(2)) {
        let coordinate = |raw: &str| {
            raw.parse::<usize>()
                .map_err(|_| ParseCommandError::BadCoordinate(raw.to_string()))
        };
        let (row, col) = (coordinate(pair[0])?, coordinate(pair[1])?);
        *slot = Position::try_new(row, col)
            .ok_or_else(|| ParseCommandError::BadCoordinate(format!("{row} {col}")))?;
    }
    Ok(parsed)
}

pub const HELP: &str = "\
moves:    w/a/s/d, h/j/k/l or up/down/left/right
specials: undo | destroy <row> <col> | swap <row> <col> <row> <col>
other:    ad | restart | pause | resume | save | help | quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_in_every_spelling() {
        assert_eq!("a".parse::<PlayerCommand>(), Ok(PlayerCommand::Move(Direction::Left)));
        assert_eq!("K".parse::<PlayerCommand>(), Ok(PlayerCommand::Move(Direction::Up)));
        assert_eq!("Down".parse::<PlayerCommand>(), Ok(PlayerCommand::Move(Direction::Down)));
        assert_eq!(" right ".parse::<PlayerCommand>(), Ok(PlayerCommand::Move(Direction::Right)));
    }

    #[test]
    fn parses_special_actions() {
        assert_eq!(
            "destroy 1 2".parse::<PlayerCommand>(),
            Ok(PlayerCommand::Destroy(Position::new(1, 2)))
        );
        assert_eq!(
            "swap 0 0 3 3".parse::<PlayerCommand>(),
            Ok(PlayerCommand::Swap(Position::new(0, 0), Position::new(3, 3)))
        );
        assert_eq!("u".parse::<PlayerCommand>(), Ok(PlayerCommand::Undo));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<PlayerCommand>(), Err(ParseCommandError::Empty));
        assert!(matches!(
            "jump".parse::<PlayerCommand>(),
            Err(ParseCommandError::Unknown(_))
        ));
        assert_eq!(
            "swap 0 0".parse::<PlayerCommand>(),
            Err(ParseCommandError::MissingCoordinates {
                command: "swap",
                expected: 4
            })
        );
        assert!(matches!(
            "destroy 4 0".parse::<PlayerCommand>(),
            Err(ParseCommandError::BadCoordinate(_))
        ));
        assert!(matches!(
            "destroy a b".parse::<PlayerCommand>(),
            Err(ParseCommandError::BadCoordinate(_))
        ));
    }
}

//! Plain-text rendering of boards, tile actions and runtime events.

use std::fmt::Write;

use game_core::{Board, GameConfig, Position, SpecialKind, TileAction};
use runtime::{BoardEvent, EconomyEvent, Event, PersistenceEvent, SessionView};

const CELL_WIDTH: usize = 6;

/// Draws the board with row and column indices.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    out.push_str("   ");
    for col in 0..GameConfig::BOARD_SIZE {
        let _ = write!(out, "{col:>CELL_WIDTH$}");
    }
    out.push('\n');

    for row in 0..GameConfig::BOARD_SIZE {
        let _ = write!(out, "{row:>3}");
        for col in 0..GameConfig::BOARD_SIZE {
            match board.get(Position::new(row, col)) {
                Some(tile) => {
                    let _ = write!(out, "{:>CELL_WIDTH$}", tile.value());
                }
                None => {
                    let _ = write!(out, "{:>CELL_WIDTH$}", ".");
                }
            }
        }
        out.push('\n');
    }
    out
}

pub fn render_action(action: &TileAction) -> String {
    match action {
        TileAction::Slide { from, to, tile } => format!("slide {tile} {from} -> {to}"),
        TileAction::Merge {
            first,
            second,
            to,
            tile,
        } => format!("merge {first} + {second} -> {to} = {tile}"),
    }
}

pub fn render_status(view: &SessionView) -> String {
    let mut status = format!(
        "score {}  best {}  coins {}  undo steps {}",
        view.score, view.best_score, view.currency, view.history_len
    );
    if view.paused {
        status.push_str("  [paused]");
    }
    if view.is_game_over() {
        status.push_str("  [game over]");
    }
    status
}

/// Text for an event, or `None` for events the terminal does not show.
pub fn render_event(event: &Event) -> Option<String> {
    match event {
        Event::Board(BoardEvent::GameStarted { board, .. }) => {
            Some(format!("new game\n{}", render_board(board)))
        }
        Event::Board(BoardEvent::MoveResolved { outcome }) => Some(
            outcome
                .actions
                .iter()
                .map(render_action)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        Event::Board(BoardEvent::MoveSettled { report }) => {
            let mut out = render_board(&report.board);
            if let Some(spawn) = report.spawn {
                let _ = write!(out, "spawned {} at {}", spawn.tile, spawn.position);
            }
            Some(out)
        }
        Event::Board(BoardEvent::SpecialApplied { report }) => {
            let label = match report.kind {
                SpecialKind::Undo => "undo".to_string(),
                SpecialKind::Destroy { position, tile } => {
                    format!("destroyed {tile} at {position}")
                }
                SpecialKind::Swap { first, second } => format!("swapped {first} and {second}"),
            };
            Some(format!(
                "{label} (-{} coins)\n{}",
                report.charged,
                render_board(&report.board)
            ))
        }
        Event::Board(BoardEvent::GameOver { score, best_score }) => Some(format!(
            "game over: score {score}, best {best_score}. undo, destroy or restart"
        )),
        Event::Economy(EconomyEvent::LevelUp { level }) => {
            Some(format!("level up! reached {}", 1u64 << level))
        }
        Event::Economy(EconomyEvent::NewBestScore { best_score }) => {
            Some(format!("new best score {best_score}"))
        }
        Event::Economy(EconomyEvent::RewardGranted { amount, currency }) => {
            Some(format!("+{amount} coins ({currency} total)"))
        }
        Event::Economy(EconomyEvent::InsufficientFunds {
            required,
            available,
        }) => Some(format!("not enough coins: need {required}, have {available}")),
        Event::Persistence(PersistenceEvent::SaveFailed { error }) => {
            Some(format!("save failed: {error}"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Direction, resolve};

    #[test]
    fn board_shows_values_and_gaps() {
        let board = Board::from_values([[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 1024, 0], [0, 0, 0, 4]])
            .unwrap();
        let text = render_board(&board);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "  0     2     .     .     .");
        assert!(lines[3].contains("1024"));
        assert!(lines[4].ends_with("4"));
    }

    #[test]
    fn actions_read_in_travel_order() {
        let board = Board::from_values([[2, 2, 0, 4], [0; 4], [0; 4], [0; 4]]).unwrap();
        let outcome = resolve(&board, Direction::Left);
        let lines: Vec<_> = outcome.actions.iter().map(render_action).collect();

        assert_eq!(
            lines,
            vec!["slide 4 (0, 3) -> (0, 1)", "merge (0, 0) + (0, 1) -> (0, 0) = 4"]
        );
    }
}

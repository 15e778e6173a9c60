//! Slide-and-merge resolution for a single move.
//!
//! [`resolve`] is pure: it reads a board, never writes it, and returns the
//! full description of the move. Lines never interact, so each one is
//! compacted on its own.

use arrayvec::ArrayVec;

use crate::action::{Direction, TileAction};
use crate::config::GameConfig;
use crate::state::{Board, Position, Tile};

const N: usize = GameConfig::BOARD_SIZE;

/// Everything a move does, computed without touching the input board.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    pub direction: Direction,
    /// Per line: relocations first, then merges, each in travel order.
    pub actions: Vec<TileAction>,
    /// Board after sliding and merging, before any spawn.
    pub board: Board,
    /// True iff at least one action was emitted.
    pub moved: bool,
    /// Sum of merged tile values.
    pub score_delta: u64,
    /// Currency earned from merges, see [`merge_reward`].
    pub reward: u64,
    /// Number of merge actions.
    pub merges: usize,
}

impl MoveOutcome {
    /// Tiles created by merges, in action order.
    pub fn merged_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.actions
            .iter()
            .filter(|action| action.is_merge())
            .map(TileAction::tile)
    }
}

/// Currency earned for a merge producing a tile of `level`.
///
/// `level / 4` rounded half up, taken from the merged (post-doubling) tile:
/// a 4 (level 2) earns 1, a 64 (level 6) earns 2, a 2048 (level 11) earns 3.
pub const fn merge_reward(level: u32) -> u64 {
    ((level + 2) / 4) as u64
}

/// Slides every tile on `board` towards `direction`.
///
/// Within a line, tiles are taken in travel order (nearest the wall first).
/// A tile merges with the next occupied tile when their values match; both
/// are consumed and neither can merge again this move, so three equal tiles
/// collapse to two, not one. Tiles at [`Tile::MAX_LEVEL`] only slide.
pub fn resolve(board: &Board, direction: Direction) -> MoveOutcome {
    let mut outcome = MoveOutcome {
        direction,
        actions: Vec::new(),
        board: Board::empty(),
        moved: false,
        score_delta: 0,
        reward: 0,
        merges: 0,
    };

    for line in direction.lines() {
        resolve_line(board, &line, &mut outcome);
    }

    outcome.moved = !outcome.actions.is_empty();
    outcome
}

fn resolve_line(board: &Board, line: &[Position; N], outcome: &mut MoveOutcome) {
    let occupied: ArrayVec<(Position, Tile), N> = line
        .iter()
        .filter_map(|&position| board.get(position).map(|tile| (position, tile)))
        .collect();

    let mut slides = ArrayVec::<TileAction, N>::new();
    let mut merges = ArrayVec::<TileAction, N>::new();
    let mut index = 0;
    let mut slot = 0;

    // Every step consumes at least one tile and exactly one slot.
    while let Some(&(from, tile)) = occupied.get(index) {
        let to = line[slot];
        slot += 1;

        let partner = occupied
            .get(index + 1)
            .filter(|&&(_, next)| next == tile)
            .and_then(|&(second, _)| tile.merged().map(|merged| (second, merged)));

        match partner {
            Some((second, merged)) => {
                merges.push(TileAction::Merge {
                    first: from,
                    second,
                    to,
                    tile: merged,
                });
                outcome.board.set(to, Some(merged));
                outcome.score_delta += u64::from(merged.value());
                outcome.reward += merge_reward(merged.level());
                outcome.merges += 1;
                index += 2;
            }
            None => {
                if from != to {
                    slides.push(TileAction::Slide { from, to, tile });
                }
                outcome.board.set(to, Some(tile));
                index += 1;
            }
        }
    }

    outcome.actions.extend(slides);
    outcome.actions.extend(merges);
}

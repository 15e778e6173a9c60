use crate::config::GameConfig;
use crate::env::rng::{RngOracle, compute_seed, context};
use crate::state::{Board, Position, Tile};

/// A tile placed on the board after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spawn {
    pub position: Position,
    pub tile: Tile,
}

/// Picks a uniformly random empty cell and a value (2 with
/// `config.spawn_two_percent` odds, otherwise 4).
///
/// Returns `None` on a full board. Does not mutate `board`.
pub fn spawn_tile<R>(
    board: &Board,
    rng: &R,
    config: &GameConfig,
    game_seed: u64,
    nonce: u64,
) -> Option<Spawn>
where
    R: RngOracle + ?Sized,
{
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let cell_seed = compute_seed(game_seed, nonce, context::SPAWN_CELL);
    let position = empty[rng.index(cell_seed, empty.len())];

    let value_seed = compute_seed(game_seed, nonce, context::SPAWN_VALUE);
    let tile = if rng.roll_d100(value_seed) <= config.spawn_two_percent {
        Tile::TWO
    } else {
        Tile::FOUR
    };

    Some(Spawn { position, tile })
}

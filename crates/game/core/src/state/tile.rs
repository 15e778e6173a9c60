use crate::error::{ErrorSeverity, GameError};

/// Rejections raised when constructing a tile from an arbitrary number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileError {
    #[error("tile value {0} is below the minimum of 2")]
    TooSmall(u32),

    #[error("tile value {0} is not a power of two")]
    NotPowerOfTwo(u32),

    #[error("tile value {0} is above the maximum of {max}", max = Tile::MAX.value)]
    TooLarge(u32),
}

impl GameError for TileError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooSmall(_) => "TILE_TOO_SMALL",
            Self::NotPowerOfTwo(_) => "TILE_NOT_POWER_OF_TWO",
            Self::TooLarge(_) => "TILE_TOO_LARGE",
        }
    }
}

/// A numbered tile. The value is always a power of two between 2 and
/// [`Tile::MAX`].
///
/// Serialized as `{"value": n}` so a board cell reads `null | {"value": n}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TileRepr", into = "TileRepr")
)]
pub struct Tile {
    value: u32,
}

impl Tile {
    pub const TWO: Self = Self { value: 2 };
    pub const FOUR: Self = Self { value: 4 };

    /// Highest level a tile can reach. Tiles at this level no longer merge.
    pub const MAX_LEVEL: u32 = 30;
    pub const MAX: Self = Self {
        value: 1 << Self::MAX_LEVEL,
    };

    /// Validates `value` and wraps it in a tile.
    pub const fn new(value: u32) -> Result<Self, TileError> {
        if value < 2 {
            return Err(TileError::TooSmall(value));
        }
        if !value.is_power_of_two() {
            return Err(TileError::NotPowerOfTwo(value));
        }
        if value > Self::MAX.value {
            return Err(TileError::TooLarge(value));
        }
        Ok(Self { value })
    }

    /// Builds the tile sitting at `level` (1 => 2, 2 => 4, ...).
    ///
    /// Returns `None` for level 0 or levels above [`Tile::MAX_LEVEL`].
    pub const fn from_level(level: u32) -> Option<Self> {
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        Some(Self { value: 1 << level })
    }

    pub const fn value(self) -> u32 {
        self.value
    }

    /// log2 of the value. Exact because the value is a power of two.
    pub const fn level(self) -> u32 {
        self.value.trailing_zeros()
    }

    /// The tile produced by merging two copies of `self`, or `None` at
    /// [`Tile::MAX_LEVEL`].
    pub const fn merged(self) -> Option<Self> {
        Self::from_level(self.level() + 1)
    }

    /// True when `self` and `other` would combine on contact.
    pub const fn can_merge_with(self, other: Self) -> bool {
        self.value == other.value && self.merged().is_some()
    }
}

impl core::fmt::Display for Tile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl TryFrom<u32> for Tile {
    type Error = TileError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct TileRepr {
    value: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<TileRepr> for Tile {
    type Error = TileError;

    fn try_from(repr: TileRepr) -> Result<Self, Self::Error> {
        Self::new(repr.value)
    }
}

#[cfg(feature = "serde")]
impl From<Tile> for TileRepr {
    fn from(tile: Tile) -> Self {
        Self { value: tile.value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_powers_of_two_from_two() {
        for level in 1..20 {
            let tile = Tile::new(1 << level).unwrap();
            assert_eq!(tile.level(), level);
        }
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(Tile::new(0), Err(TileError::TooSmall(0)));
        assert_eq!(Tile::new(1), Err(TileError::TooSmall(1)));
        assert_eq!(Tile::new(6), Err(TileError::NotPowerOfTwo(6)));
        assert_eq!(Tile::new(2047), Err(TileError::NotPowerOfTwo(2047)));
    }

    #[test]
    fn merging_doubles_value_and_bumps_level() {
        let tile = Tile::new(64).unwrap();
        let merged = tile.merged().unwrap();
        assert_eq!(merged.value(), 128);
        assert_eq!(merged.level(), tile.level() + 1);
    }

    #[test]
    fn from_level_round_trips_level() {
        assert_eq!(Tile::from_level(0), None);
        assert_eq!(Tile::from_level(1), Some(Tile::TWO));
        assert_eq!(Tile::from_level(11).map(Tile::value), Some(2048));
        assert_eq!(Tile::from_level(30), Some(Tile::MAX));
        assert_eq!(Tile::from_level(31), None);
    }

    #[test]
    fn values_above_the_cap_are_rejected() {
        assert_eq!(Tile::new(1 << 30), Ok(Tile::MAX));
        assert_eq!(Tile::new(1 << 31), Err(TileError::TooLarge(1 << 31)));
    }

    #[test]
    fn max_tile_never_merges() {
        assert_eq!(Tile::MAX.merged(), None);
        assert!(!Tile::MAX.can_merge_with(Tile::MAX));
        assert!(Tile::TWO.can_merge_with(Tile::TWO));
        assert!(!Tile::TWO.can_merge_with(Tile::FOUR));
    }
}

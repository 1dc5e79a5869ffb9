use crate::Tile;
use std::collections::BTreeSet;

/// Yellow-strip indices: symmetric serpentine pairs including both endpoints.
#[rustfmt::skip]
pub const YELLOW_STRIPS: [Tile; 26] = [
     1, 80,  5, 76, 11, 70, 19, 62, 25, 56, 32, 49, 38,
    43, 48, 33, 54, 27, 59, 22, 66, 15, 71, 10, 77,  4,
];

/// The set of special tiles on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    special: BTreeSet<Tile>,
}

impl Board {
    pub fn new<I>(special: I) -> Self
    where
        I: IntoIterator<Item = Tile>,
    {
        Self {
            special: special.into_iter().collect(),
        }
    }
    /// Whether landing on this tile triggers yellow-strip logic.
    pub fn is_special(&self, tile: Tile) -> bool {
        self.special.contains(&tile)
    }
    /// Whether any of the given tiles is special.
    pub fn any_special<I>(&self, tiles: I) -> bool
    where
        I: IntoIterator<Item = Tile>,
    {
        tiles.into_iter().any(|t| self.is_special(t))
    }
    pub fn special(&self) -> impl Iterator<Item = Tile> + '_ {
        self.special.iter().copied()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(YELLOW_STRIPS)
    }
}

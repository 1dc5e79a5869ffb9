use crate::PHASE_LENGTH;
use crate::TOKENS;
use crate::Tile;
use std::collections::BTreeSet;

/// Phase (1-based decade) containing a tile.
/// Tiles 1..=10 are phase 1, 11..=20 phase 2, and so on. The start tile
/// counts as phase 1.
pub fn phase_of(tile: Tile) -> Tile {
    (tile.max(1) - 1) / PHASE_LENGTH + 1
}

/// Odd tiles of the phase immediately after the one an asset was bought in.
/// An asset only pays out while its owner lands inside this window.
pub fn return_window(purchase: Tile) -> BTreeSet<Tile> {
    let start = phase_of(purchase)
        .saturating_mul(PHASE_LENGTH)
        .saturating_add(1);
    (start..start.saturating_add(PHASE_LENGTH))
        .filter(|t| t % 2 == 1)
        .collect()
}

/// Position of the most advanced token.
pub fn furthest_token(tokens: &[Tile; TOKENS]) -> Tile {
    tokens.iter().copied().max().unwrap_or_default()
}

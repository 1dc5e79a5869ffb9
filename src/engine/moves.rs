use crate::DREAM_MIN_ASSETS;
use crate::DREAM_MIN_SAVINGS;
use crate::Error;
use crate::Invalid;
use crate::Points;
use crate::SKIPPED_YELLOW_PENALTY;
use crate::TOKENS;
use crate::Tile;
use crate::board::Board;
use crate::board::return_window;
use crate::catalog::Dream;
use crate::store::Player;
use serde::Serialize;
use std::collections::HashMap;

/// Where a moved token ended up and whether the move was penalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub position: Tile,
    pub penalized: bool,
}

/// One asset paying out on a landing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub asset_id: String,
    pub amount: Points,
    pub returns_collected: u8,
}

/// Whether moving any token by `steps` would land it on a special tile.
/// Moves that would leave the index range reach nothing.
pub fn can_land_special(board: &Board, tokens: &[Tile; TOKENS], steps: Tile) -> bool {
    board.any_special(
        tokens
            .iter()
            .filter_map(|t| t.checked_add(steps))
            .map(|t| t.max(0)),
    )
}

/// Moves one token, charging the skipped-yellow penalty when another move
/// could have reached a special tile but this one does not.
pub fn step(board: &Board, player: &mut Player, token: usize, steps: Tile) -> Result<Step, Error> {
    let from = *player.tokens().get(token).ok_or(Invalid::TokenIndex)?;
    let position = from.checked_add(steps).ok_or(Invalid::Steps)?.max(0);
    let reachable = can_land_special(board, player.tokens(), steps);
    let penalized = reachable && !board.is_special(position);
    player.place(token, position);
    if penalized {
        player.owe(SKIPPED_YELLOW_PENALTY);
    }
    Ok(Step {
        position,
        penalized,
    })
}

/// Pays every owned asset whose return window holds the landing tile.
/// Several assets may pay on the same landing; exhausted ones never do.
pub fn collect(player: &mut Player, position: Tile, profits: &HashMap<String, Points>) -> Vec<Payout> {
    if position % 2 == 0 {
        return Vec::new();
    }
    let mut payouts = Vec::new();
    for holding in player.assets_mut() {
        if holding.exhausted() || !return_window(holding.purchase()).contains(&position) {
            continue;
        }
        if let Some(returns) = holding.collect() {
            payouts.push(Payout {
                asset_id: holding.asset().to_string(),
                amount: profits.get(holding.asset()).copied().unwrap_or_default(),
                returns_collected: returns,
            });
        }
    }
    player.credit(payouts.iter().map(|p| p.amount).sum());
    payouts
}

/// Win-condition gate. Checks run in a fixed order and the first unmet
/// condition is reported.
pub fn affords(player: &Player, dream: &Dream) -> Result<(), Error> {
    if player.assets().len() < DREAM_MIN_ASSETS {
        return Err(Invalid::AssetCount.into());
    }
    if player.liabilities() != 0 {
        return Err(Invalid::Liabilities.into());
    }
    if player.savings() < DREAM_MIN_SAVINGS {
        return Err(Invalid::Savings.into());
    }
    if player.points() < dream.cost() {
        return Err(Invalid::DreamCost.into());
    }
    Ok(())
}

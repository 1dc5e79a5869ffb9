use crate::MAX_RETURNS;
use crate::Tile;
use serde::Deserialize;
use serde::Serialize;

/// An owned asset: where it was bought and how many returns it has paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    asset_id: String,
    purchase_spot: Tile,
    returns_collected: u8,
}

impl Holding {
    pub fn new(asset: &str, purchase: Tile) -> Self {
        Self {
            asset_id: asset.to_string(),
            purchase_spot: purchase,
            returns_collected: 0,
        }
    }
    pub fn asset(&self) -> &str {
        &self.asset_id
    }
    pub fn purchase(&self) -> Tile {
        self.purchase_spot
    }
    pub fn returns(&self) -> u8 {
        self.returns_collected
    }
    /// No further profit once every return has been paid.
    pub fn exhausted(&self) -> bool {
        self.returns_collected >= MAX_RETURNS
    }
    /// Records one payout. Returns the new count, or None if exhausted.
    pub fn collect(&mut self) -> Option<u8> {
        if self.exhausted() {
            None
        } else {
            self.returns_collected += 1;
            Some(self.returns_collected)
        }
    }
    /// Clamps stored values back into their valid ranges.
    pub fn normalize(&mut self) {
        self.returns_collected = self.returns_collected.min(MAX_RETURNS);
        self.purchase_spot = self.purchase_spot.max(0);
    }
}

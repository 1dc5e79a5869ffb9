use super::*;
use crate::ID;
use crate::Points;
use crate::Seat;
use crate::Tile;
use crate::catalog::Dream;
use crate::catalog::EventCard;
use crate::catalog::User;
use crate::store::Holding;

/// Two dice as thrown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roll(pub u8, pub u8);

impl Roll {
    pub fn sum(&self) -> u8 {
        self.0 + self.1
    }
}

/// Result of a token move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moved {
    pub position: Tile,
    pub penalized: bool,
    pub payouts: Vec<Payout>,
    pub next: Seat,
}

/// Result of an asset selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub assets: Vec<Holding>,
    pub next: Seat,
}

/// Result of an event card draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drawn {
    pub card: EventCard,
    pub points: Points,
    pub liabilities: Points,
}

/// Result of a savings card play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Saved {
    pub bonus: Points,
    pub savings: Points,
    pub points: Points,
}

/// Result of a successful dream purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Won {
    pub winner: Option<ID<User>>,
    pub dream: ID<Dream>,
}

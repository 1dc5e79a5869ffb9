use crate::ID;
use crate::Points;
use crate::Seat;
use crate::Tile;
use crate::catalog::Dream;
use crate::catalog::SavingsCard;
use crate::catalog::SpendingCard;
use crate::catalog::User;
use serde::Deserialize;

fn two() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[serde(default = "two")]
    pub num_players: usize,
    #[serde(default)]
    pub dream_id: Option<ID<Dream>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub user_id: Option<ID<User>>,
    #[serde(default)]
    pub is_ai: bool,
    #[serde(default)]
    pub seat_position: Seat,
}

/// Body of every action that only names its player.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRequest {
    pub user_id: ID<User>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub user_id: ID<User>,
    #[serde(default)]
    pub token_index: usize,
    #[serde(default)]
    pub steps: Tile,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    pub user_id: ID<User>,
    #[serde(default)]
    pub asset_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRequest {
    pub user_id: ID<User>,
    pub card_id: ID<SavingsCard>,
    #[serde(default)]
    pub amount: Points,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingRequest {
    pub user_id: ID<User>,
    pub card_id: ID<SpendingCard>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamRequest {
    pub user_id: ID<User>,
    pub dream_id: ID<Dream>,
}

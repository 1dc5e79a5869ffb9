use super::*;
use crate::ID;
use crate::Millis;
use crate::Points;
use crate::Seat;
use crate::TOKENS;
use crate::Tile;
use crate::Unique;
use crate::catalog::User;
use serde::Serialize;

/// Full state of a room, as served by the state endpoint and carried by
/// `state_update` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub match_id: ID<Room>,
    pub status: Status,
    pub player_count: usize,
    pub current_turn: Seat,
    pub created_at: Millis,
    pub started_at: Option<Millis>,
    pub ended_at: Option<Millis>,
    pub winner_id: Option<ID<User>>,
    pub players: Vec<Seated>,
}

/// Public view of one player row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seated {
    pub user_id: Option<ID<User>>,
    pub seat: Seat,
    pub is_ai: bool,
    pub tokens: [Tile; TOKENS],
    pub savings: Points,
    pub liabilities: Points,
    pub current_points: Points,
    pub assets: Vec<Holding>,
}

impl From<&Player> for Seated {
    fn from(player: &Player) -> Self {
        Self {
            user_id: player.user(),
            seat: player.seat(),
            is_ai: player.is_cpu(),
            tokens: *player.tokens(),
            savings: player.savings(),
            liabilities: player.liabilities(),
            current_points: player.points(),
            assets: player.assets().to_vec(),
        }
    }
}

impl<'a, I> From<(&Room, I)> for Snapshot
where
    I: IntoIterator<Item = &'a Player>,
{
    fn from((room, players): (&Room, I)) -> Self {
        Self {
            match_id: room.id(),
            status: room.status(),
            player_count: room.players(),
            current_turn: room.turn(),
            created_at: room.created(),
            started_at: room.started(),
            ended_at: room.ended(),
            winner_id: room.winner(),
            players: players.into_iter().map(Seated::from).collect(),
        }
    }
}

impl Snapshot {
    pub fn seat(&self, seat: Seat) -> Option<&Seated> {
        self.players.iter().find(|p| p.seat == seat)
    }
}

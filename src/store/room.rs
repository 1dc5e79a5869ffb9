use crate::ID;
use crate::Millis;
use crate::Seat;
use crate::Unique;
use crate::catalog::Dream;
use crate::catalog::User;
use serde::Serialize;

/// Room lifecycle: `waiting → active → finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Waiting,
    Active,
    Finished,
}

/// One active game instance.
///
/// Once active, `0 <= turn < players` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: ID<Self>,
    status: Status,
    players: usize,
    turn: Seat,
    dream: Option<ID<Dream>>,
    created: Millis,
    started: Option<Millis>,
    ended: Option<Millis>,
    winner: Option<ID<User>>,
}

impl Room {
    pub fn new(players: usize, dream: Option<ID<Dream>>) -> Self {
        Self {
            id: ID::default(),
            status: Status::Waiting,
            players,
            turn: 0,
            dream,
            created: crate::now(),
            started: None,
            ended: None,
            winner: None,
        }
    }
    pub fn status(&self) -> Status {
        self.status
    }
    /// Configured number of seats.
    pub fn players(&self) -> usize {
        self.players
    }
    /// Seat whose turn it is.
    pub fn turn(&self) -> Seat {
        self.turn
    }
    /// Dream this match is bound to, if any.
    pub fn dream(&self) -> Option<ID<Dream>> {
        self.dream
    }
    pub fn created(&self) -> Millis {
        self.created
    }
    pub fn started(&self) -> Option<Millis> {
        self.started
    }
    pub fn ended(&self) -> Option<Millis> {
        self.ended
    }
    pub fn winner(&self) -> Option<ID<User>> {
        self.winner
    }
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

impl Room {
    pub(crate) fn start(&mut self) {
        self.status = Status::Active;
        self.started = Some(crate::now());
        self.turn = 0;
    }
    /// Moves the turn pointer to the next seat, cyclically.
    pub(crate) fn advance(&mut self) -> Seat {
        self.turn = (self.turn + 1) % self.players.max(1);
        self.turn
    }
    pub(crate) fn finish(&mut self, winner: Option<ID<User>>) {
        self.status = Status::Finished;
        self.ended = Some(crate::now());
        self.winner = winner;
    }
}

impl Unique for Room {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

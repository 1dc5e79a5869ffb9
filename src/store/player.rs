use super::*;
use crate::ID;
use crate::Points;
use crate::Seat;
use crate::STARTING_POINTS;
use crate::TOKENS;
use crate::Tile;
use crate::Unique;
use crate::catalog::User;

/// One seat in one room.
///
/// AI seats have no user. All four tokens are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: ID<Self>,
    room: ID<Room>,
    user: Option<ID<User>>,
    seat: Seat,
    starting: Points,
    points: Points,
    savings: Points,
    liabilities: Points,
    assets: Vec<Holding>,
    tokens: [Tile; TOKENS],
    cpu: bool,
    ready: bool,
}

impl Player {
    pub fn new(room: ID<Room>, user: Option<ID<User>>, seat: Seat, cpu: bool) -> Self {
        Self {
            id: ID::default(),
            room,
            user,
            seat,
            starting: STARTING_POINTS,
            points: STARTING_POINTS,
            savings: 0,
            liabilities: 0,
            assets: Vec::new(),
            tokens: [0; TOKENS],
            cpu,
            ready: true,
        }
    }
    pub fn room(&self) -> ID<Room> {
        self.room
    }
    pub fn user(&self) -> Option<ID<User>> {
        self.user
    }
    pub fn seat(&self) -> Seat {
        self.seat
    }
    pub fn starting(&self) -> Points {
        self.starting
    }
    /// On-hand points.
    pub fn points(&self) -> Points {
        self.points
    }
    pub fn savings(&self) -> Points {
        self.savings
    }
    pub fn liabilities(&self) -> Points {
        self.liabilities
    }
    pub fn assets(&self) -> &[Holding] {
        &self.assets
    }
    pub fn tokens(&self) -> &[Tile; TOKENS] {
        &self.tokens
    }
    pub fn is_cpu(&self) -> bool {
        self.cpu
    }
    pub fn is_ready(&self) -> bool {
        self.ready
    }
    pub fn owns(&self, asset: &str) -> bool {
        self.assets.iter().any(|h| h.asset() == asset)
    }
}

impl Player {
    pub fn credit(&mut self, amount: Points) {
        self.points += amount;
    }
    pub fn debit(&mut self, amount: Points) {
        self.points -= amount;
    }
    pub fn deposit(&mut self, amount: Points) {
        self.savings += amount;
    }
    pub fn owe(&mut self, amount: Points) {
        self.liabilities += amount;
    }
    pub fn place(&mut self, token: usize, tile: Tile) {
        if let Some(t) = self.tokens.get_mut(token) {
            *t = tile.max(0);
        }
    }
    pub fn acquire(&mut self, holding: Holding) {
        self.assets.push(holding);
    }
    pub fn assets_mut(&mut self) -> &mut [Holding] {
        &mut self.assets
    }
    /// Clamps every stored value back into its valid range.
    pub fn normalize(&mut self) {
        self.tokens.iter_mut().for_each(|t| *t = (*t).max(0));
        self.assets.iter_mut().for_each(Holding::normalize);
    }
    /// Copies the given columns from another version of this row.
    pub(crate) fn merge(&mut self, other: &Self, fields: impl IntoIterator<Item = Field>) {
        for field in fields {
            match field {
                Field::Tokens => self.tokens = other.tokens,
                Field::Points => self.points = other.points,
                Field::Savings => self.savings = other.savings,
                Field::Liabilities => self.liabilities = other.liabilities,
                Field::Assets => self.assets = other.assets.clone(),
            }
        }
    }
}

impl Unique for Player {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
